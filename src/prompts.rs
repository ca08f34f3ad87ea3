//! Instruction text sent with every generation request.
//!
//! Centralised so changing the default behaviour means editing exactly one
//! place, and so tests can assert against the constant without a live API.
//! Callers override it via [`crate::config::SummaryConfigBuilder::prompt`].

/// Default instruction for the content-generation request.
///
/// Used when `SummaryConfig::prompt` is `None`. The service receives this as
/// the text part preceding the document part.
pub const DEFAULT_SUMMARY_PROMPT: &str = "Summarize this document";
