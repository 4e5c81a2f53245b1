//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur while turning a document into metadata
///
/// These never escape [`MetadataExtractor::query`](crate::MetadataExtractor::query),
/// which degrades every failure into an empty result.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// LLM provider error (transport, timeout, status, envelope)
    #[error("LLM error: {0}")]
    Llm(String),

    /// The blocking provider task panicked or was cancelled
    #[error("LLM task failed: {0}")]
    Task(String),

    /// No parse attempt produced a value
    #[error("No parseable object in model output")]
    NoObject,

    /// A value was parsed but it is not a key/value mapping
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
