//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The documents root is missing or not a directory
    #[error("Path does not exist or is not a directory: {0}")]
    InvalidRoot(String),

    /// Nothing to process
    #[error("No markdown files found under {0}")]
    NoDocuments(String),

    /// Model service client error
    #[error("LLM client error: {0}")]
    Llm(#[from] autotag_llm::LlmError),

    /// Extraction settings error
    #[error(transparent)]
    Extractor(#[from] autotag_extractor::ExtractorError),

    /// Pipeline setup error
    #[error(transparent)]
    Pipeline(#[from] autotag_pipeline::PipelineError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}
