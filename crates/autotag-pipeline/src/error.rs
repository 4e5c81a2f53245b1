//! Error types for pipeline operations

use thiserror::Error;

/// Errors that can occur while setting up or running a pipeline
///
/// Per-document failures never surface here; they become outcomes and
/// error records in the [`RunReport`](crate::RunReport).
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Worker error (tokio runtime issues)
    #[error("Worker error: {0}")]
    Worker(String),
}
