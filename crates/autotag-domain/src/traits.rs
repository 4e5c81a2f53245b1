//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (autotag-llm). Calls are blocking;
/// async callers are expected to run them on a blocking thread.
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate a chat completion from a system instruction and a user prompt
    ///
    /// Returns the raw text of the first completion choice.
    fn generate(&self, system: &str, prompt: &str) -> Result<String, Self::Error>;
}
