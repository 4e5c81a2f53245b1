//! AutoTag LLM Provider Layer
//!
//! Provider implementations of the `LlmProvider` trait from `autotag-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing, with optional latency
//!   and concurrency instrumentation
//! - `OpenAiCompatProvider`: Any OpenAI-compatible chat completions endpoint
//!   (LM Studio, llama.cpp server, vLLM, ...)
//!
//! # Examples
//!
//! ```
//! use autotag_llm::MockProvider;
//! use autotag_domain::traits::LlmProvider;
//!
//! let provider = MockProvider::new("{summary: 'Hello'}");
//! let result = provider.generate("system", "prompt").unwrap();
//! assert_eq!(result, "{summary: 'Hello'}");
//! ```

#![warn(missing_docs)]

pub mod openai;

use autotag_domain::traits::LlmProvider as LlmProviderTrait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

pub use openai::OpenAiCompatProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Request exceeded the configured timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Service answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, if readable
        body: String,
    },

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls. A
/// response can be routed by a marker contained in the prompt, calls can be
/// slowed down, and the peak number of simultaneous calls is recorded.
///
/// # Examples
///
/// ```
/// use autotag_llm::MockProvider;
/// use autotag_domain::traits::LlmProvider;
///
/// let mut provider = MockProvider::default();
/// provider.add_response("apples", "{tags: [fruit]}");
/// assert_eq!(provider.generate("sys", "notes about apples").unwrap(), "{tags: [fruit]}");
/// assert_eq!(provider.call_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<Vec<(String, String)>>>,
    latency: Duration,
    call_count: Arc<AtomicUsize>,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
}

const ERROR_MARKER: &str = "ERROR";

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(Vec::new())),
            latency: Duration::ZERO,
            call_count: Arc::new(AtomicUsize::new(0)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A provider that fails every call
    pub fn failing() -> Self {
        Self::new(ERROR_MARKER)
    }

    /// Sleep this long inside every call
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Return `response` whenever the prompt contains `marker`
    pub fn add_response(&mut self, marker: impl Into<String>, response: impl Into<String>) {
        if let Ok(mut responses) = self.responses.lock() {
            responses.push((marker.into(), response.into()));
        }
    }

    /// Fail whenever the prompt contains `marker`
    pub fn add_error(&mut self, marker: impl Into<String>) {
        self.add_response(marker, ERROR_MARKER);
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Highest number of calls that were running at the same time
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Reset the call count and peak concurrency
    pub fn reset_call_count(&self) {
        self.call_count.store(0, Ordering::SeqCst);
        self.peak_in_flight.store(0, Ordering::SeqCst);
    }

    fn response_for(&self, prompt: &str) -> String {
        self.responses
            .lock()
            .ok()
            .and_then(|responses| {
                responses
                    .iter()
                    .find(|(marker, _)| prompt.contains(marker.as_str()))
                    .map(|(_, response)| response.clone())
            })
            .unwrap_or_else(|| self.default_response.clone())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("{}")
    }
}

/// Decrements the in-flight counter when a mock call ends
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn generate(&self, _system: &str, prompt: &str) -> Result<String, Self::Error> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = InFlight(&self.in_flight);
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);

        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }

        let response = self.response_for(prompt);
        if response == ERROR_MARKER {
            return Err(LlmError::Other("Mock error".to_string()));
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.generate("sys", "any prompt");
        assert_eq!(result.unwrap(), "Test response");
    }

    #[test]
    fn test_mock_provider_routed_responses() {
        let mut provider = MockProvider::default();
        provider.add_response("hello", "world");
        provider.add_response("foo", "bar");

        assert_eq!(provider.generate("s", "say hello").unwrap(), "world");
        assert_eq!(provider.generate("s", "foo!").unwrap(), "bar");
        assert_eq!(provider.generate("s", "unknown").unwrap(), "{}");
    }

    #[test]
    fn test_mock_provider_call_count() {
        let provider = MockProvider::new("test");
        assert_eq!(provider.call_count(), 0);

        provider.generate("s", "prompt1").unwrap();
        provider.generate("s", "prompt2").unwrap();
        assert_eq!(provider.call_count(), 2);

        provider.reset_call_count();
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_mock_provider_error() {
        let mut provider = MockProvider::default();
        provider.add_error("bad prompt");

        let result = provider.generate("s", "a bad prompt");
        assert!(matches!(result.unwrap_err(), LlmError::Other(_)));
        assert!(MockProvider::failing().generate("s", "x").is_err());
    }

    #[test]
    fn test_mock_provider_clone_shares_counters() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.generate("s", "test").unwrap();
        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }

    #[test]
    fn test_mock_provider_tracks_peak_concurrency() {
        let provider = MockProvider::new("ok").with_latency(Duration::from_millis(100));

        let handles: Vec<_> = (0..3)
            .map(|_| {
                let p = provider.clone();
                thread::spawn(move || p.generate("s", "x").unwrap())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(provider.call_count(), 3);
        assert!(provider.peak_in_flight() >= 2);
        assert!(provider.peak_in_flight() <= 3);
    }
}
