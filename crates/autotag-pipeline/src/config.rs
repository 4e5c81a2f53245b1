//! Configuration for a pipeline run

use crate::error::PipelineError;
use serde::{Deserialize, Serialize};

/// Minimum body length (in characters) before the model is queried
pub const DEFAULT_CHAR_LIMIT: usize = 1000;

/// Default number of worker tasks
pub const DEFAULT_WORKER_COUNT: usize = 4;

/// Default number of simultaneous model calls
pub const DEFAULT_LLM_CONCURRENCY: usize = 2;

/// Configuration for a single run, shared read-only by every job
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    /// Bodies shorter than this many characters skip the model call
    pub char_limit: usize,

    /// Process documents already marked with `autoAiTag`
    pub force_reprocess: bool,

    /// Rewrite files in place instead of producing a dry-run report
    pub write_mode: bool,

    /// Number of worker tasks pulling from the queue
    pub worker_count: usize,

    /// Simultaneous model calls allowed (0 disables the gate)
    pub llm_concurrency_limit: usize,

    /// Verbose logging of model output and swallowed errors
    pub debug: bool,
}

impl JobConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.worker_count == 0 {
            return Err(PipelineError::Config(
                "worker_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, PipelineError> {
        toml::from_str(toml_str)
            .map_err(|e| PipelineError::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, PipelineError> {
        toml::to_string_pretty(self)
            .map_err(|e| PipelineError::Config(format!("Failed to serialize to TOML: {}", e)))
    }
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            char_limit: DEFAULT_CHAR_LIMIT,
            force_reprocess: false,
            write_mode: false,
            worker_count: DEFAULT_WORKER_COUNT,
            llm_concurrency_limit: DEFAULT_LLM_CONCURRENCY,
            debug: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = JobConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.char_limit, 1000);
        assert_eq!(config.worker_count, 4);
        assert_eq!(config.llm_concurrency_limit, 2);
        assert!(!config.write_mode);
        assert!(!config.force_reprocess);
    }

    #[test]
    fn test_zero_workers_rejected() {
        let config = JobConfig {
            worker_count: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_zero_gate_is_valid() {
        let config = JobConfig {
            llm_concurrency_limit: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = JobConfig {
            write_mode: true,
            worker_count: 8,
            ..Default::default()
        };
        let toml_str = config.to_toml().unwrap();
        let parsed = JobConfig::from_toml(&toml_str).unwrap();

        assert!(parsed.write_mode);
        assert_eq!(parsed.worker_count, 8);
        assert_eq!(parsed.char_limit, config.char_limit);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed = JobConfig::from_toml("char_limit = 200").unwrap();
        assert_eq!(parsed.char_limit, 200);
        assert_eq!(parsed.worker_count, DEFAULT_WORKER_COUNT);
    }
}
