//! Configuration for the Extractor

use crate::error::ExtractorError;
use autotag_domain::{MAX_SUMMARY_WORDS, MAX_TAGS};
use serde::{Deserialize, Serialize};

/// Configuration for the metadata extractor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Log raw model output and swallowed errors at info/warn level
    pub debug: bool,

    /// Words kept in a summary before it is cut with an ellipsis
    pub max_summary_words: usize,

    /// Tags kept from a single response
    pub max_tags: usize,
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ExtractorError> {
        if self.max_summary_words == 0 {
            return Err(ExtractorError::Config(
                "max_summary_words must be greater than 0".to_string(),
            ));
        }
        if self.max_tags > MAX_TAGS {
            return Err(ExtractorError::Config(format!(
                "max_tags cannot exceed {}",
                MAX_TAGS
            )));
        }
        Ok(())
    }

    /// Enable or disable debug logging
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ExtractorError> {
        toml::from_str(toml_str)
            .map_err(|e| ExtractorError::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ExtractorError> {
        toml::to_string_pretty(self)
            .map_err(|e| ExtractorError::Config(format!("Failed to serialize to TOML: {}", e)))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            debug: false,
            max_summary_words: MAX_SUMMARY_WORDS,
            max_tags: MAX_TAGS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.debug);
    }

    #[test]
    fn test_invalid_summary_words() {
        let config = ExtractorConfig {
            max_summary_words: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_too_many_tags() {
        let config = ExtractorConfig {
            max_tags: 10,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig::default().with_debug(true);
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();

        assert!(parsed.debug);
        assert_eq!(config.max_summary_words, parsed.max_summary_words);
        assert_eq!(config.max_tags, parsed.max_tags);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed = ExtractorConfig::from_toml("debug = true").unwrap();
        assert!(parsed.debug);
        assert_eq!(parsed.max_tags, MAX_TAGS);
    }
}
