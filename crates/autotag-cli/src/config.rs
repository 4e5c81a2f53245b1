//! Configuration management for the CLI.
//!
//! Values are layered: built-in defaults, then the TOML file, then flags.

use crate::cli::Cli;
use crate::error::{CliError, Result};
use autotag_extractor::ExtractorConfig;
use autotag_llm::openai::{DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use autotag_llm::OpenAiCompatProvider;
use autotag_pipeline::{JobConfig, DEFAULT_CHAR_LIMIT, DEFAULT_LLM_CONCURRENCY, DEFAULT_WORKER_COUNT};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model service settings
    pub service: ServiceSettings,

    /// Run settings
    pub run: RunSettings,

    /// Response extraction limits
    pub extractor: ExtractorConfig,
}

/// Model service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Chat completions endpoint
    pub endpoint: String,

    /// Model identifier
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Run settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    /// Minimum body length before the model is queried
    pub char_limit: usize,

    /// Number of worker tasks
    pub workers: usize,

    /// Simultaneous model requests (0 = unlimited)
    pub llm_concurrency: usize,

    /// Rewrite files in place
    pub write: bool,

    /// Reprocess already marked notes
    pub force: bool,

    /// Verbose model logging
    pub debug: bool,

    /// Enable colored output
    pub color: bool,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".autotag").join("config.toml"))
    }

    /// Load the default configuration file, or defaults if it does not exist.
    pub fn load() -> Result<Self> {
        match Self::path() {
            Ok(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Resolve the file layer and apply command-line overrides.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load_from(path)?,
            None => Self::load()?,
        };
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        self.job_config().validate()?;
        self.extractor_config().validate()?;
        Ok(())
    }

    /// Apply flags on top of the loaded values.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(endpoint) = &cli.endpoint {
            self.service.endpoint = endpoint.clone();
        }
        if let Some(model) = &cli.model {
            self.service.model = model.clone();
        }
        if let Some(timeout) = cli.timeout_secs {
            self.service.timeout_secs = timeout;
        }
        if let Some(limit) = cli.char_limit {
            self.run.char_limit = limit;
        }
        if let Some(workers) = cli.workers {
            self.run.workers = workers;
        }
        if let Some(limit) = cli.llm_concurrency {
            self.run.llm_concurrency = limit;
        }
        self.run.write |= cli.write;
        self.run.force |= cli.force;
        self.run.debug |= cli.debug;
        if cli.no_color {
            self.run.color = false;
        }
    }

    /// Pipeline settings for this run.
    pub fn job_config(&self) -> JobConfig {
        JobConfig {
            char_limit: self.run.char_limit,
            force_reprocess: self.run.force,
            write_mode: self.run.write,
            worker_count: self.run.workers,
            llm_concurrency_limit: self.run.llm_concurrency,
            debug: self.run.debug,
        }
    }

    /// Model client settings for this run.
    pub fn extractor_config(&self) -> ExtractorConfig {
        let debug = self.run.debug || self.extractor.debug;
        self.extractor.clone().with_debug(debug)
    }

    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.service.timeout_secs)
    }

    /// Model service client for the configured endpoint.
    ///
    /// Must be called outside the async runtime.
    pub fn provider(&self) -> Result<OpenAiCompatProvider> {
        Ok(OpenAiCompatProvider::with_timeout(
            self.service.endpoint.clone(),
            self.service.model.clone(),
            self.timeout(),
        )?)
    }
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            char_limit: DEFAULT_CHAR_LIMIT,
            workers: DEFAULT_WORKER_COUNT,
            llm_concurrency: DEFAULT_LLM_CONCURRENCY,
            write: false,
            force: false,
            debug: false,
            color: true,
        }
    }
}
