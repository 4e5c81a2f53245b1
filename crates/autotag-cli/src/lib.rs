//! AutoTag CLI library.
//!
//! Argument parsing, layered configuration, note discovery and the output
//! files for the `autotag` binary.

pub mod app;
pub mod cli;
pub mod config;
pub mod discover;
pub mod error;
pub mod output;

pub use app::{init_tracing, run};
pub use cli::Cli;
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
