//! Command-line argument parsing.

use clap::Parser;
use std::path::PathBuf;

/// AutoTag - Enrich Markdown notes with model-generated metadata.
///
/// Runs as a dry run by default, writing `metadata_dryrun.json` into ROOT.
/// Pass `--write` to rewrite the notes in place.
#[derive(Debug, Parser)]
#[command(name = "autotag")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory containing the notes (searched recursively)
    pub root: PathBuf,

    /// Rewrite files in place instead of producing a dry-run report
    #[arg(short, long)]
    pub write: bool,

    /// Reprocess notes already marked with autoAiTag
    #[arg(short, long)]
    pub force: bool,

    /// Log raw model output and swallowed errors
    #[arg(short, long)]
    pub debug: bool,

    /// Minimum body length (characters) before the model is queried
    #[arg(long)]
    pub char_limit: Option<usize>,

    /// Number of worker tasks
    #[arg(long)]
    pub workers: Option<usize>,

    /// Simultaneous model requests (0 = unlimited)
    #[arg(long)]
    pub llm_concurrency: Option<usize>,

    /// Chat completions endpoint
    #[arg(long, env = "AUTOTAG_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Model identifier
    #[arg(long, env = "AUTOTAG_MODEL")]
    pub model: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Configuration file path (defaults to ~/.autotag/config.toml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults_are_unset() {
        let cli = Cli::try_parse_from(["autotag", "notes"]).unwrap();
        assert_eq!(cli.root, PathBuf::from("notes"));
        assert!(!cli.write);
        assert!(!cli.force);
        assert!(cli.char_limit.is_none());
        assert!(cli.workers.is_none());
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "autotag",
            "vault",
            "--write",
            "--force",
            "--debug",
            "--char-limit",
            "500",
            "--workers",
            "8",
            "--llm-concurrency",
            "0",
            "--endpoint",
            "http://127.0.0.1:8080/v1/chat/completions",
            "--model",
            "local-model",
            "--timeout-secs",
            "30",
        ])
        .unwrap();

        assert!(cli.write && cli.force && cli.debug);
        assert_eq!(cli.char_limit, Some(500));
        assert_eq!(cli.workers, Some(8));
        assert_eq!(cli.llm_concurrency, Some(0));
        assert_eq!(cli.model.as_deref(), Some("local-model"));
        assert_eq!(cli.timeout_secs, Some(30));
    }

    #[test]
    fn test_root_is_required() {
        assert!(Cli::try_parse_from(["autotag"]).is_err());
    }
}
