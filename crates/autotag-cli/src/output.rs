//! Output files and terminal formatting.

use crate::error::Result;
use autotag_domain::DateSource;
use autotag_pipeline::{ErrorRecord, RunReport, RunSummary};
use chrono::Local;
use colored::{Color, Colorize};
use std::fs;
use std::path::{Path, PathBuf};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Dry-run report file name, written into the processing root.
pub const DRY_RUN_FILE: &str = "metadata_dryrun.json";

/// Write the dry-run records as a pretty JSON array.
pub fn save_dry_run(root: &Path, report: &RunReport) -> Result<PathBuf> {
    let path = root.join(DRY_RUN_FILE);
    let json = serde_json::to_string_pretty(&report.dry_run_records())?;
    fs::write(&path, json)?;
    Ok(path)
}

/// Name of the error log for a run started now.
pub fn error_log_name() -> String {
    format!("({}) AutoAiTag Log.json", Local::now().format("%Y-%m-%d %H-%M-%S"))
}

/// Write the error log; nothing is written when there are no errors.
pub fn save_error_log(root: &Path, errors: &[ErrorRecord]) -> Result<Option<PathBuf>> {
    if errors.is_empty() {
        return Ok(None);
    }
    let path = root.join(error_log_name());
    let json = serde_json::to_string_pretty(errors)?;
    fs::write(&path, json)?;
    Ok(Some(path))
}

/// Terminal formatter.
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), Color::Green)
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), Color::Red)
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), Color::Blue)
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), Color::Yellow)
    }

    /// Format the end-of-run summary as tables.
    pub fn format_summary(&self, summary: &RunSummary) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Metric", "Count"]);
        let rows = [
            ("Documents found", summary.total_documents),
            ("Processed", summary.processed),
            ("Skipped", summary.skipped),
            ("Updated", summary.updated),
            ("Read failures", summary.read_failures),
            ("Write failures", summary.write_failures),
            ("Errors", summary.errors),
        ];
        for (label, count) in rows {
            builder.push_record([label.to_string(), count.to_string()]);
        }

        let mut out = self.styled(builder);

        if !summary.date_sources.is_empty() {
            let mut sources = Builder::default();
            sources.push_record(["Date source", "Documents"]);
            for source in [DateSource::AI, DateSource::Filename, DateSource::FileSystem] {
                let count = summary.date_source_count(source);
                if count > 0 {
                    sources.push_record([source.to_string(), count.to_string()]);
                }
            }
            out.push('\n');
            out.push_str(&self.styled(sources));
        }

        out
    }

    fn styled(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: Color) -> String {
        if self.color_enabled {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autotag_pipeline::{DryRunRecord, ErrorKind, ProcessingOutcome};
    use serde_yaml::Mapping;

    fn report_with_dry_run() -> RunReport {
        let mut metadata = Mapping::new();
        metadata.insert("title".into(), "Ünïcode".into());
        RunReport {
            results: vec![
                ProcessingOutcome::DryRun(DryRunRecord {
                    path: "Ünïcode.md".to_string(),
                    metadata,
                    date_source: DateSource::Filename,
                    ai_date: None,
                    ai_confidence: 0.0,
                }),
                ProcessingOutcome::Skipped {
                    path: "done.md".to_string(),
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_save_dry_run_keeps_non_ascii() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_dry_run(dir.path(), &report_with_dry_run()).unwrap();

        assert_eq!(path.file_name().unwrap(), DRY_RUN_FILE);
        let json = fs::read_to_string(&path).unwrap();
        assert!(json.contains("Ünïcode"));
        assert!(json.contains("\n  {"));

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let records = parsed.as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["date_source"], "Filename");
        assert!(records[0]["ai_date"].is_null());
    }

    #[test]
    fn test_error_log_only_when_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(save_error_log(dir.path(), &[]).unwrap().is_none());

        let errors = vec![ErrorRecord::new("x.md", "boom", ErrorKind::ReadError)];
        let path = save_error_log(dir.path(), &errors).unwrap().unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with('('));
        assert!(name.ends_with(") AutoAiTag Log.json"));

        let parsed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed[0]["error_type"], "ReadError");
    }

    #[test]
    fn test_summary_table() {
        let summary = RunSummary::from_report(&report_with_dry_run(), 2);
        let output = Formatter::new(false).format_summary(&summary);
        assert!(output.contains("Processed"));
        assert!(output.contains("Date source"));
        assert!(output.contains("Filename"));
        assert!(!output.contains("FileSystem"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(false);
        assert_eq!(formatter.success("done"), "✓ done");
        assert_eq!(formatter.warning("careful"), "⚠ careful");
    }
}
