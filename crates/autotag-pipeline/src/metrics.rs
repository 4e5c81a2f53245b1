//! Run summary statistics

use crate::report::{ProcessingOutcome, RunReport};
use autotag_domain::DateSource;
use std::collections::BTreeMap;

/// Counters describing a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Documents handed to the scheduler
    pub total_documents: usize,

    /// Documents that were not skipped
    pub processed: usize,

    /// Documents skipped because they were already marked
    pub skipped: usize,

    /// Documents rewritten in place
    pub updated: usize,

    /// Documents that could not be read
    pub read_failures: usize,

    /// Documents whose rewrite failed
    pub write_failures: usize,

    /// Error records (including panicked jobs)
    pub errors: usize,

    /// Date tier usage
    pub date_sources: BTreeMap<DateSource, usize>,

    /// Run duration in milliseconds
    pub elapsed_ms: u64,
}

impl RunSummary {
    /// Compute the summary for a report
    pub fn from_report(report: &RunReport, total_documents: usize) -> Self {
        let mut summary = Self {
            total_documents,
            errors: report.errors.len(),
            elapsed_ms: report.elapsed.as_millis() as u64,
            ..Self::default()
        };

        for outcome in &report.results {
            match outcome {
                ProcessingOutcome::Skipped { .. } => summary.skipped += 1,
                ProcessingOutcome::ReadFailed { .. } => summary.read_failures += 1,
                ProcessingOutcome::WriteFailed { .. } => {
                    summary.processed += 1;
                    summary.write_failures += 1;
                }
                ProcessingOutcome::Written { .. } => {
                    summary.processed += 1;
                    summary.updated += 1;
                }
                ProcessingOutcome::DryRun(_) => summary.processed += 1,
            }
            if let Some(source) = outcome.date_source() {
                *summary.date_sources.entry(source).or_insert(0) += 1;
            }
        }

        summary
    }

    /// Documents whose date came from the given tier
    pub fn date_source_count(&self, source: DateSource) -> usize {
        self.date_sources.get(&source).copied().unwrap_or(0)
    }

    /// Generate a plain-text summary report
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "AutoTag Run Summary".to_string(),
            "===================".to_string(),
            format!("Documents found: {}", self.total_documents),
            format!("Processed: {}", self.processed),
            format!("Skipped: {}", self.skipped),
            format!("Updated: {}", self.updated),
            format!("Read failures: {}", self.read_failures),
            format!("Write failures: {}", self.write_failures),
            format!("Errors: {}", self.errors),
            format!("Elapsed: {}ms", self.elapsed_ms),
        ];

        if !self.date_sources.is_empty() {
            lines.push(String::new());
            lines.push("Date sources:".to_string());
            for (source, count) in &self.date_sources {
                lines.push(format!("  {}: {}", source, count));
            }
        }

        lines.join("\n")
    }
}
