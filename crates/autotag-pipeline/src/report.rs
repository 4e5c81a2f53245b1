//! Job outcomes, error records and the result aggregator

use autotag_domain::tags::value_to_string;
use autotag_domain::DateSource;
use chrono::Local;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::fmt;
use std::time::Duration;

/// Metadata a dry run would have written for one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DryRunRecord {
    /// Path relative to the processing root
    pub path: String,
    /// The full header after processing
    ///
    /// Serialized with every key rendered as a string, so headers with null,
    /// numeric or collection keys still produce valid JSON.
    #[serde(serialize_with = "serialize_header")]
    pub metadata: Mapping,
    /// Tier that produced the `Date` field
    pub date_source: DateSource,
    /// Date proposed by the model, if any
    pub ai_date: Option<String>,
    /// Model confidence in `ai_date`
    pub ai_confidence: f64,
}

fn serialize_header<S: Serializer>(header: &Mapping, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(header.len()))?;
    for (key, value) in header {
        map.serialize_entry(&header_key(key), &StringKeyed(value))?;
    }
    map.end()
}

/// Text form of a header key (`~` becomes `"null"`)
fn header_key(key: &Value) -> String {
    match key {
        Value::Null => "null".to_string(),
        other => value_to_string(other),
    }
}

/// Serializes a YAML value with string keys at every nesting level
struct StringKeyed<'a>(&'a Value);

impl Serialize for StringKeyed<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Value::Mapping(map) => serialize_header(map, serializer),
            Value::Sequence(items) => serializer.collect_seq(items.iter().map(StringKeyed)),
            Value::Tagged(tagged) => StringKeyed(&tagged.value).serialize(serializer),
            scalar => scalar.serialize(serializer),
        }
    }
}

/// What happened to a single document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProcessingOutcome {
    /// Already marked as processed; file untouched
    Skipped {
        /// Path relative to the processing root
        path: String,
    },
    /// Processed without writing
    DryRun(DryRunRecord),
    /// Processed and rewritten in place
    Written {
        /// Path relative to the processing root
        path: String,
        /// Tier that produced the `Date` field
        date_source: DateSource,
    },
    /// Processed but the rewrite failed
    WriteFailed {
        /// Path relative to the processing root
        path: String,
        /// Failure description
        error: String,
    },
    /// The file could not be read
    ReadFailed {
        /// Path relative to the processing root
        path: String,
        /// Failure description
        error: String,
    },
}

impl ProcessingOutcome {
    /// Path of the document this outcome belongs to
    pub fn path(&self) -> &str {
        match self {
            ProcessingOutcome::Skipped { path }
            | ProcessingOutcome::Written { path, .. }
            | ProcessingOutcome::WriteFailed { path, .. }
            | ProcessingOutcome::ReadFailed { path, .. } => path,
            ProcessingOutcome::DryRun(record) => &record.path,
        }
    }

    /// Date tier, for outcomes that resolved a date
    pub fn date_source(&self) -> Option<DateSource> {
        match self {
            ProcessingOutcome::DryRun(record) => Some(record.date_source),
            ProcessingOutcome::Written { date_source, .. } => Some(*date_source),
            _ => None,
        }
    }

    /// Error record for failed outcomes
    pub fn error_record(&self) -> Option<ErrorRecord> {
        match self {
            ProcessingOutcome::ReadFailed { path, error } => {
                Some(ErrorRecord::new(path.clone(), error.clone(), ErrorKind::ReadError))
            }
            ProcessingOutcome::WriteFailed { path, error } => {
                Some(ErrorRecord::new(path.clone(), error.clone(), ErrorKind::WriteError))
            }
            _ => None,
        }
    }
}

/// Category of an [`ErrorRecord`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The document could not be read
    ReadError,
    /// The document could not be rewritten
    WriteError,
    /// The job task panicked
    JobPanic,
}

impl ErrorKind {
    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ReadError => "ReadError",
            ErrorKind::WriteError => "WriteError",
            ErrorKind::JobPanic => "JobPanic",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the run's error log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Path relative to the processing root
    pub filepath: String,
    /// Failure description
    pub error: String,
    /// Failure category
    pub error_type: ErrorKind,
    /// RFC 3339 local time the error was recorded
    pub timestamp: String,
}

impl ErrorRecord {
    /// Create a record stamped with the current local time
    pub fn new(filepath: impl Into<String>, error: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            filepath: filepath.into(),
            error: error.into(),
            error_type: kind,
            timestamp: Local::now().to_rfc3339(),
        }
    }
}

/// Message sent from a worker to the aggregator
#[derive(Debug)]
pub enum JobMessage {
    /// The job ran to completion
    Finished(ProcessingOutcome),
    /// The job task panicked
    Panicked {
        /// Path relative to the processing root
        path: String,
        /// Panic description
        error: String,
    },
}

/// Everything a run produced
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    /// One outcome per completed job, in completion order
    pub results: Vec<ProcessingOutcome>,
    /// Error records, in the order they were received
    pub errors: Vec<ErrorRecord>,
    /// Wall-clock duration of the run
    #[serde(skip)]
    pub elapsed: Duration,
}

impl RunReport {
    /// Dry-run records, in completion order
    pub fn dry_run_records(&self) -> Vec<&DryRunRecord> {
        self.results
            .iter()
            .filter_map(|outcome| match outcome {
                ProcessingOutcome::DryRun(record) => Some(record),
                _ => None,
            })
            .collect()
    }

    /// Look up the outcome for a relative path
    pub fn outcome_for(&self, path: &str) -> Option<&ProcessingOutcome> {
        self.results.iter().find(|outcome| outcome.path() == path)
    }

    /// Whether any error record was produced
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Collects job messages into a [`RunReport`]
///
/// Owned by the scheduler task; workers only ever talk to it through the
/// channel.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    report: RunReport,
}

impl ResultAggregator {
    /// Create an empty aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a single message
    pub fn record(&mut self, message: JobMessage) {
        match message {
            JobMessage::Finished(outcome) => {
                if let Some(record) = outcome.error_record() {
                    self.report.errors.push(record);
                }
                self.report.results.push(outcome);
            }
            JobMessage::Panicked { path, error } => {
                self.report
                    .errors
                    .push(ErrorRecord::new(path, error, ErrorKind::JobPanic));
            }
        }
    }

    /// Number of messages recorded so far
    pub fn received(&self) -> usize {
        self.report.results.len()
            + self
                .report
                .errors
                .iter()
                .filter(|e| e.error_type == ErrorKind::JobPanic)
                .count()
    }

    /// Finish aggregation
    pub fn into_report(mut self, elapsed: Duration) -> RunReport {
        self.report.elapsed = elapsed;
        self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dry_run(path: &str, source: DateSource) -> ProcessingOutcome {
        ProcessingOutcome::DryRun(DryRunRecord {
            path: path.to_string(),
            metadata: Mapping::new(),
            date_source: source,
            ai_date: None,
            ai_confidence: 0.0,
        })
    }

    #[test]
    fn test_outcome_path() {
        assert_eq!(dry_run("a.md", DateSource::AI).path(), "a.md");
        let skipped = ProcessingOutcome::Skipped {
            path: "b.md".to_string(),
        };
        assert_eq!(skipped.path(), "b.md");
        assert_eq!(skipped.date_source(), None);
    }

    #[test]
    fn test_failures_produce_error_records() {
        let mut aggregator = ResultAggregator::new();
        aggregator.record(JobMessage::Finished(ProcessingOutcome::ReadFailed {
            path: "missing.md".to_string(),
            error: "No such file".to_string(),
        }));
        aggregator.record(JobMessage::Finished(ProcessingOutcome::WriteFailed {
            path: "locked.md".to_string(),
            error: "Permission denied".to_string(),
        }));
        aggregator.record(JobMessage::Finished(dry_run("ok.md", DateSource::Filename)));

        let report = aggregator.into_report(Duration::ZERO);
        assert_eq!(report.results.len(), 3);
        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.errors[0].error_type, ErrorKind::ReadError);
        assert_eq!(report.errors[0].filepath, "missing.md");
        assert_eq!(report.errors[1].error_type, ErrorKind::WriteError);
    }

    #[test]
    fn test_panic_becomes_error_record() {
        let mut aggregator = ResultAggregator::new();
        aggregator.record(JobMessage::Panicked {
            path: "boom.md".to_string(),
            error: "task panicked".to_string(),
        });
        assert_eq!(aggregator.received(), 1);

        let report = aggregator.into_report(Duration::ZERO);
        assert!(report.results.is_empty());
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].error_type, ErrorKind::JobPanic);
        assert_eq!(report.errors[0].filepath, "boom.md");
    }

    #[test]
    fn test_dry_run_records_filtered() {
        let mut aggregator = ResultAggregator::new();
        aggregator.record(JobMessage::Finished(dry_run("a.md", DateSource::AI)));
        aggregator.record(JobMessage::Finished(ProcessingOutcome::Skipped {
            path: "b.md".to_string(),
        }));
        let report = aggregator.into_report(Duration::ZERO);

        let records = report.dry_run_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].path, "a.md");
        assert!(report.outcome_for("b.md").is_some());
        assert!(!report.has_errors());
    }

    #[test]
    fn test_error_record_serializes_kind_as_string() {
        let record = ErrorRecord::new("x.md", "boom", ErrorKind::WriteError);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["error_type"], "WriteError");
        assert_eq!(json["filepath"], "x.md");
        assert!(json["timestamp"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn test_dry_run_record_json_shape() {
        let mut metadata = Mapping::new();
        metadata.insert("title".into(), "Café notes".into());
        let record = DryRunRecord {
            path: "notes/café.md".to_string(),
            metadata,
            date_source: DateSource::FileSystem,
            ai_date: Some("2024-01-01".to_string()),
            ai_confidence: 0.5,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["metadata"]["title"], "Café notes");
        assert_eq!(json["date_source"], "FileSystem");
        assert_eq!(json["ai_confidence"], 0.5);
    }

    #[test]
    fn test_non_string_header_keys_serialize() {
        let header: Mapping =
            serde_yaml::from_str("~: odd\n? [a, b]\n: seq\n42: answer\nnested: {true: yes, ~: x}\ntitle: t\n")
                .unwrap();
        let record = DryRunRecord {
            path: "odd.md".to_string(),
            metadata: header,
            date_source: DateSource::FileSystem,
            ai_date: None,
            ai_confidence: 0.0,
        };

        let text = serde_json::to_string(&[&record]).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        let meta = &json[0]["metadata"];
        assert_eq!(meta["null"], "odd");
        assert_eq!(meta["42"], "answer");
        assert_eq!(meta["nested"]["true"], "yes");
        assert_eq!(meta["nested"]["null"], "x");
        assert_eq!(meta["title"], "t");
        assert_eq!(meta.as_object().unwrap().len(), 5);
    }

    #[test]
    fn test_header_key_order_preserved() {
        let header: Mapping = serde_yaml::from_str("zeta: 1\nalpha: 2\n").unwrap();
        let record = DryRunRecord {
            path: "a.md".to_string(),
            metadata: header,
            date_source: DateSource::AI,
            ai_date: None,
            ai_confidence: 0.0,
        };
        let text = serde_json::to_string(&record).unwrap();
        assert!(text.find("zeta").unwrap() < text.find("alpha").unwrap());
    }
}
