//! Document model - header block parsing, merging and rendering
//!
//! A document is plain text with an optional leading YAML header:
//!
//! ```text
//! ---
//! title: Weekly notes
//! tags: [work]
//! ---
//!
//! Body text...
//! ```

use crate::date::DateResolution;
use crate::metadata::MAX_TAGS;
use crate::tags::normalize_tags;
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Marker line delimiting the header block
pub const HEADER_DELIMITER: &str = "---";

/// Header key holding the document title
pub const TITLE_KEY: &str = "title";
/// Header key holding the tag list
pub const TAGS_KEY: &str = "tags";
/// Header key holding the generated summary
pub const SUMMARY_KEY: &str = "summary";
/// Header key holding the body word count
pub const WORD_COUNT_KEY: &str = "wordCount";
/// Header key holding the resolved date
pub const DATE_KEY: &str = "Date";
/// Header key marking a document as already processed
pub const PROCESSED_KEY: &str = "autoAiTag";

/// Errors that can occur while rendering a document
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The header could not be serialized
    #[error("Header serialization error: {0}")]
    Serialize(String),
}

/// A document loaded for a single processing job
#[derive(Debug, Clone)]
pub struct Document {
    /// Location on disk
    pub path: PathBuf,

    /// Parsed header block (insertion-ordered)
    pub header: Mapping,

    /// Everything after the header block
    pub body: String,

    /// Whether the original content had a header block
    pub had_header: bool,
}

impl Document {
    /// Build a document from its path and raw content
    pub fn parse(path: impl Into<PathBuf>, content: &str) -> Self {
        let (header, body, had_header) = split_header(content);
        Self {
            path: path.into(),
            header,
            body,
            had_header,
        }
    }

    /// Whether the header carries a truthy `autoAiTag`
    pub fn is_processed(&self) -> bool {
        self.header.get(PROCESSED_KEY).is_some_and(is_truthy)
    }

    /// Title derived from the file name (stem without extension)
    pub fn file_stem(&self) -> String {
        file_stem(&self.path)
    }

    /// Insert the filename-derived title unless a `title` key already exists
    pub fn ensure_title(&mut self) {
        if !self.header.contains_key(TITLE_KEY) {
            let title = self.file_stem();
            self.header.insert(Value::from(TITLE_KEY), Value::from(title));
        }
    }

    /// Number of whitespace-separated words in the body
    pub fn word_count(&self) -> usize {
        self.body.split_whitespace().count()
    }

    /// Body length in characters (not bytes)
    pub fn body_chars(&self) -> usize {
        self.body.chars().count()
    }

    /// Store the current word count in the header
    pub fn update_word_count(&mut self) {
        let count = self.word_count() as u64;
        self.header.insert(Value::from(WORD_COUNT_KEY), Value::from(count));
    }

    /// Overwrite the summary; empty summaries leave the header untouched
    pub fn set_summary(&mut self, summary: &str) {
        if !summary.is_empty() {
            self.header.insert(Value::from(SUMMARY_KEY), Value::from(summary));
        }
    }

    /// Append candidate tags that are not already present
    ///
    /// An existing mapping contributes its keys. Matching is exact string
    /// comparison. At most [`MAX_TAGS`] new tags are
    /// appended; the header is only modified when at least one is. Returns
    /// the number of tags appended.
    pub fn merge_tags(&mut self, candidates: &[String]) -> usize {
        let existing: Vec<Value> = match self.header.get(TAGS_KEY) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Sequence(items)) => items.clone(),
            Some(Value::Mapping(map)) => map.keys().cloned().collect(),
            Some(other) => normalize_tags(other).into_iter().map(Value::String).collect(),
        };

        let mut added: Vec<Value> = Vec::new();
        for tag in candidates {
            if added.len() == MAX_TAGS {
                break;
            }
            let value = Value::String(tag.clone());
            if existing.contains(&value) || added.contains(&value) {
                continue;
            }
            added.push(value);
        }

        let count = added.len();
        if count > 0 {
            let mut merged = existing;
            merged.extend(added);
            self.header.insert(Value::from(TAGS_KEY), Value::Sequence(merged));
        }
        count
    }

    /// Store the resolved date
    pub fn set_date(&mut self, resolution: &DateResolution) {
        self.header
            .insert(Value::from(DATE_KEY), Value::from(resolution.date.clone()));
    }

    /// Set the `autoAiTag` sentinel
    pub fn mark_processed(&mut self) {
        self.header.insert(Value::from(PROCESSED_KEY), Value::Bool(true));
    }

    /// Render header and body back into file content
    pub fn render(&self) -> Result<String, DocumentError> {
        render(&self.header, &self.body)
    }
}

/// Split raw content into `(header, body, had_header)`
///
/// Content starting with the delimiter is split on its first two occurrences.
/// A header that fails to parse, or parses to something other than a mapping,
/// becomes an empty mapping.
pub fn split_header(content: &str) -> (Mapping, String, bool) {
    if content.starts_with(HEADER_DELIMITER) {
        let parts: Vec<&str> = content.splitn(3, HEADER_DELIMITER).collect();
        if let [_, header_text, body] = parts.as_slice() {
            let header = match serde_yaml::from_str::<Value>(header_text.trim()) {
                Ok(Value::Mapping(mapping)) => mapping,
                _ => Mapping::new(),
            };
            return (header, body.to_string(), true);
        }
    }
    (Mapping::new(), content.to_string(), false)
}

/// Dump a header mapping as block-style YAML, keeping key order
pub fn serialize_header(header: &Mapping) -> Result<String, DocumentError> {
    serde_yaml::to_string(header).map_err(|e| DocumentError::Serialize(e.to_string()))
}

/// Render a header and body as `---\n<header>---\n\n<body>`
///
/// Leading newlines of the body are stripped so exactly one blank line
/// separates the header block from the body.
pub fn render(header: &Mapping, body: &str) -> Result<String, DocumentError> {
    let header_text = serialize_header(header)?;
    Ok(format!(
        "{delim}\n{header_text}{delim}\n\n{}",
        body.trim_start_matches('\n'),
        delim = HEADER_DELIMITER,
    ))
}

/// File stem of a path, lossily converted
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// YAML truthiness: false, null, zero, and empty strings or collections are falsy
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Sequence(items) => !items.is_empty(),
        Value::Mapping(map) => !map.is_empty(),
        Value::Tagged(tagged) => is_truthy(&tagged.value),
    }
}
