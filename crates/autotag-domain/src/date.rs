//! Date resolution - picks one canonical date per document
//!
//! Three tiers, strict precedence (no averaging):
//!
//! 1. **AI**: the model's date, when its confidence is strictly above
//!    [`AI_CONFIDENCE_THRESHOLD`]
//! 2. **Filename**: a parenthesised `(YYYY-M-D)` date in the file name
//! 3. **FileSystem**: the file's creation date

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Confidence the model must exceed (strictly) for its date to win
pub const AI_CONFIDENCE_THRESHOLD: f64 = 0.9;

static FILENAME_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(([0-9]{4})-([0-9]{1,2})-([0-9]{1,2})\)").expect("valid filename date pattern")
});

/// Where a resolved date came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DateSource {
    /// Extracted by the model with high confidence
    AI,
    /// Embedded in the file name
    Filename,
    /// Filesystem creation timestamp
    FileSystem,
}

impl DateSource {
    /// Get the source name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            DateSource::AI => "AI",
            DateSource::Filename => "Filename",
            DateSource::FileSystem => "FileSystem",
        }
    }
}

impl fmt::Display for DateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved date together with the tier that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateResolution {
    /// Date string (`YYYY-MM-DD` for the Filename and FileSystem tiers)
    pub date: String,
    /// Tier that produced the date
    pub source: DateSource,
}

/// Resolve the final date of a document
///
/// `filename` is the file's base name; `fs_creation_date` is the fallback and
/// is returned verbatim when neither of the other tiers applies.
pub fn resolve_date(
    ai_date: Option<&str>,
    ai_confidence: f64,
    filename: &str,
    fs_creation_date: &str,
) -> DateResolution {
    if let Some(date) = ai_date.filter(|d| !d.is_empty()) {
        if ai_confidence > AI_CONFIDENCE_THRESHOLD {
            return DateResolution {
                date: date.to_string(),
                source: DateSource::AI,
            };
        }
    }

    if let Some(date) = date_from_filename(filename) {
        return DateResolution {
            date,
            source: DateSource::Filename,
        };
    }

    DateResolution {
        date: fs_creation_date.to_string(),
        source: DateSource::FileSystem,
    }
}

/// Extract a `(YYYY-M-D)` date from a file name, zero-padding month and day
pub fn date_from_filename(filename: &str) -> Option<String> {
    let caps = FILENAME_DATE.captures(filename)?;
    Some(format!("{}-{:0>2}-{:0>2}", &caps[1], &caps[2], &caps[3]))
}
