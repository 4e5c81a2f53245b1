//! Metadata returned by the model service

use serde::{Deserialize, Serialize};

/// Maximum number of words kept in a generated summary
pub const MAX_SUMMARY_WORDS: usize = 50;

/// Maximum number of tags taken from a single model response
pub const MAX_TAGS: usize = 3;

/// Best-effort metadata extracted from a model response
///
/// A `ModelResult` is always produced, even when the service call or the
/// response parsing fails; in that case it is [`ModelResult::empty`].
/// `date` and `date_confidence` are passed through unvalidated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelResult {
    /// Summary of the document (at most [`MAX_SUMMARY_WORDS`] words plus an ellipsis)
    pub summary: String,

    /// Up to [`MAX_TAGS`] keyword tags
    pub tags: Vec<String>,

    /// Date found in the text (`YYYY-MM-DD` expected, not enforced)
    pub date: Option<String>,

    /// Model's confidence that `date` is accurate
    pub date_confidence: f64,
}

impl ModelResult {
    /// The all-empty result used whenever extraction fails
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether this result carries no metadata at all
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty() && self.tags.is_empty() && self.date.is_none()
    }
}
