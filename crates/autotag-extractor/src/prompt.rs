//! LLM prompt engineering for metadata extraction

use autotag_domain::{AI_CONFIDENCE_THRESHOLD, MAX_SUMMARY_WORDS, MAX_TAGS};

/// Fixed system instruction sent with every request
pub const SYSTEM_PROMPT: &str =
    "You are a metadata assistant. Return only JSON or YAML representing metadata (no extra commentary).";

/// Builds the user prompt for a single document
pub struct PromptBuilder<'a> {
    text: &'a str,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder for a document body
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::with_capacity(self.text.len() + 768);

        prompt.push_str("Given the following note text, return a JSON or YAML object with these keys:\n");
        prompt.push_str(&format!(
            "- summary: a concise summary of maximum {} words\n",
            MAX_SUMMARY_WORDS
        ));
        prompt.push_str(&format!(
            "- tags: a list (up to {}) of short keyword tags\n",
            MAX_TAGS
        ));
        prompt.push_str(
            "- date: a date found in the text (YYYY-MM-DD format) if present, null if none found\n",
        );
        prompt.push_str(
            "- date_confidence: confidence level (0.0 to 1.0) that the extracted date is accurate\n\n",
        );
        prompt.push_str(&format!(
            "For date detection, look for dates near the beginning of the text. \
             Only return a date if you are very confident (confidence > {}).\n",
            AI_CONFIDENCE_THRESHOLD
        ));
        prompt.push_str("Return only the object (JSON or YAML), no extra commentary.\n\n");

        prompt.push_str(self.text);
        prompt
    }
}
