//! Parse free-form LLM output into metadata
//!
//! Models wrap the requested object in commentary, use single quotes, emit
//! YAML instead of JSON, or over-escape unicode. Parsing is therefore layered:
//! locate the first balanced `{...}`, try it as YAML, then as strict JSON, and
//! finally try the whole response as YAML. Fields are pulled out of the
//! resulting value tree one by one with typed defaults.

use crate::error::ExtractorError;
use autotag_domain::tags::{normalize_tags, value_to_string};
use autotag_domain::ModelResult;
use serde_yaml::{Mapping, Value};
use std::borrow::Cow;
use tracing::debug;

/// Appended to summaries cut at the word limit
pub const ELLIPSIS: &str = "...";

/// Return the first balanced `{...}` region of `text`
///
/// Scanning starts at the first `{`; nesting depth is tracked and the region
/// ends at the `}` that brings depth back to zero. Returns `None` when there
/// is no `{` or the braces never balance.
pub fn extract_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    for (offset, ch) in text[start..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse a raw model response into a key/value mapping
///
/// Attempts, first success wins:
/// 1. the balanced-brace region as YAML
/// 2. the balanced-brace region as strict JSON
/// 3. the entire response as YAML
pub fn parse_response(raw: &str) -> Result<Mapping, ExtractorError> {
    let mut parsed: Option<Value> = None;

    if let Some(object) = extract_object(raw) {
        parsed = match serde_yaml::from_str::<Value>(object) {
            Ok(value) => Some(value),
            Err(yaml_err) => {
                debug!("YAML parse of extracted object failed: {}", yaml_err);
                serde_json::from_str::<Value>(object).ok()
            }
        };
    }

    if parsed.is_none() {
        parsed = serde_yaml::from_str::<Value>(raw).ok();
    }

    match parsed {
        Some(Value::Mapping(mapping)) => Ok(mapping),
        Some(other) => Err(ExtractorError::InvalidFormat(format!(
            "expected a mapping, got {}",
            kind(&other)
        ))),
        None => Err(ExtractorError::NoObject),
    }
}

/// Build a [`ModelResult`] from a parsed response with per-field defaults
///
/// - `summary`: stringified, trimmed, unicode-repaired, cut to `max_words`
/// - `tags` (or `tag` when `tags` is absent): normalized, repaired, cut to `max_tags`
/// - `date`: non-empty string or number, otherwise `None`
/// - `date_confidence`: number or numeric string, otherwise `0.0`
pub fn model_result_from_mapping(mapping: &Mapping, max_words: usize, max_tags: usize) -> ModelResult {
    let summary = mapping.get("summary").map(value_to_string).unwrap_or_default();
    let summary = unescape_literal_escapes(summary.trim());
    let summary = truncate_words(&summary, max_words).into_owned();

    let raw_tags = if mapping.contains_key("tags") {
        mapping.get("tags")
    } else {
        mapping.get("tag")
    };
    let tags = raw_tags
        .map(normalize_tags)
        .unwrap_or_default()
        .iter()
        .map(|t| unescape_literal_escapes(t).into_owned())
        .take(max_tags)
        .collect();

    let date = match mapping.get("date") {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };

    let date_confidence = match mapping.get("date_confidence") {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };

    ModelResult {
        summary,
        tags,
        date,
        date_confidence,
    }
}

/// Keep the first `max_words` whitespace-separated words, appending [`ELLIPSIS`]
///
/// Text within the limit is returned unchanged (original spacing kept).
pub fn truncate_words(text: &str, max_words: usize) -> Cow<'_, str> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() > max_words {
        Cow::Owned(format!("{}{}", words[..max_words].join(" "), ELLIPSIS))
    } else {
        Cow::Borrowed(text)
    }
}

/// Decode literal `\uXXXX` / `\UXXXXXXXX` sequences left in model output
///
/// Only strings containing `\u` or `\U` are touched. Simple escapes
/// (`\\ \n \t \r \" \'`) are decoded alongside; unknown escapes are kept
/// verbatim. A malformed unicode escape leaves the whole string unchanged.
pub fn unescape_literal_escapes(s: &str) -> Cow<'_, str> {
    if !(s.contains("\\u") || s.contains("\\U")) {
        return Cow::Borrowed(s);
    }
    match decode_escapes(s) {
        Some(decoded) => Cow::Owned(decoded),
        None => Cow::Borrowed(s),
    }
}

fn decode_escapes(s: &str) -> Option<String> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('u') => {
                let code = read_hex(&mut chars, 4)?;
                if (0xD800..0xDC00).contains(&code) {
                    // High surrogate; the low half must follow as another \u escape
                    if chars.next()? != '\\' || chars.next()? != 'u' {
                        return None;
                    }
                    let low = read_hex(&mut chars, 4)?;
                    if !(0xDC00..0xE000).contains(&low) {
                        return None;
                    }
                    let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                    out.push(char::from_u32(combined)?);
                } else {
                    out.push(char::from_u32(code)?);
                }
            }
            Some('U') => {
                let code = read_hex(&mut chars, 8)?;
                out.push(char::from_u32(code)?);
            }
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    Some(out)
}

fn read_hex(chars: &mut impl Iterator<Item = char>, digits: usize) -> Option<u32> {
    let mut value = 0u32;
    for _ in 0..digits {
        value = value * 16 + chars.next()?.to_digit(16)?;
    }
    Some(value)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: a well-formed object surrounded by brace-free noise is extracted exactly
        #[test]
        fn test_extract_object_finds_span(
            prefix in "[^{}]{0,40}",
            key in "[a-z]{1,8}",
            inner in "[a-z0-9 ]{0,20}",
            suffix in "[^{}]{0,40}",
        ) {
            let object = format!("{{\"{}\": {{\"x\": \"{}\"}}}}", key, inner);
            let text = format!("{}{}{}", prefix, object, suffix);
            prop_assert_eq!(extract_object(&text), Some(object.as_str()));
        }

        /// Property: text whose braces never close yields nothing
        #[test]
        fn test_extract_object_unbalanced_none(
            prefix in "[^{}]{0,40}",
            body in "[^{}]{0,40}",
            depth in 1usize..4,
        ) {
            let text = format!("{}{}{}", prefix, "{".repeat(depth), body);
            prop_assert_eq!(extract_object(&text), None);
        }
    }
}
