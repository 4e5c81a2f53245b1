//! Tag normalization
//!
//! Models return tags in many shapes: a proper list, a comma-separated string,
//! a string containing a YAML list, or a lone scalar. Everything is coerced
//! into an ordered list of trimmed, non-empty strings.

use serde_yaml::Value;

/// Normalize a loosely typed `tags` value into a list of strings
///
/// - `null` → empty list
/// - sequence → each element stringified and trimmed, empties dropped
/// - string → parsed as YAML; a sequence result is used as above,
///   otherwise the string is split on commas
/// - any other scalar → single-element list of its string form
///
/// No cap is applied here; callers truncate.
pub fn normalize_tags(raw: &Value) -> Vec<String> {
    match raw {
        Value::Null => Vec::new(),
        Value::Sequence(items) => from_sequence(items),
        Value::String(s) => match serde_yaml::from_str::<Value>(s) {
            Ok(Value::Sequence(items)) => from_sequence(&items),
            _ => s
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
        },
        other => {
            let tag = value_to_string(other);
            let tag = tag.trim();
            if tag.is_empty() {
                Vec::new()
            } else {
                vec![tag.to_string()]
            }
        }
    }
}

fn from_sequence(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .map(value_to_string)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Render a scalar YAML value as plain text
///
/// Null renders as the empty string; collections fall back to their YAML form.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn test_null_is_empty() {
        assert!(normalize_tags(&Value::Null).is_empty());
    }

    #[test]
    fn test_sequence_is_trimmed() {
        let tags = normalize_tags(&yaml("[' rust ', '', async, 42]"));
        assert_eq!(tags, vec!["rust", "async", "42"]);
    }

    #[test]
    fn test_sequence_drops_nulls() {
        let tags = normalize_tags(&yaml("[rust, null, ~]"));
        assert_eq!(tags, vec!["rust"]);
    }

    #[test]
    fn test_comma_separated_string() {
        let tags = normalize_tags(&Value::String("rust, tokio ,, notes".to_string()));
        assert_eq!(tags, vec!["rust", "tokio", "notes"]);
    }

    #[test]
    fn test_bracket_list_string() {
        let tags = normalize_tags(&Value::String("['alpha', 'beta']".to_string()));
        assert_eq!(tags, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_dash_list_string() {
        let tags = normalize_tags(&Value::String("- alpha\n- beta\n".to_string()));
        assert_eq!(tags, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_other_scalar() {
        assert_eq!(normalize_tags(&yaml("2024")), vec!["2024"]);
        assert_eq!(normalize_tags(&Value::Bool(true)), vec!["true"]);
    }

    #[test]
    fn test_unicode_preserved() {
        let tags = normalize_tags(&Value::String("日本語, café".to_string()));
        assert_eq!(tags, vec!["日本語", "café"]);
    }
}
