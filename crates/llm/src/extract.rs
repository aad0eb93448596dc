//! JSON extraction from free text
//!
//! Three strategies, strictest first: a balanced-brace scan that only
//! returns candidates `serde_json` accepts, a regex sweep keeping the
//! longest brace group, and finally the span from the first `{` to the
//! last `}`. The last two may return invalid JSON; the caller's parse
//! step reports that as a validation error.

use once_cell::sync::Lazy;
use regex::Regex;

static BRACE_GROUP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[^{}]*(?:\{[^{}]*\}[^{}]*)*\}").unwrap());

/// Extract the most plausible JSON object from a sanitized response
pub fn extract_json(response: &str) -> Option<String> {
    if let Some(candidate) = balanced_scan(response) {
        return Some(candidate);
    }

    if let Some(longest) = BRACE_GROUP_RE
        .find_iter(response)
        .max_by_key(|m| m.as_str().len())
    {
        return Some(longest.as_str().to_string());
    }

    let start = response.find('{')?;
    let end = response.rfind('}')?;
    if end > start {
        return Some(response[start..=end].to_string());
    }

    None
}

/// Scan for a balanced brace group that parses as JSON
///
/// On a parse failure the scan restarts after the failed candidate, so
/// prose containing stray braces before the real payload is skipped.
fn balanced_scan(response: &str) -> Option<String> {
    let mut depth = 0usize;
    let mut start = None;

    for (i, ch) in response.char_indices() {
        match ch {
            '{' => {
                if start.is_none() {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' => {
                if depth > 0 {
                    depth -= 1;
                    if depth == 0 {
                        if let Some(s) = start {
                            let candidate = &response[s..=i];
                            if serde_json::from_str::<serde_json::Value>(candidate).is_ok() {
                                return Some(candidate.to_string());
                            }
                            start = None;
                        }
                    }
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_json() {
        assert_eq!(
            extract_json(r#"{"score_succes": 70}"#),
            Some(r#"{"score_succes": 70}"#.to_string())
        );
    }

    #[test]
    fn test_json_with_surrounding_prose() {
        let text = r#"Voici mon analyse: {"score_succes": 70} Bonne chance!"#;
        assert_eq!(extract_json(text), Some(r#"{"score_succes": 70}"#.to_string()));
    }

    #[test]
    fn test_nested_object() {
        let text = r#"{"a": {"b": 1}, "c": 2}"#;
        assert_eq!(extract_json(text), Some(text.to_string()));
    }

    #[test]
    fn test_skips_invalid_group_before_valid_one() {
        let text = r#"{pas du json} ensuite {"ok": true}"#;
        assert_eq!(extract_json(text), Some(r#"{"ok": true}"#.to_string()));
    }

    #[test]
    fn test_unbalanced_falls_back_to_span() {
        // No balanced valid group; the first-to-last span still returns
        // something for the parse step to reject with a precise error
        let text = r#"{"a": 1"#;
        assert_eq!(extract_json(text), None);

        let partial = r#"{"a": {"b": 1}"#;
        assert_eq!(extract_json(partial), Some(r#"{"b": 1}"#.to_string()));
    }

    #[test]
    fn test_no_json_at_all() {
        assert_eq!(extract_json("Je ne peux pas répondre."), None);
    }
}
