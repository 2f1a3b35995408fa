use lazy_static::lazy_static;
use regex::Regex;
use std::panic::AssertUnwindSafe;
use thiserror::Error;

use super::LlmResponse;

lazy_static! {
    /// A comma directly followed by a closing brace or bracket
    static ref TRAILING_COMMA_RE: Regex = Regex::new(r",(\s*[}\]])").unwrap();

    /// `"a" + "b"` style concatenation that some models emit inside JSON
    static ref STRING_CONCAT_RE: Regex = Regex::new(r#""\s*\+\s*""#).unwrap();

    /// Opening fence with an optional language tag
    static ref FENCE_RE: Regex = Regex::new(r"```[A-Za-z0-9_-]*[ \t]*\r?\n?").unwrap();
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("model output is empty")]
    Empty,

    #[error("model output contains no JSON object")]
    NoObject,

    #[error("JSON object in model output is never closed")]
    Unclosed,
}

/// Locate the JSON object inside model output.
///
/// Fenced blocks (```json or bare ```) win over surrounding prose. Inside
/// the chosen region the first balanced `{...}` is returned, with braces in
/// string literals ignored. An unclosed object is returned as-is so the
/// repair stage can try to finish it.
pub fn extract_json(text: &str) -> Result<&str, ExtractError> {
    let region = fenced_region(text).unwrap_or(text).trim();
    if region.is_empty() {
        return Err(ExtractError::Empty);
    }

    let start = region.find('{').ok_or(ExtractError::NoObject)?;
    match balanced_end(&region[start..]) {
        Some(len) => Ok(&region[start..start + len]),
        None if region[start..].len() > 1 => Ok(&region[start..]),
        None => Err(ExtractError::Unclosed),
    }
}

fn fenced_region(text: &str) -> Option<&str> {
    let open = FENCE_RE.find(text)?;
    let body = &text[open.end()..];
    let close = body.find("```").unwrap_or(body.len());
    Some(&body[..close])
}

/// Byte length of the balanced object at the start of `s`
fn balanced_end(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' | '[' => depth += 1,
            '}' | ']' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + c.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}

pub fn fix_trailing_commas(json: &str) -> String {
    TRAILING_COMMA_RE.replace_all(json, "$1").into_owned()
}

pub fn fix_string_concatenation(json: &str) -> String {
    STRING_CONCAT_RE.replace_all(json, "").into_owned()
}

fn repair(json: &str) -> Option<String> {
    let options = llm_json::RepairOptions::default();
    let attempt =
        std::panic::catch_unwind(AssertUnwindSafe(|| llm_json::repair_json(json, &options)));
    match attempt {
        Ok(Ok(repaired)) => Some(repaired),
        Ok(Err(e)) => {
            tracing::debug!("llm_json could not repair output: {:?}", e);
            None
        }
        Err(_) => {
            tracing::warn!("llm_json panicked while repairing output");
            None
        }
    }
}

fn decode<T: LlmResponse>(json: &str) -> Option<T> {
    serde_json::from_str(json).ok()
}

fn try_parse<T: LlmResponse>(text: &str) -> Result<T, String> {
    let json = extract_json(text).map_err(|e| e.to_string())?;

    if let Some(parsed) = decode::<T>(json) {
        return Ok(parsed);
    }

    let fixed = fix_trailing_commas(&fix_string_concatenation(json));
    if let Some(parsed) = decode::<T>(&fixed) {
        tracing::debug!("Model output parsed after quick fixes");
        return Ok(parsed);
    }

    if let Some(parsed) = repair(&fixed).and_then(|r| decode::<T>(&r)) {
        tracing::debug!("Model output parsed after llm_json repair");
        return Ok(parsed);
    }

    Err(format!(
        "Unparseable model output: {}",
        json.chars().take(200).collect::<String>()
    ))
}

/// Parse model output into `T`, returning `T`'s fallback when every
/// strategy fails. Never errors.
pub fn parse_with_fallback<T: LlmResponse>(text: &str) -> T {
    match try_parse::<T>(text) {
        Ok(parsed) => parsed,
        Err(reason) => {
            tracing::warn!("Falling back after parse failure: {}", reason);
            T::fallback(reason)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemars::JsonSchema;
    use serde::Deserialize;

    fn yes() -> bool {
        true
    }

    #[derive(Debug, Default, Deserialize, JsonSchema)]
    struct Verdict {
        pub score: f64,
        #[serde(default)]
        pub notes: Vec<String>,
        #[serde(default = "yes")]
        #[schemars(skip)]
        pub ok: bool,
        #[serde(default)]
        #[schemars(skip)]
        pub reason: Option<String>,
    }

    impl LlmResponse for Verdict {
        fn mark_as_fallback(&mut self, reason: String) {
            self.ok = false;
            self.reason = Some(reason);
        }

        fn is_success(&self) -> bool {
            self.ok
        }
    }

    #[test]
    fn test_extract_from_json_fence() {
        let text = "Berikut analisisnya:\n```json\n{\"score\": 70}\n```\nSemoga membantu.";
        assert_eq!(extract_json(text).unwrap(), r#"{"score": 70}"#);
    }

    #[test]
    fn test_extract_from_bare_fence() {
        let text = "```\n{\"score\": 1}\n```";
        assert_eq!(extract_json(text).unwrap(), r#"{"score": 1}"#);
    }

    #[test]
    fn test_extract_ignores_braces_inside_strings() {
        let text = r#"Hasil: {"notes": ["pakai {kurung}"], "score": 2} selesai {lain}"#;
        assert_eq!(
            extract_json(text).unwrap(),
            r#"{"notes": ["pakai {kurung}"], "score": 2}"#
        );
    }

    #[test]
    fn test_extract_errors() {
        assert_eq!(extract_json("   "), Err(ExtractError::Empty));
        assert_eq!(extract_json("tidak ada json"), Err(ExtractError::NoObject));
        assert_eq!(extract_json("{"), Err(ExtractError::Unclosed));
    }

    #[test]
    fn test_quick_fixes() {
        assert_eq!(
            fix_trailing_commas(r#"{"a": [1, 2,], "b": {"c": 1,},}"#),
            r#"{"a": [1, 2], "b": {"c": 1}}"#
        );
        assert_eq!(
            fix_string_concatenation(r#"{"a": "x" + "y" +  "z"}"#),
            r#"{"a": "xyz"}"#
        );
    }

    #[test]
    fn test_parse_plain() {
        let v: Verdict = parse_with_fallback(r#"{"score": 81.5, "notes": ["akses jalan baik"]}"#);
        assert!(v.is_success());
        assert_eq!(v.score, 81.5);
        assert_eq!(v.notes, vec!["akses jalan baik"]);
    }

    #[test]
    fn test_parse_after_quick_fixes() {
        let v: Verdict = parse_with_fallback(r#"{"score": 60, "notes": ["a" + "b",],}"#);
        assert!(v.is_success());
        assert_eq!(v.notes, vec!["ab"]);
    }

    #[test]
    fn test_parse_object_inside_array() {
        let v: Verdict = parse_with_fallback(r#"```json
[{"score": 42}]
```"#);
        assert!(v.is_success());
        assert_eq!(v.score, 42.0);
    }

    #[test]
    fn test_parse_truncated_output_does_not_panic() {
        let v: Verdict = parse_with_fallback(r#"{"score": 55, "notes": ["potensi wisata"#);
        assert!(v.is_success() || v.reason.is_some());
    }

    #[test]
    fn test_parse_garbage_falls_back() {
        let v: Verdict = parse_with_fallback("Maaf, saya tidak dapat membantu.");
        assert!(!v.is_success());
        assert!(v.reason.is_some());
        assert_eq!(v.score, 0.0);
    }

    #[test]
    fn test_schema_hides_internal_fields() {
        let schema = Verdict::json_schema_string();
        assert!(schema.contains("score"));
        assert!(schema.contains("notes"));
        assert!(!schema.contains("\"ok\""));
        assert!(!schema.contains("reason"));
    }
}
