//! Defensive JSON extraction from free-text model replies.
//!
//! The model may return plain JSON, JSON inside a ```json fence, JSON inside
//! an unlabeled fence, or JSON surrounded by prose. First match wins; an
//! unterminated fence yields the remainder of the string.

use serde_json::Value;

use crate::error::{Error, Result};

/// A parsed JSON object, as handed to the validator.
pub type JsonMap = serde_json::Map<String, Value>;

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// Locate the candidate payload within the raw reply.
fn candidate(response: &str) -> &str {
    if let Some(start) = response.find(JSON_FENCE) {
        let rest = &response[start + JSON_FENCE.len()..];
        match rest.find(FENCE) {
            Some(end) => &rest[..end],
            None => rest,
        }
    } else if let Some(start) = response.find(FENCE) {
        let rest = &response[start + FENCE.len()..];
        match rest.find(FENCE) {
            Some(end) => &rest[..end],
            None => rest,
        }
    } else {
        response
    }
}

/// Extract and parse the JSON object embedded in a model reply.
///
/// Never panics and never propagates a raw parser error: every failure is an
/// [`Error::Extraction`], distinguishing "no parseable content found" from
/// "malformed JSON" from "valid JSON but not an object".
pub fn extract_json(response: &str) -> Result<JsonMap> {
    let candidate = candidate(response).trim();
    if candidate.is_empty() {
        return Err(Error::extraction("no parseable content found"));
    }

    let value: Value = serde_json::from_str(candidate)
        .map_err(|e| Error::extraction(format!("malformed JSON: {}", e)))?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::extraction(format!(
            "no JSON object found (got {})",
            json_type_name(&other)
        ))),
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plain_json() {
        let map = extract_json(r#"{"is_crop_image": true}"#).unwrap();
        assert_eq!(map["is_crop_image"], Value::Bool(true));
    }

    #[test]
    fn test_extract_labeled_fence_matches_plain() {
        let payload = r#"{"is_crop_image": false, "analysis_summary": "no plant visible"}"#;
        let fenced = format!("```json\n{}\n```", payload);

        assert_eq!(extract_json(&fenced).unwrap(), extract_json(payload).unwrap());
    }

    #[test]
    fn test_extract_labeled_fence_with_surrounding_prose() {
        let response = "Here is the analysis:\n```json\n{\"is_crop_image\": true}\n```\nLet me know if you need more.";
        let map = extract_json(response).unwrap();
        assert_eq!(map["is_crop_image"], Value::Bool(true));
    }

    #[test]
    fn test_extract_unlabeled_fence() {
        let response = "```\n{\"is_crop_image\": false, \"analysis_summary\": \"a cat\"}\n```";
        let map = extract_json(response).unwrap();
        assert_eq!(map["analysis_summary"], Value::String("a cat".into()));
    }

    #[test]
    fn test_unterminated_fence_takes_the_remainder() {
        let response = "```json\n{\"is_crop_image\": true}";
        let map = extract_json(response).unwrap();
        assert_eq!(map["is_crop_image"], Value::Bool(true));
    }

    #[test]
    fn test_unterminated_fence_with_garbage_is_an_error() {
        let response = "```json\nnot json at all";
        let err = extract_json(response).unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
    }

    #[test]
    fn test_prose_without_json_is_an_extraction_error() {
        let err = extract_json("I cannot analyze this image, sorry.").unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
    }

    #[test]
    fn test_bare_json_string_is_not_an_object() {
        let err = extract_json(r#""I cannot analyze this.""#).unwrap_err();
        match err {
            Error::Extraction(msg) => assert!(msg.contains("a string")),
            other => panic!("expected extraction error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_reply_reports_no_content() {
        let err = extract_json("   \n ").unwrap_err();
        match err {
            Error::Extraction(msg) => assert!(msg.contains("no parseable content")),
            other => panic!("expected extraction error, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_fences_take_the_first_block() {
        let response = "```json\n{\"a\": 1}\n```\n```json\n{\"b\": 2}\n```";
        let map = extract_json(response).unwrap();
        assert!(map.contains_key("a"));
        assert!(!map.contains_key("b"));
    }
}
