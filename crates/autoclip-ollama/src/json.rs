//! Extract a JSON value from raw model output.
//!
//! Models wrap JSON in markdown fences or surround it with prose. The parser
//! accepts, in order: the body of the first fenced block, the whole text, and
//! finally the span from the first opening bracket to the last matching
//! closing bracket.

use crate::error::{OllamaError, OllamaResult};
use serde_json::Value;

/// Parse model output into a JSON value of any shape.
pub fn parse_json_response(raw: &str) -> OllamaResult<Value> {
    let text = strip_code_fence(raw.trim());
    if text.is_empty() {
        return Err(OllamaError::ParseError("empty response".to_string()));
    }

    if let Ok(value) = serde_json::from_str(text) {
        return Ok(value);
    }

    let span = json_span(text)
        .ok_or_else(|| OllamaError::ParseError("no JSON object or array found".to_string()))?;

    serde_json::from_str(span).map_err(|e| OllamaError::ParseError(e.to_string()))
}

fn strip_code_fence(text: &str) -> &str {
    let Some(start) = text.find("```") else {
        return text;
    };

    let after = &text[start + 3..];
    // Skip the language tag line (```json)
    let body_start = after.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &after[body_start..];

    match body.find("```") {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}

fn json_span(text: &str) -> Option<&str> {
    let start = text.find(|c: char| c == '{' || c == '[')?;
    let close = if text[start..].starts_with('{') { '}' } else { ']' };
    let end = text.rfind(close)?;

    if end > start {
        Some(&text[start..=end])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_json() {
        let value = parse_json_response(r#"{"1": {"opening": "你好"}}"#).unwrap();
        assert_eq!(value["1"]["opening"], "你好");
    }

    #[test]
    fn test_fenced_json() {
        let raw = "好的，以下是解说文稿：\n```json\n{\"1\": {\"closing\": \"再见\"}}\n```\n希望对你有帮助。";
        let value = parse_json_response(raw).unwrap();
        assert_eq!(value, json!({"1": {"closing": "再见"}}));
    }

    #[test]
    fn test_fence_on_one_line() {
        let value = parse_json_response("```json {\"a\": 1}```").unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn test_json_embedded_in_prose() {
        let raw = "Here you go: {\"2\": {\"key_points\": [\"a\", \"b\"]}} -- done";
        let value = parse_json_response(raw).unwrap();
        assert_eq!(value["2"]["key_points"], json!(["a", "b"]));
    }

    #[test]
    fn test_non_mapping_values_are_returned() {
        assert_eq!(parse_json_response("[1, 2]").unwrap(), json!([1, 2]));
        assert_eq!(parse_json_response("\"just text\"").unwrap(), json!("just text"));
    }

    #[test]
    fn test_unparseable_output() {
        assert!(matches!(
            parse_json_response("抱歉，我无法完成这个任务。"),
            Err(OllamaError::ParseError(_))
        ));
        assert!(matches!(parse_json_response("   "), Err(OllamaError::ParseError(_))));
        assert!(matches!(
            parse_json_response("{\"broken\": "),
            Err(OllamaError::ParseError(_))
        ));
    }
}
