//! AnalysisResult and the reply parser.
//!
//! The model is asked for a single JSON object but may wrap it in prose. The
//! parser takes everything from the first `{` to the last `}` and requires the
//! object to carry `overallScore` or `error`. No defaults are applied here;
//! the report renderer fills gaps at display time.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::errors::AppError;

/// Structured review as returned by the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(default, deserialize_with = "lenient_score")]
    pub overall_score: Option<i64>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub performance_metrics: BTreeMap<String, Value>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub action_items: Option<Vec<String>>,
    #[serde(default)]
    pub pro_tips: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_error")]
    pub error: Option<String>,
}

/// Reads a score given as an integer, a float (rounded) or a numeric string.
/// Anything else is treated as absent.
fn lenient_score<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(score_from_value))
}

/// Accepts `"msg"` as well as `{"message": "msg"}`.
fn lenient_error<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(error_message))
}

/// `null`, `false` and blank strings mean "no error".
fn error_message(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Object(map) => match map.get("message") {
            Some(message) => error_message(message),
            None => Some(value.to_string()),
        },
        other => Some(other.to_string()),
    }
}

/// Shared with the renderer for metric values.
pub fn score_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.round() as i64)),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| f.round() as i64),
        _ => None,
    }
}

/// Returns the greedy `{ ... }` region of `reply`, if any.
pub fn extract_json_object(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    (end > start).then(|| &reply[start..=end])
}

/// Parses a model reply into an `AnalysisResult`.
///
/// An `error` field is returned as-is inside the result; turning it into a
/// failure is the caller's job.
pub fn parse_ai_response(reply: &str) -> Result<AnalysisResult, AppError> {
    let json = extract_json_object(reply)
        .ok_or_else(|| AppError::Parse("no JSON object found in reply".to_string()))?;

    let parsed: Value =
        serde_json::from_str(json).map_err(|e| AppError::Parse(format!("invalid JSON: {e}")))?;

    let has_score = parsed.get("overallScore").and_then(score_from_value).is_some();
    let has_error = parsed.get("error").and_then(error_message).is_some();
    if !has_score && !has_error {
        return Err(AppError::Parse(
            "reply has neither overallScore nor error".to_string(),
        ));
    }

    serde_json::from_value(parsed)
        .map_err(|e| AppError::Parse(format!("unexpected reply shape: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_success_reply() {
        let result = parse_ai_response(r#"{"overallScore":7,"strengths":["a"]}"#).unwrap();
        assert_eq!(result.overall_score, Some(7));
        assert_eq!(result.strengths, vec!["a".to_string()]);
        assert!(result.improvements.is_empty());
        assert!(result.error.is_none());
    }

    #[test]
    fn test_not_json_is_parse_error() {
        assert!(matches!(
            parse_ai_response("not json"),
            Err(AppError::Parse(_))
        ));
    }

    #[test]
    fn test_no_braces_is_parse_error() {
        let err = parse_ai_response("I'm sorry, I cannot review this document.").unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
        assert!(err.to_string().contains("no JSON object"));
    }

    #[test]
    fn test_invalid_json_between_braces_is_parse_error() {
        assert!(matches!(
            parse_ai_response("{overallScore: seven}"),
            Err(AppError::Parse(_))
        ));
    }

    #[test]
    fn test_closing_brace_before_opening_is_parse_error() {
        assert!(matches!(
            parse_ai_response("} nothing {"),
            Err(AppError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_score_and_error_is_parse_error() {
        let err = parse_ai_response(r#"{"strengths":["a"],"summary":"ok"}"#).unwrap_err();
        assert!(err.to_string().contains("neither overallScore nor error"));
    }

    #[test]
    fn test_null_score_does_not_count_as_signal() {
        assert!(parse_ai_response(r#"{"overallScore":null}"#).is_err());
    }

    #[test]
    fn test_zero_score_is_a_valid_signal() {
        let result = parse_ai_response(r#"{"overallScore":0}"#).unwrap();
        assert_eq!(result.overall_score, Some(0));
    }

    #[test]
    fn test_error_field_is_returned_in_result() {
        let result = parse_ai_response(r#"{"error":"quota exceeded"}"#).unwrap();
        assert_eq!(result.error.as_deref(), Some("quota exceeded"));
    }

    #[test]
    fn test_structured_error_field_is_described() {
        let result = parse_ai_response(r#"{"error":{"message":"document unreadable"}}"#).unwrap();
        assert_eq!(result.error.as_deref(), Some("document unreadable"));
    }

    #[test]
    fn test_json_wrapped_in_prose_and_fences() {
        let reply = "Here is your review:\n```json\n{\n  \"overallScore\": 8,\n  \"summary\": \"Solid\"\n}\n```\nGood luck!";
        let result = parse_ai_response(reply).unwrap();
        assert_eq!(result.overall_score, Some(8));
        assert_eq!(result.summary, "Solid");
    }

    #[test]
    fn test_greedy_match_spans_first_to_last_brace() {
        // Two separate objects: the greedy region covers both and is not valid JSON.
        let reply = r#"{"overallScore":5} and also {"overallScore":6}"#;
        assert_eq!(
            extract_json_object(reply),
            Some(r#"{"overallScore":5} and also {"overallScore":6}"#)
        );
        assert!(matches!(parse_ai_response(reply), Err(AppError::Parse(_))));
    }

    #[test]
    fn test_nested_objects_are_kept_whole() {
        let reply = r#"{"overallScore":6,"performanceMetrics":{"formatting":8,"keywordUsage":4}}"#;
        let result = parse_ai_response(reply).unwrap();
        assert_eq!(result.performance_metrics["formatting"], json!(8));
        assert_eq!(result.performance_metrics.len(), 2);
    }

    #[test]
    fn test_full_reply_fields() {
        let reply = json!({
            "overallScore": 7,
            "strengths": ["Clear layout"],
            "improvements": ["Add metrics"],
            "summary": "Good base",
            "performanceMetrics": {"formatting": 8},
            "keywords": ["Kubernetes"],
            "actionItems": ["Quantify impact"],
            "proTips": ["Tailor per role"]
        })
        .to_string();
        let result = parse_ai_response(&reply).unwrap();
        assert_eq!(result.keywords, vec!["Kubernetes".to_string()]);
        assert_eq!(result.action_items, Some(vec!["Quantify impact".to_string()]));
        assert_eq!(result.pro_tips, Some(vec!["Tailor per role".to_string()]));
    }

    #[test]
    fn test_optional_lists_stay_none_when_absent() {
        let result = parse_ai_response(r#"{"overallScore":7}"#).unwrap();
        assert!(result.action_items.is_none());
        assert!(result.pro_tips.is_none());
        assert!(result.performance_metrics.is_empty());
    }

    #[test]
    fn test_wrong_field_type_is_parse_error() {
        assert!(matches!(
            parse_ai_response(r#"{"overallScore":7,"strengths":"just one"}"#),
            Err(AppError::Parse(_))
        ));
    }

    #[test]
    fn test_lenient_scores() {
        assert_eq!(parse_ai_response(r#"{"overallScore":7.6}"#).unwrap().overall_score, Some(8));
        assert_eq!(parse_ai_response(r#"{"overallScore":"6"}"#).unwrap().overall_score, Some(6));
    }

    #[test]
    fn test_unreadable_score_is_not_a_signal() {
        for reply in [
            r#"{"overallScore":"high"}"#,
            r#"{"overallScore":"NaN"}"#,
            r#"{"overallScore":"inf"}"#,
            r#"{"overallScore":{"value":7}}"#,
            r#"{"overallScore":true}"#,
        ] {
            assert!(
                matches!(parse_ai_response(reply), Err(AppError::Parse(_))),
                "{reply} should be rejected"
            );
        }
    }

    #[test]
    fn test_blank_or_false_error_is_absent() {
        let result = parse_ai_response(r#"{"overallScore":7,"error":""}"#).unwrap();
        assert_eq!(result.error, None);
        let result = parse_ai_response(r#"{"overallScore":7,"error":false}"#).unwrap();
        assert_eq!(result.error, None);
        let result = parse_ai_response(r#"{"overallScore":7,"error":"   "}"#).unwrap();
        assert_eq!(result.error, None);
    }

    #[test]
    fn test_blank_or_false_error_alone_is_parse_error() {
        for reply in [r#"{"error":""}"#, r#"{"error":false}"#, r#"{"error":{"message":""}}"#] {
            assert!(
                matches!(parse_ai_response(reply), Err(AppError::Parse(_))),
                "{reply} should be rejected"
            );
        }
    }

    #[test]
    fn test_parsing_is_idempotent() {
        let reply = r#"Sure! {"overallScore":9,"strengths":["x","y"],"keywords":["Rust"]}"#;
        let first = parse_ai_response(reply).unwrap();
        let second = parse_ai_response(reply).unwrap();
        assert_eq!(first, second);
    }
}
