//! Response parsing: pull the most relevant text out of whatever the
//! endpoint sends back.

use serde_json::Value;
use tracing::debug;

/// Conventional field names probed in order. The endpoint's response shape is
/// not contractually fixed, so this precedence table is a compatibility
/// contract and must not be reordered.
pub const COMMON_KEYS: [&str; 6] = [
    "summary",
    "summarization",
    "result",
    "output",
    "text",
    "content",
];

pub struct ResponseParser;

impl ResponseParser {
    /// Extract usable text from a raw response body.
    ///
    /// The body is parsed as JSON when possible; anything else is treated as
    /// a plain string. `None` means "no usable content" — for a success
    /// status that is the async still-working signal, not an error.
    pub fn extract(body: &str) -> Option<String> {
        match serde_json::from_str::<Value>(body) {
            Ok(value) => Self::extract_value(&value),
            Err(_) => {
                debug!("response body is not JSON, treating as plain text");
                Self::extract_value(&Value::String(body.to_string()))
            }
        }
    }

    /// Extract usable text from an already-parsed response value.
    pub fn extract_value(value: &Value) -> Option<String> {
        match value {
            Value::Null => {
                debug!("response is null");
                None
            }
            Value::String(s) => {
                if s.trim().is_empty() {
                    debug!("response is an empty string");
                    None
                } else {
                    debug!("returning string response ({} chars)", s.len());
                    Some(s.clone())
                }
            }
            Value::Object(map) => {
                debug!("checking for common keys: {:?}", COMMON_KEYS);
                for key in COMMON_KEYS {
                    let Some(field) = map.get(key) else { continue };
                    match field {
                        Value::String(s) if !s.trim().is_empty() => {
                            debug!("extracted from key '{}' ({} chars)", key, s.len());
                            return Some(s.clone());
                        }
                        Value::String(_) => {
                            debug!("key '{}' is blank, continuing", key);
                        }
                        Value::Object(_) => {
                            debug!("key '{}' holds an object, returning as JSON", key);
                            return serde_json::to_string_pretty(field).ok();
                        }
                        other => {
                            debug!("key '{}' holds {}, stringifying", key, type_name(other));
                            return Some(other.to_string());
                        }
                    }
                }
                if map.is_empty() {
                    debug!("response object is empty");
                    return None;
                }
                debug!("no common key present, returning whole object as JSON");
                serde_json::to_string_pretty(value).ok()
            }
            other => {
                let s = other.to_string();
                if s.trim().is_empty() {
                    debug!("response is empty after stringification");
                    None
                } else {
                    debug!("stringified {} response ({} chars)", type_name(other), s.len());
                    Some(s)
                }
            }
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_text_body_is_returned_as_is() {
        assert_eq!(
            ResponseParser::extract("processing started"),
            Some("processing started".to_string())
        );
    }

    #[test]
    fn blank_body_is_no_content() {
        assert_eq!(ResponseParser::extract(""), None);
        assert_eq!(ResponseParser::extract("   \n  "), None);
    }

    #[test]
    fn json_null_is_no_content() {
        assert_eq!(ResponseParser::extract("null"), None);
    }

    #[test]
    fn json_string_body_unwraps() {
        assert_eq!(
            ResponseParser::extract("\"all done\""),
            Some("all done".to_string())
        );
    }

    #[test]
    fn summary_key_wins_over_later_keys() {
        let value = json!({"text": "secondary", "summary": "primary"});
        assert_eq!(
            ResponseParser::extract_value(&value),
            Some("primary".to_string())
        );
    }

    #[test]
    fn blank_key_value_falls_through_to_next_key() {
        let value = json!({"summary": "   ", "result": "fallback"});
        assert_eq!(
            ResponseParser::extract_value(&value),
            Some("fallback".to_string())
        );
    }

    #[test]
    fn object_under_common_key_is_pretty_printed() {
        let value = json!({"output": {"a": 1}});
        let extracted = ResponseParser::extract_value(&value).unwrap();
        assert!(extracted.contains("\"a\": 1"));
    }

    #[test]
    fn numeric_value_under_common_key_is_stringified() {
        let value = json!({"result": 42});
        assert_eq!(ResponseParser::extract_value(&value), Some("42".to_string()));
    }

    #[test]
    fn unknown_shape_is_pretty_printed_whole() {
        let value = json!({"status": "ok", "elapsed": 3});
        let extracted = ResponseParser::extract_value(&value).unwrap();
        assert!(extracted.contains("\"status\": \"ok\""));
        assert!(extracted.contains("\"elapsed\": 3"));
    }

    #[test]
    fn empty_object_is_no_content() {
        assert_eq!(ResponseParser::extract("{}"), None);
    }

    #[test]
    fn array_body_is_stringified() {
        let extracted = ResponseParser::extract("[1,2,3]").unwrap();
        assert_eq!(extracted, "[1,2,3]");
    }
}
