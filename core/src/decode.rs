//! Response body decoding.
//!
//! Decoding is fail-soft: an empty body, a body that is not JSON, and the
//! literal JSON `null` all decode to `None`. Nothing in this module returns an
//! error.

use serde_json::Value;

use crate::http::HttpResponse;

/// Full response body as text. Invalid UTF-8 is replaced rather than rejected.
pub fn body_text(response: &HttpResponse) -> String {
    String::from_utf8_lossy(&response.body).into_owned()
}

/// Parse `text` as JSON, yielding `None` for empty or unparseable input.
pub fn decode_payload(text: &str) -> Option<Value> {
    if text.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Null) => None,
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(error = %e, len = text.len(), "response body is not JSON");
            None
        }
    }
}

/// Read and decode a response body in one step.
pub fn decode_response(response: &HttpResponse) -> Option<Value> {
    decode_payload(&body_text(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_body_is_none() {
        assert_eq!(decode_payload(""), None);
    }

    #[test]
    fn invalid_json_is_none() {
        assert_eq!(decode_payload("<html>Bad Gateway</html>"), None);
        assert_eq!(decode_payload("{\"truncated\":"), None);
    }

    #[test]
    fn json_null_is_none() {
        assert_eq!(decode_payload("null"), None);
    }

    #[test]
    fn objects_and_scalars_decode() {
        assert_eq!(decode_payload(r#"{"api_key":"abc123"}"#), Some(json!({"api_key": "abc123"})));
        assert_eq!(decode_payload("42"), Some(json!(42)));
        assert_eq!(decode_payload("\"text\""), Some(json!("text")));
    }

    #[test]
    fn non_utf8_body_is_replaced_not_rejected() {
        let response = HttpResponse::new(200, "OK", vec![0x7b_u8, 0xff, 0x7d]);
        assert_eq!(body_text(&response), "{\u{fffd}}");
        assert_eq!(decode_response(&response), None);
    }
}
