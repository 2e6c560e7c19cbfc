//! Turning failed responses into `ApiError::Api`.

use serde_json::Value;

use crate::error::{ApiError, ErrorPayload};

const GENERIC_FAILURE: &str = "Request failed";

/// Choose the message for a failed response.
///
/// Precedence: a non-empty string `error` field, then a non-empty string
/// `message` field, then the status text, then a generic message.
pub fn error_message(payload: Option<&Value>, status_text: &str) -> String {
    if let Some(Value::Object(fields)) = payload {
        for key in ["error", "message"] {
            if let Some(Value::String(text)) = fields.get(key) {
                if !text.is_empty() {
                    return text.clone();
                }
            }
        }
    }

    if status_text.is_empty() {
        GENERIC_FAILURE.to_string()
    } else {
        status_text.to_string()
    }
}

/// Build the error for a non-2xx response.
pub fn api_error(status: u16, status_text: &str, payload: ErrorPayload) -> ApiError {
    let message = error_message(payload.as_json(), status_text);
    ApiError::Api {
        message,
        status,
        payload,
    }
}
