//! Uniform response envelope.
//!
//! Every JSON endpoint answers with `{status, code, result}`. Successful
//! calls carry the mapped upstream payload in `result`; failures carry an
//! [`ErrorResult`] with a human readable message.

use serde::{Deserialize, Serialize};

/// The `{status, code, result}` response shape.
///
/// # Example
///
/// ```
/// use relay_core::Envelope;
///
/// let env = Envelope::ok(serde_json::json!({"title": "clip"}));
/// assert!(env.status);
/// assert_eq!(env.code, 200);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status: bool,
    pub code: u16,
    pub result: T,
}

impl<T> Envelope<T> {
    /// Successful envelope with code 200.
    pub fn ok(result: T) -> Self {
        Self {
            status: true,
            code: 200,
            result,
        }
    }

    /// Successful envelope with an explicit code (e.g. 201).
    pub fn with_code(code: u16, result: T) -> Self {
        Self {
            status: true,
            code,
            result,
        }
    }
}

/// Payload of a failed envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResult {
    pub message: String,
    /// Seconds until the client may retry. Only set on 429 responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

/// Builds `{status:false, code, result:{message}}`.
pub fn failure(code: u16, message: impl Into<String>) -> Envelope<ErrorResult> {
    Envelope {
        status: false,
        code,
        result: ErrorResult {
            message: message.into(),
            retry_after: None,
        },
    }
}

impl Envelope<ErrorResult> {
    /// Attaches a retry hint in seconds.
    pub fn retry_after(mut self, seconds: u64) -> Self {
        self.result.retry_after = Some(seconds);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ok_envelope_serializes_flat() {
        let env = Envelope::ok(json!({"id": "1"}));
        let value = serde_json::to_value(&env).unwrap();

        assert_eq!(value, json!({"status": true, "code": 200, "result": {"id": "1"}}));
    }

    #[test]
    fn failure_omits_retry_after_by_default() {
        let value = serde_json::to_value(failure(400, "url is required")).unwrap();

        assert_eq!(
            value,
            json!({"status": false, "code": 400, "result": {"message": "url is required"}})
        );
    }

    #[test]
    fn retry_after_is_camel_case() {
        let value = serde_json::to_value(failure(429, "Too many requests").retry_after(12)).unwrap();

        assert_eq!(value["result"]["retryAfter"], 12);
    }
}
