//! Response shape assertions.

use serde_json::Value;

use super::client::TestResponse;

/// Asserts a success envelope and returns its `result`.
pub fn assert_success(response: &TestResponse) -> Value {
    let json: Value = response.json();
    assert_eq!(json["status"], true, "Expected success envelope: {}", json);
    assert_eq!(json["code"], 200, "Expected code 200: {}", json);
    assert!(json.get("result").is_some(), "Missing 'result': {}", json);
    json["result"].clone()
}

/// Asserts an error envelope with the given code and message.
pub fn assert_failure(response: &TestResponse, code: u16, message: &str) {
    let json: Value = response.json();
    assert_eq!(response.status.as_u16(), code, "Unexpected status: {}", json);
    assert_eq!(json["status"], false, "Expected failure envelope: {}", json);
    assert_eq!(json["code"], code, "Envelope code mismatch: {}", json);
    assert_eq!(
        json["result"]["message"], message,
        "Unexpected message: {}",
        json
    );
}

/// Asserts an admin `{status, message, data}` response and returns `data`.
pub fn assert_admin_ok(response: &TestResponse, message: &str) -> Value {
    let json: Value = response.json();
    assert_eq!(json["status"], true, "Expected admin success: {}", json);
    assert_eq!(json["message"], message, "Unexpected message: {}", json);
    json["data"].clone()
}
