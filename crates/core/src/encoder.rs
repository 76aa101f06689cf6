//! Request bodies for notify and broadcast calls
//!
//! A validated notification payload is copied into the request body as-is,
//! with per-platform adjustments the service expects on the wire.

use serde_json::{Map, Value};
use zeropush_domain::{Platform, PushError, Result};

/// Build the JSON body for a notification aimed at `platform`.
///
/// `device_tokens` is added for targeted notify calls and left out for
/// broadcasts.
///
/// # Errors
///
/// [`PushError::InvalidPayload`] if `payload` is not a JSON object.
pub fn encode_notification(
    platform: Platform,
    payload: &Value,
    device_tokens: Option<&[String]>,
) -> Result<Value> {
    let Value::Object(fields) = payload else {
        return Err(PushError::invalid_payload("Notification must be a JSON object", Vec::new()));
    };

    let mut body = match platform {
        Platform::IosMacos => encode_ios_macos(fields),
        Platform::Android | Platform::Safari => fields.clone(),
    };

    if let Some(tokens) = device_tokens {
        body.insert(
            "device_tokens".to_string(),
            Value::Array(tokens.iter().cloned().map(Value::String).collect()),
        );
    }

    Ok(Value::Object(body))
}

// `info` travels as a JSON-encoded string.
fn encode_ios_macos(fields: &Map<String, Value>) -> Map<String, Value> {
    let mut body = fields.clone();
    if let Some(info) = body.get_mut("info") {
        if !info.is_string() && !info.is_null() {
            *info = Value::String(info.to_string());
        }
    }
    body
}
