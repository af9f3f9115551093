//! Turning response bytes into typed shapes — and error bodies into
//! readable messages.
//!
//! The transport layer hands back raw bytes with a status code; this module
//! is the single place where those bytes are interpreted. Success bodies go
//! through [`decode`]; rejection bodies go through [`rejection`], which
//! knows the handful of error shapes the backend produces.

use serde::de::DeserializeOwned;

use cropcase_transport::ApiResponse;

use crate::ProtocolError;

/// Decodes a response body into a typed value.
///
/// # Errors
/// Returns [`ProtocolError::Decode`] if the body is malformed, truncated,
/// or doesn't match the expected shape.
pub fn decode<T: DeserializeOwned>(response: &ApiResponse) -> Result<T, ProtocolError> {
    serde_json::from_slice(&response.body).map_err(ProtocolError::Decode)
}

/// Converts a non-2xx response into a [`ProtocolError::Rejected`] carrying
/// the most useful message the body offers.
///
/// The backend emits three error shapes:
///
/// - `{"detail": "..."}` — framework-level rejections (bad credentials,
///   missing permissions).
/// - `{"success": false, "message": "..."}` — domain rejections from the
///   open/sell/deposit endpoints.
/// - `{"field": ["problem", ...], ...}` — validation maps from the
///   registration form.
///
/// Anything else falls back to a generic message so the caller always gets
/// *something* human-readable.
pub fn rejection(response: &ApiResponse) -> ProtocolError {
    ProtocolError::Rejected {
        status: response.status,
        message: rejection_message(&response.body),
    }
}

fn rejection_message(body: &[u8]) -> String {
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) else {
        return fallback_message();
    };
    let Some(map) = value.as_object() else {
        return fallback_message();
    };

    if let Some(detail) = map.get("detail").and_then(|v| v.as_str()) {
        return detail.to_string();
    }
    if let Some(message) = map.get("message").and_then(|v| v.as_str()) {
        return message.to_string();
    }

    // Validation map: take the first field with a string-list of problems.
    for (field, problems) in map {
        if let Some(first) = problems
            .as_array()
            .and_then(|list| list.first())
            .and_then(|v| v.as_str())
        {
            return format!("{field}: {first}");
        }
    }

    fallback_message()
}

fn fallback_message() -> String {
    "the server rejected the request".to_string()
}

// =========================================================================
// Tests
// =========================================================================
