//! Transport layer for Cropcase.
//!
//! Provides the [`Backend`] trait that abstracts over the HTTP boundary to
//! the storefront backend, plus the request/response value types that travel
//! through it.
//!
//! Everything above this crate talks to a `Backend`; only the concrete
//! [`HttpBackend`] knows about reqwest. This is the seam that lets the
//! session and opening layers be tested against scripted fakes instead of a
//! live server.
//!
//! # Status codes are data
//!
//! A `Backend` only fails with [`TransportError`] when the request could not
//! be carried at all (unreachable host, timeout). A 4xx/5xx response is a
//! successful round trip carrying a rejection — callers inspect
//! [`ApiResponse::status`] and decide. The 401 refresh-and-retry protocol
//! lives in the session layer, not here.

mod error;
mod http;

pub use error::TransportError;
pub use http::{HttpBackend, HttpConfig};

use std::fmt;
use std::future::Future;

// ---------------------------------------------------------------------------
// Method
// ---------------------------------------------------------------------------

/// The HTTP method of an outbound request.
///
/// The storefront API only uses these two; keeping the enum closed means a
/// scripted test backend can match on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
        }
    }
}

// ---------------------------------------------------------------------------
// ApiRequest
// ---------------------------------------------------------------------------

/// An outbound request to the storefront backend.
///
/// This is a plain value, cheap to clone and easy to assert on in tests.
/// Credentials are attached by the session layer via [`with_bearer`]
/// (`ApiRequest::with_bearer`); the transport never looks tokens up itself.
///
/// `attempt` is the bounded retry counter for the one-shot 401 protocol:
/// it rides on the request itself rather than hiding in mutable state, so a
/// retried request is a *new value* that visibly says it has been retried.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,

    /// Path relative to the API base URL, e.g. `/cases/3/open/`.
    pub path: String,

    /// Bearer access token, if the caller is authenticated.
    pub bearer: Option<String>,

    /// JSON body for POST requests.
    pub body: Option<serde_json::Value>,

    /// How many times this request has been re-issued after a 401.
    /// Starts at 0; the session layer refuses to retry past 1.
    pub attempt: u8,
}

impl ApiRequest {
    /// Creates a GET request for the given path.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            bearer: None,
            body: None,
            attempt: 0,
        }
    }

    /// Creates a POST request with a JSON body.
    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            bearer: None,
            body: Some(body),
            attempt: 0,
        }
    }

    /// Creates a POST request with no body.
    pub fn post_empty(path: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            bearer: None,
            body: None,
            attempt: 0,
        }
    }

    /// Returns the same request decorated with a bearer token.
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    /// Returns a copy of this request marked as retried.
    ///
    /// The retry carries no bearer — the session layer attaches the fresh
    /// access token after the refresh exchange, so a stale token can never
    /// leak onto the second attempt.
    pub fn retried(&self) -> Self {
        Self {
            method: self.method,
            path: self.path.clone(),
            bearer: None,
            body: self.body.clone(),
            attempt: self.attempt.saturating_add(1),
        }
    }
}

impl fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

// ---------------------------------------------------------------------------
// ApiResponse
// ---------------------------------------------------------------------------

/// A response from the storefront backend: status code plus raw body bytes.
///
/// Decoding the body into typed shapes is the protocol crate's job; the
/// transport hands bytes through untouched.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,

    /// Raw response body.
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Creates a response from parts. Mostly useful for scripted test
    /// backends.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns `true` if the backend rejected the credential (HTTP 401).
    ///
    /// This is the trigger for the session layer's one-shot
    /// refresh-and-retry protocol.
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

// ---------------------------------------------------------------------------
// Backend
// ---------------------------------------------------------------------------

/// Carries a single request to the storefront backend and returns the
/// response.
///
/// # Trait bounds
///
/// - `Send + Sync + 'static` — a backend is shared across async tasks and
///   lives as long as the client.
/// - The returned future is `Send` so callers can drive requests from
///   spawned tasks.
///
/// Implementations must not retry on their own: retry policy (and there is
/// exactly one — the 401 refresh protocol) belongs to the session layer.
pub trait Backend: Send + Sync + 'static {
    /// Executes the request and returns the backend's response.
    ///
    /// # Errors
    /// Returns [`TransportError`] only when no response was obtained at all;
    /// rejections come back as `Ok` responses with a non-2xx status.
    fn execute(
        &self,
        req: ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, TransportError>> + Send;
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_builds_request_without_body_or_bearer() {
        let req = ApiRequest::get("/cases/");
        assert_eq!(req.method, Method::Get);
        assert_eq!(req.path, "/cases/");
        assert!(req.bearer.is_none());
        assert!(req.body.is_none());
        assert_eq!(req.attempt, 0);
    }

    #[test]
    fn test_post_builds_request_with_body() {
        let req = ApiRequest::post("/auth/login/", serde_json::json!({"username": "ferris"}));
        assert_eq!(req.method, Method::Post);
        assert_eq!(
            req.body.as_ref().and_then(|b| b["username"].as_str()),
            Some("ferris")
        );
    }

    #[test]
    fn test_with_bearer_attaches_token() {
        let req = ApiRequest::get("/inventory/").with_bearer("tok-123");
        assert_eq!(req.bearer.as_deref(), Some("tok-123"));
    }

    #[test]
    fn test_retried_increments_attempt_and_drops_stale_bearer() {
        // The retry must not reuse the token that just got a 401 — the
        // session layer attaches the refreshed one.
        let req = ApiRequest::post_empty("/cases/1/open/").with_bearer("stale");
        let retry = req.retried();
        assert_eq!(retry.attempt, 1);
        assert!(retry.bearer.is_none());
        assert_eq!(retry.path, req.path);
        assert_eq!(retry.method, req.method);
    }

    #[test]
    fn test_retried_attempt_saturates() {
        let mut req = ApiRequest::get("/cases/");
        req.attempt = u8::MAX;
        assert_eq!(req.retried().attempt, u8::MAX);
    }

    #[test]
    fn test_response_is_success_for_2xx_only() {
        assert!(ApiResponse::new(200, "").is_success());
        assert!(ApiResponse::new(201, "").is_success());
        assert!(!ApiResponse::new(199, "").is_success());
        assert!(!ApiResponse::new(301, "").is_success());
        assert!(!ApiResponse::new(500, "").is_success());
    }

    #[test]
    fn test_response_is_unauthorized_only_for_401() {
        assert!(ApiResponse::new(401, "").is_unauthorized());
        // 403 means the credential was understood but lacks permission —
        // refreshing would not help, so it must not trigger the protocol.
        assert!(!ApiResponse::new(403, "").is_unauthorized());
        assert!(!ApiResponse::new(200, "").is_unauthorized());
    }

    #[test]
    fn test_method_display() {
        assert_eq!(Method::Get.to_string(), "GET");
        assert_eq!(Method::Post.to_string(), "POST");
    }

    #[test]
    fn test_request_display_shows_method_and_path() {
        let req = ApiRequest::get("/profile/");
        assert_eq!(req.to_string(), "GET /profile/");
    }
}
