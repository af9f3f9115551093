//! The reqwest-backed [`Backend`] implementation.

use std::time::Duration;

use crate::{ApiRequest, ApiResponse, Backend, Method, TransportError};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for the HTTP backend.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Base URL of the storefront API, e.g. `http://localhost:8000/api`.
    /// A trailing slash is tolerated and stripped.
    pub base_url: String,

    /// Per-request timeout. Default: 30 seconds.
    pub timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

// ---------------------------------------------------------------------------
// HttpBackend
// ---------------------------------------------------------------------------

/// A [`Backend`] that talks real HTTP via reqwest.
///
/// The reqwest client pools connections internally, so one `HttpBackend`
/// is created per [`Storefront`] and shared behind an `Arc` by every layer
/// that issues requests.
///
/// [`Storefront`]: https://docs.rs/cropcase
pub struct HttpBackend {
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpBackend {
    /// Builds a backend from config.
    ///
    /// # Errors
    /// Returns [`TransportError::Http`] if the underlying client cannot be
    /// constructed (e.g. TLS initialization failure).
    pub fn new(config: HttpConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TransportError::Http(e.to_string()))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout,
            client,
        })
    }

    /// Returns the configured base URL (without trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn classify(&self, e: reqwest::Error) -> TransportError {
        if e.is_timeout() {
            TransportError::Timeout(self.timeout)
        } else if e.is_connect() {
            TransportError::Unreachable(e.to_string())
        } else {
            TransportError::Http(e.to_string())
        }
    }
}

impl Backend for HttpBackend {
    async fn execute(&self, req: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.url(&req.path);
        tracing::debug!(method = %req.method, %url, attempt = req.attempt, "sending request");

        let mut builder = match req.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        if let Some(token) = &req.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &req.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            let err = self.classify(e);
            tracing::debug!(method = %req.method, %url, error = %err, "request failed");
            err
        })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.classify(e))?
            .to_vec();

        tracing::trace!(method = %req.method, %url, status, bytes = body.len(), "response received");
        Ok(ApiResponse { status, body })
    }
}
