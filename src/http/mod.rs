//! HTTP client with token injection and envelope handling.
//!
//! Every call goes through the same two hooks:
//! - request side: attach `Authorization: Bearer <token>` when a token
//!   is stored, JSON content type on bodies
//! - response side: unwrap the `{code, success, message, data}` envelope
//!   (accepting `code` as number or string), map error statuses to
//!   display messages, and discard the stored token on 401 at either
//!   level

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::token::TokenStore;
use reqwest::{header, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Content type sent with every JSON request body.
const CONTENT_TYPE_JSON: &str = "application/json;charset=utf-8";

// ── Response envelope ────────────────────────────────────────────

/// Generic response envelope used by the backend.
///
/// Older endpoints report `code` (sometimes as a string), newer ones set
/// `success`; both forms are accepted.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub code: Option<serde_json::Value>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    // explicit path keeps the derive from inferring a `T: Default` bound
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Numeric view of `code`, accepting `200` and `"200"` alike.
    pub fn code_as_i64(&self) -> Option<i64> {
        match &self.code {
            Some(serde_json::Value::Number(n)) => n.as_i64(),
            Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Whether the envelope reports success.
    pub fn is_ok(&self) -> bool {
        self.code_as_i64() == Some(200) || self.success == Some(true)
    }
}

// ── Client ───────────────────────────────────────────────────────

/// HTTP client carrying the config and the shared token store.
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ClientConfig,
    tokens: TokenStore,
    http: reqwest::Client,
}

impl ApiClient {
    /// Build a client with a memory-only token store.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        Self::with_tokens(config, TokenStore::in_memory())
    }

    /// Build a client sharing an existing token store.
    pub fn with_tokens(config: ClientConfig, tokens: TokenStore) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(ApiError::Transport)?;

        Ok(Self {
            config,
            tokens,
            http,
        })
    }

    /// Client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Shared token store.
    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// POST a JSON body and unwrap the response envelope.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<Envelope<T>, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.config.endpoint(path);
        debug!(url = %url, "POST start");

        let request = self
            .authorize(self.http.post(&url))
            .header(header::CONTENT_TYPE, CONTENT_TYPE_JSON)
            .json(body);

        let resp = request.send().await.map_err(|e| {
            warn!(url = %url, error = %e, "POST failed");
            ApiError::from_transport(e)
        })?;

        self.unwrap_envelope(resp).await
    }

    /// GET and unwrap the response envelope.
    pub async fn get_json<T>(&self, path: &str) -> Result<Envelope<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        let url = self.config.endpoint(path);
        debug!(url = %url, "GET start");

        let resp = self.authorize(self.http.get(&url)).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "GET failed");
            ApiError::from_transport(e)
        })?;

        self.unwrap_envelope(resp).await
    }

    /// GET raw bytes. For binary endpoints (captcha images) whose
    /// responses carry no envelope.
    pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.config.endpoint(path);
        debug!(url = %url, "GET start");

        let resp = self.authorize(self.http.get(&url)).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "GET failed");
            ApiError::from_transport(e)
        })?;

        let status = resp.status();
        if !status.is_success() {
            let server_message = resp.text().await.ok().and_then(|b| server_message(&b));
            return Err(self.status_error(status, server_message));
        }

        let bytes = resp.bytes().await.map_err(ApiError::Decode)?;
        Ok(bytes.to_vec())
    }

    /// Attach the bearer token when one is stored.
    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.tokens.get() {
            Some(token) => request.header(header::AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        }
    }

    /// Response-side handling shared by the JSON calls.
    async fn unwrap_envelope<T>(&self, resp: reqwest::Response) -> Result<Envelope<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        let status = resp.status();
        if !status.is_success() {
            let server_message = resp.text().await.ok().and_then(|b| server_message(&b));
            return Err(self.status_error(status, server_message));
        }

        let envelope: Envelope<T> = resp.json().await.map_err(|e| {
            warn!(error = %e, "Failed to decode response envelope");
            ApiError::Decode(e)
        })?;

        if envelope.is_ok() {
            return Ok(envelope);
        }

        let code = envelope.code_as_i64();
        let message = envelope
            .message
            .unwrap_or_else(|| "Request failed".to_string());
        warn!(code = ?code, message = %message, "API call rejected");

        // Expired or invalid credentials: force a fresh login.
        if code == Some(401) {
            self.tokens.clear();
        }

        Err(ApiError::Api { code, message })
    }

    /// Map an HTTP error status, clearing the token on 401.
    fn status_error(&self, status: StatusCode, server_message: Option<String>) -> ApiError {
        warn!(status = status.as_u16(), "HTTP error response");
        let err = ApiError::from_status(status, server_message);
        if err.is_unauthorized() {
            self.tokens.clear();
        }
        err
    }
}

/// Pull `message` out of an error body when it is the standard envelope.
fn server_message(body: &str) -> Option<String> {
    let v: serde_json::Value = serde_json::from_str(body).ok()?;
    v.get("message")?.as_str().map(|s| s.to_string())
}

// ── Tests ────────────────────────────────────────────────────────
