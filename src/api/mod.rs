//! Endpoint wrappers for the auth API.
//!
//! Credentials sent by [`login`] and [`register`] are pre-hashed with the
//! configured fixed salt; plaintext passwords never go on the wire. A
//! successful login stores the returned token in the client's
//! [`crate::TokenStore`] so later calls are authorized automatically.

use crate::crypto::hash_password;
use crate::error::ApiError;
use crate::http::ApiClient;
use serde::{Deserialize, Serialize};

// ── Request / response DTOs ──────────────────────────────────────

/// Body for `POST /auth/login`. `password` is already pre-hashed.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Payload of a successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginData {
    /// Opaque bearer token for subsequent requests.
    pub token: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

/// Body for `POST /auth/register`. `password` is already pre-hashed.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Payload of a successful registration. Some deployments return the
/// created account, others return nothing.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterData {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

// ── Operations ───────────────────────────────────────────────────

/// Log in with username + plaintext password.
///
/// The password is pre-hashed with the client's fixed salt before being
/// sent. On success the returned token is stored for later calls.
pub async fn login(
    client: &ApiClient,
    username: &str,
    password: &str,
) -> Result<LoginData, ApiError> {
    let (username, password) = check_credentials(username, password)?;
    let body = LoginRequest {
        username,
        password: hash_password(password, &client.config().fixed_salt),
    };

    let envelope = client.post_json::<_, LoginData>("/auth/login", &body).await?;
    let code = envelope.code_as_i64();
    let data = envelope.data.ok_or_else(|| ApiError::Api {
        code,
        message: "Login response carried no data".to_string(),
    })?;

    client.tokens().set(data.token.clone());
    tracing::debug!(username = %body.username, "Login succeeded, token stored");
    Ok(data)
}

/// Register a new account with username + plaintext password.
pub async fn register(
    client: &ApiClient,
    username: &str,
    password: &str,
    email: Option<&str>,
) -> Result<Option<RegisterData>, ApiError> {
    let (username, password) = check_credentials(username, password)?;
    let body = RegisterRequest {
        username,
        password: hash_password(password, &client.config().fixed_salt),
        email: email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty()),
    };

    let envelope = client
        .post_json::<_, RegisterData>("/auth/register", &body)
        .await?;
    Ok(envelope.data)
}

/// Fetch the captcha image as raw bytes.
pub async fn fetch_captcha(client: &ApiClient) -> Result<Vec<u8>, ApiError> {
    client.get_bytes("/captcha").await
}

/// Discard the stored token. Purely client-side.
pub fn logout(client: &ApiClient) {
    client.tokens().clear();
}

/// Reject obviously unusable credentials before touching the network.
fn check_credentials<'a>(
    username: &str,
    password: &'a str,
) -> Result<(String, &'a str), ApiError> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(ApiError::Invalid("Username cannot be empty".to_string()));
    }
    if password.is_empty() {
        return Err(ApiError::Invalid("Password cannot be empty".to_string()));
    }
    Ok((trimmed.to_string(), password))
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(ClientConfig::new(server.uri())).unwrap()
    }

    #[tokio::test]
    async fn login_sends_hashed_password_and_stores_token() {
        let server = MockServer::start().await;
        let client = client_for(&server);
        let expected_hash = hash_password("secret_pw", &client.config().fixed_salt);

        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(body_json(serde_json::json!({
                "username": "alice",
                "password": expected_hash,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "code": 200,
                "data": {"token": "tok_login", "user_id": "u-1"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let data = login(&client, "alice", "secret_pw").await.unwrap();
        assert_eq!(data.token, "tok_login");
        assert_eq!(data.user_id.as_deref(), Some("u-1"));
        assert_eq!(client.tokens().get().as_deref(), Some("tok_login"));
    }

    #[tokio::test]
    async fn login_trims_username() {
        let server = MockServer::start().await;
        let client = client_for(&server);
        let expected_hash = hash_password("secret_pw", &client.config().fixed_salt);

        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(body_json(serde_json::json!({
                "username": "alice",
                "password": expected_hash,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "data": {"token": "tok_login"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        login(&client, "  alice  ", "secret_pw").await.unwrap();
    }

    #[tokio::test]
    async fn login_failure_leaves_token_unset() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "code": 403,
                "message": "Invalid username or password"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = login(&client, "alice", "wrong_pw").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid username or password");
        assert!(client.tokens().get().is_none());
    }

    #[tokio::test]
    async fn login_without_data_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"code": 200})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = login(&client, "alice", "secret_pw").await.unwrap_err();
        assert!(err.to_string().contains("no data"));
        assert!(client.tokens().get().is_none());
    }

    #[tokio::test]
    async fn register_sends_hashed_password() {
        let server = MockServer::start().await;
        let client = client_for(&server);
        let expected_hash = hash_password("new_pw_123", &client.config().fixed_salt);

        Mock::given(method("POST"))
            .and(path("/auth/register"))
            .and(body_json(serde_json::json!({
                "username": "bob",
                "password": expected_hash,
                "email": "bob@example.com",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "code": "200",
                "data": {"user_id": "u-2", "username": "bob"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let data = register(&client, "bob", "new_pw_123", Some("bob@example.com"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(data.user_id.as_deref(), Some("u-2"));
    }

    #[tokio::test]
    async fn register_omits_empty_email() {
        let server = MockServer::start().await;
        let client = client_for(&server);
        let expected_hash = hash_password("new_pw_123", &client.config().fixed_salt);

        Mock::given(method("POST"))
            .and(path("/auth/register"))
            .and(body_json(serde_json::json!({
                "username": "bob",
                "password": expected_hash,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let data = register(&client, "bob", "new_pw_123", Some("  ")).await.unwrap();
        assert!(data.is_none());
    }

    #[tokio::test]
    async fn empty_credentials_rejected_client_side() {
        let server = MockServer::start().await;
        let client = client_for(&server);

        let err = login(&client, "   ", "pw").await.unwrap_err();
        assert!(err.to_string().contains("Username"));

        let err = register(&client, "bob", "", None).await.unwrap_err();
        assert!(err.to_string().contains("Password"));

        // nothing reached the server
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn logout_clears_stored_token() {
        let server = MockServer::start().await;
        let client = client_for(&server);
        client.tokens().set("tok_active");

        logout(&client);
        assert!(client.tokens().get().is_none());
    }

    #[tokio::test]
    async fn fetch_captcha_returns_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/captcha"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PNG-ish".to_vec()))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let bytes = fetch_captcha(&client).await.unwrap();
        assert_eq!(bytes, b"PNG-ish".to_vec());
    }
}
