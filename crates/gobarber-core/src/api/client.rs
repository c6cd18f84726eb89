//! API client for communicating with the GoBarber REST API.
//!
//! This module provides the `ApiClient` struct for the three endpoints the
//! client uses: session creation, account creation and password recovery.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::models::{Credentials, ForgotPasswordData, SessionResponse, SignUpData};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Default backend address for local development
pub const DEFAULT_BASE_URL: &str = "http://localhost:3333";

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

const SESSIONS_PATH: &str = "sessions";
const USERS_PATH: &str = "/users";
const FORGOT_PASSWORD_PATH: &str = "/password/forgot";

pub type Result<T> = std::result::Result<T, ApiError>;

/// The part of the backend the session store depends on.
#[async_trait]
pub trait SessionApi: Send + Sync {
    async fn create_session(&self, credentials: &Credentials) -> Result<SessionResponse>;
}

/// API client for the GoBarber backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client against `base_url`
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            token: None,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a new ApiClient with the given token, sharing the connection pool.
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Some(token.into()),
        }
    }

    /// Join `path` to the base URL with exactly one slash between them
    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref token) = self.token {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ApiError::InvalidResponse(format!("Invalid token: {}", e)))?;
            headers.insert(header::AUTHORIZATION, value);
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn send_post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response> {
        let url = self.url(path);
        debug!(url = %url, "POST");

        let response = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .json(body)
            .send()
            .await?;

        Self::check_response(response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.send_post(path, body).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse response from {}: {}", path, e))
        })
    }

    // ===== Endpoints =====

    /// Register a new account. The response body is not inspected.
    pub async fn create_user(&self, data: &SignUpData) -> Result<()> {
        self.send_post(USERS_PATH, data).await?;
        Ok(())
    }

    /// Ask the backend to e-mail a password recovery link
    pub async fn forgot_password(&self, data: &ForgotPasswordData) -> Result<()> {
        self.send_post(FORGOT_PASSWORD_PATH, data).await?;
        Ok(())
    }
}

#[async_trait]
impl SessionApi for ApiClient {
    async fn create_session(&self, credentials: &Credentials) -> Result<SessionResponse> {
        self.post(SESSIONS_PATH, credentials).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_url_joining() {
        let client = ApiClient::new("http://localhost:3333/").unwrap();
        assert_eq!(client.url("sessions"), "http://localhost:3333/sessions");
        assert_eq!(client.url("/users"), "http://localhost:3333/users");

        let client = ApiClient::new("http://localhost:3333").unwrap();
        assert_eq!(
            client.url("/password/forgot"),
            "http://localhost:3333/password/forgot"
        );
    }

    #[tokio::test]
    async fn test_create_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sessions"))
            .and(body_json(json!({"email": "johndoe@example.com", "password": "123456"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user": {"id": "user-123", "name": "John Doe", "email": "johndoe@example.com"},
                "token": "token-123"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap();
        let resp = client
            .create_session(&Credentials::new("johndoe@example.com", "123456"))
            .await
            .unwrap();

        assert_eq!(resp.token, "token-123");
        assert_eq!(resp.user.email, "johndoe@example.com");
    }

    #[tokio::test]
    async fn test_create_session_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sessions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Incorrect email/password"))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap();
        let err = client
            .create_session(&Credentials::new("johndoe@example.com", "wrong"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[tokio::test]
    async fn test_create_session_invalid_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sessions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap();
        let err = client
            .create_session(&Credentials::new("a@b.com", "p"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_create_user_and_forgot_password() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users"))
            .and(body_json(json!({"name": "John Doe", "email": "johndoe@example.com", "password": "123456"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "user-123"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/password/forgot"))
            .and(body_json(json!({"email": "johndoe@example.com"})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap();
        client
            .create_user(&SignUpData {
                name: "John Doe".to_string(),
                email: "johndoe@example.com".to_string(),
                password: "123456".to_string(),
            })
            .await
            .unwrap();
        client
            .forgot_password(&ForgotPasswordData {
                email: "johndoe@example.com".to_string(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_with_token_sends_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/password/forgot"))
            .and(header("authorization", "Bearer token-123"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap().with_token("token-123");
        client
            .forgot_password(&ForgotPasswordData {
                email: "johndoe@example.com".to_string(),
            })
            .await
            .unwrap();
    }
}
