//! HTTP client for the dashboard backend.
//!
//! One `reqwest::Client` shared by sign-in, session validation, the health
//! probe and module data fetches. Once signed in, the bearer token lives in
//! a shared slot so module factories (which take no arguments) can make
//! authenticated calls.

use std::fmt;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use super::types::{ErrorBody, LoginRequest, LoginResponse, ReportSummary, UpstreamHealth};
use crate::core::session::{Credentials, Password, SessionValidator};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Errors that can occur while talking to the backend.
#[derive(Debug)]
pub enum BackendError {
    /// Client misconfigured (bad URL, missing credentials).
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// Backend answered with a non-success status.
    Api { status: u16, message: String },
    /// Response body did not match what we expected.
    Parse(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Config(msg) => write!(f, "config error: {msg}"),
            BackendError::Network(msg) => write!(f, "network error: {msg}"),
            BackendError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            BackendError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for BackendError {}

pub struct BackendClient {
    base_url: String,
    client: reqwest::Client,
    /// Bearer token for authenticated calls. Empty means signed out.
    token: Arc<RwLock<String>>,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
            token: Arc::new(RwLock::new(String::new())),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_token(&self, token: Option<&str>) {
        let mut slot = self.token.write().unwrap_or_else(|e| e.into_inner());
        *slot = token.unwrap_or_default().to_string();
    }

    fn current_token(&self) -> String {
        self.token
            .read()
            .map(|t| t.clone())
            .unwrap_or_else(|e| e.into_inner().clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        let request = self.client.get(self.url(path));
        let token = self.current_token();
        if token.is_empty() {
            request
        } else {
            request.bearer_auth(token)
        }
    }

    /// `POST /auth/login`.
    pub async fn login(&self, email: &str, password: &Password) -> Result<Credentials, BackendError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(BackendError::Config("email and password are required".into()));
        }

        info!("Signing in as {}", email);
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(&LoginRequest {
                email: email.trim(),
                password: password.expose(),
            })
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let body: LoginResponse = read_json(response).await?;
        Ok(Credentials::new(body.token, body.user))
    }

    /// `GET /reports/summary` (authenticated).
    pub async fn fetch_report_summary(&self) -> Result<ReportSummary, BackendError> {
        let response = self
            .get("/reports/summary")
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        read_json(response).await
    }

    /// `GET /health` on the upstream service.
    pub(crate) async fn upstream_health(&self) -> Result<UpstreamHealth, BackendError> {
        let response = self
            .client
            .get(self.url("/health"))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(api_error(response).await);
        }
        // A 2xx with an empty or non-JSON body still means "up".
        let text = response
            .text()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        Ok(serde_json::from_str(&text).unwrap_or_default())
    }
}

#[async_trait]
impl SessionValidator for BackendClient {
    /// `GET /auth/session`: 2xx is valid, 401/403 is rejected, anything else
    /// is an error.
    async fn validate_session(&self, token: &str) -> Result<bool, BackendError> {
        let response = self
            .client
            .get(self.url("/auth/session"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let status = response.status();
        debug!("Session validation status: {}", status);
        match status {
            s if s.is_success() => Ok(true),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(false),
            _ => Err(api_error(response).await),
        }
    }
}

async fn api_error(response: reqwest::Response) -> BackendError {
    let status = response.status().as_u16();
    let text = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|b| b.error)
        .unwrap_or(text);
    warn!("Backend API error: {} - {}", status, message);
    BackendError::Api { status, message }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
    if !response.status().is_success() {
        return Err(api_error(response).await);
    }
    response
        .json::<T>()
        .await
        .map_err(|e| BackendError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = BackendClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url("/health"), "http://localhost:8000/health");
    }

    #[test]
    fn test_token_slot_set_and_clear() {
        let client = BackendClient::new(DEFAULT_BACKEND_URL);
        assert_eq!(client.current_token(), "");
        client.set_token(Some("abc"));
        assert_eq!(client.current_token(), "abc");
        client.set_token(None);
        assert_eq!(client.current_token(), "");
    }

    #[tokio::test]
    async fn test_login_requires_fields() {
        let client = BackendClient::new(DEFAULT_BACKEND_URL);
        let result = client.login("  ", &Password::new("pw")).await;
        assert!(matches!(result, Err(BackendError::Config(_))));
        let result = client.login("ada@example.com", &Password::new("")).await;
        assert!(matches!(result, Err(BackendError::Config(_))));
    }

    #[test]
    fn test_error_display() {
        let err = BackendError::Api {
            status: 503,
            message: "down".into(),
        };
        assert_eq!(err.to_string(), "API error (HTTP 503): down");
    }
}
