use crate::domain::catalog::PublicConfig;
use crate::domain::model::CanonicalSignup;
use crate::domain::ports::{ConfigSource, SignupSink};
use crate::utils::error::{Result, WaitlistError};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

pub const CONFIG_PATH: &str = "/api/auth/config/public";
pub const JOIN_PATH: &str = "/api/auth/waitlist/join";
pub const HEALTH_PATH: &str = "/health";

#[derive(Debug, Clone)]
pub struct HttpTimeouts {
    pub config: Duration,
    pub submit: Duration,
    pub health: Duration,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            config: Duration::from_secs(10),
            submit: Duration::from_secs(15),
            health: Duration::from_secs(5),
        }
    }
}

/// 後端 API 客戶端：同時是配置來源、報名寫入端與健康檢查
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    timeouts: HttpTimeouts,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeouts: HttpTimeouts::default(),
        }
    }

    pub fn with_timeouts(mut self, timeouts: HttpTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn health(&self) -> bool {
        let url = self.endpoint(HEALTH_PATH);
        match self
            .client
            .get(&url)
            .timeout(self.timeouts.health)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!("Backend health check failed: {}", e);
                false
            }
        }
    }

    pub async fn fetch_public_config(&self) -> Result<PublicConfig> {
        let url = self.endpoint(CONFIG_PATH);
        tracing::debug!("Fetching public config from: {}", url);

        let response = self
            .client
            .get(&url)
            .timeout(self.timeouts.config)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WaitlistError::RemoteError {
                status: status.as_u16(),
                message: "Failed to fetch configuration".to_string(),
            });
        }

        let data: Value = response.json().await?;
        Ok(PublicConfig::from_remote(&data))
    }

    /// 轉送報名紀錄，回傳後端的 JSON 回應
    pub async fn join(&self, record: &CanonicalSignup) -> Result<Value> {
        let url = self.endpoint(JOIN_PATH);
        tracing::debug!("Submitting waitlist registration to: {}", url);

        let response = self
            .client
            .post(&url)
            .header(ACCEPT, "application/json")
            .json(record)
            .timeout(self.timeouts.submit)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;

        // 後端可能回傳非 JSON 的錯誤頁面
        let body = if text.trim().is_empty() {
            json!({})
        } else {
            serde_json::from_str(&text).unwrap_or_else(|_| json!({ "message": text }))
        };

        if !status.is_success() {
            let message = error_message(&body)
                .unwrap_or_else(|| format!("Server error ({})", status.as_u16()));
            return Err(WaitlistError::CollaboratorFailure { message });
        }

        Ok(body)
    }
}

fn transport_error(e: reqwest::Error) -> WaitlistError {
    if e.is_timeout() {
        WaitlistError::CollaboratorFailure {
            message: "Request timeout. Please try again.".to_string(),
        }
    } else if e.is_connect() {
        WaitlistError::CollaboratorFailure {
            message: "Network error. Please check your connection.".to_string(),
        }
    } else {
        WaitlistError::ApiError(e)
    }
}

fn error_message(body: &Value) -> Option<String> {
    ["detail", "message", "error"]
        .iter()
        .filter_map(|key| body.get(*key))
        .find_map(|value| match value {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        })
}

#[async_trait]
impl ConfigSource for HttpBackend {
    fn name(&self) -> &str {
        &self.base_url
    }

    async fn fetch(&self) -> Result<PublicConfig> {
        self.fetch_public_config().await
    }
}

#[async_trait]
impl SignupSink for HttpBackend {
    async fn insert(&self, record: &CanonicalSignup) -> Result<()> {
        self.join(record).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn record() -> CanonicalSignup {
        CanonicalSignup {
            email: "a@b.com".to_string(),
            name: "Jo".to_string(),
            interest_reason: "productivity".to_string(),
            preferred_languages: vec!["en".to_string(), "fr".to_string()],
        }
    }

    #[tokio::test]
    async fn test_fetch_public_config_normalises_payload() {
        let server = MockServer::start();
        let config_mock = server.mock(|when, then| {
            when.method(GET).path(CONFIG_PATH);
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "interest_reasons": ["research"],
                    "supported_languages": [{"code": "ja", "name": "Japanese"}]
                }));
        });

        let backend = HttpBackend::new(server.base_url());
        let config = backend.fetch().await.unwrap();

        config_mock.assert();
        assert_eq!(config.interest_reasons[0].id, "research");
        assert_eq!(config.supported_languages[0].code, "ja");
    }

    #[tokio::test]
    async fn test_fetch_public_config_non_success_is_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path(CONFIG_PATH);
            then.status(500);
        });

        let backend = HttpBackend::new(server.base_url());
        let err = backend.fetch().await.unwrap_err();

        assert!(matches!(err, WaitlistError::RemoteError { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_join_posts_canonical_record() {
        let server = MockServer::start();
        let join_mock = server.mock(|when, then| {
            when.method(POST)
                .path(JOIN_PATH)
                .header("Accept", "application/json")
                .json_body(serde_json::json!({
                    "email": "a@b.com",
                    "name": "Jo",
                    "interest_reason": "productivity",
                    "preferred_languages": ["en", "fr"]
                }));
            then.status(201).json_body(serde_json::json!({"id": 7}));
        });

        let backend = HttpBackend::new(format!("{}/", server.base_url()));
        let body = backend.join(&record()).await.unwrap();

        join_mock.assert();
        assert_eq!(body["id"], 7);
    }

    #[tokio::test]
    async fn test_join_error_message_precedence() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(JOIN_PATH);
            then.status(409).json_body(serde_json::json!({
                "detail": "Email already registered",
                "message": "ignored"
            }));
        });

        let backend = HttpBackend::new(server.base_url());
        let err = backend.insert(&record()).await.unwrap_err();

        assert!(matches!(err, WaitlistError::CollaboratorFailure { .. }));
        assert_eq!(err.to_string(), "Email already registered");
    }

    #[tokio::test]
    async fn test_join_plain_text_and_empty_error_bodies() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(JOIN_PATH);
            then.status(502).body("Bad Gateway");
        });
        let backend = HttpBackend::new(server.base_url());
        let err = backend.insert(&record()).await.unwrap_err();
        assert_eq!(err.to_string(), "Bad Gateway");

        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(JOIN_PATH);
            then.status(503);
        });
        let backend = HttpBackend::new(server.base_url());
        let err = backend.insert(&record()).await.unwrap_err();
        assert_eq!(err.to_string(), "Server error (503)");
    }

    #[tokio::test]
    async fn test_join_timeout_message() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(JOIN_PATH);
            then.status(200).delay(Duration::from_secs(2));
        });

        let backend = HttpBackend::new(server.base_url()).with_timeouts(HttpTimeouts {
            submit: Duration::from_millis(100),
            ..HttpTimeouts::default()
        });
        let err = backend.insert(&record()).await.unwrap_err();

        assert_eq!(err.to_string(), "Request timeout. Please try again.");
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = MockServer::start();
        let health_mock = server.mock(|when, then| {
            when.method(GET).path(HEALTH_PATH);
            then.status(200);
        });

        assert!(HttpBackend::new(server.base_url()).health().await);
        health_mock.assert();

        // Nothing listens on port 9
        assert!(!HttpBackend::new("http://127.0.0.1:9").health().await);
    }
}
