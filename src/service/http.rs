//! HTTP implementation of the auth capability.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::{json, Value};

use crate::auth::{Credentials, User};
use crate::config::ServiceConfig;

use super::{AuthService, CapabilityError};

/// Talks to a JSON auth backend over HTTP.
pub struct HttpAuthService {
    client: Client,
    config: ServiceConfig,
}

impl HttpAuthService {
    pub fn new(config: ServiceConfig) -> Result<Self, CapabilityError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    async fn post(&self, url: &str, body: &Value) -> Result<Response, CapabilityError> {
        tracing::debug!(url = %url, "Sending auth request");

        let response = self.client.post(url).json(body).send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                tracing::debug!(status = %status, error = %err, "Failed to read error body");
                String::new()
            }
        };
        let message = rejection_message(&body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());

        tracing::warn!(status = %status, error = %message, "Auth service rejected request");

        Err(CapabilityError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl AuthService for HttpAuthService {
    async fn login(&self, email: &str, password: &str) -> Result<User, CapabilityError> {
        let body = json!({ "email": email, "password": password });
        let response = self.post(&self.config.login_url(), &body).await?;

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| CapabilityError::Decode(e.to_string()))
    }

    async fn register(&self, credentials: &Credentials) -> Result<(), CapabilityError> {
        let body =
            serde_json::to_value(credentials).map_err(|e| CapabilityError::Decode(e.to_string()))?;
        self.post(&self.config.register_url(), &body).await?;
        Ok(())
    }
}

/// Extract a human-readable message from an error response body.
///
/// Accepts `{"message": ".."}`, `{"error": ".."}`, `{"error": {"message": ".."}}`
/// or a plain-text body.
fn rejection_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    let Ok(value) = serde_json::from_str::<Value>(trimmed) else {
        return Some(trimmed.to_string());
    };

    let from_json = value
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| value.get("error").and_then(Value::as_str))
        .or_else(|| {
            value
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
        });

    match from_json {
        Some(message) => Some(message.to_string()),
        None => Some(trimmed.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_field_wins() {
        assert_eq!(
            rejection_message(r#"{"message":"duplicate email","error":"conflict"}"#),
            Some("duplicate email".to_string())
        );
    }

    #[test]
    fn error_string_and_nested_error() {
        assert_eq!(
            rejection_message(r#"{"error":"bad password"}"#),
            Some("bad password".to_string())
        );
        assert_eq!(
            rejection_message(r#"{"error":{"message":"locked"}}"#),
            Some("locked".to_string())
        );
    }

    #[test]
    fn plain_text_and_empty_bodies() {
        assert_eq!(rejection_message("  nope \n"), Some("nope".to_string()));
        assert_eq!(rejection_message(""), None);
    }
}
