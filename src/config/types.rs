use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub orchestration: OrchestrationConfig,
}

/// Where the authentication backend lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL for the API (e.g., "https://auth.example.com").
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path of the login endpoint, appended to `base_url`.
    #[serde(default = "default_login_path")]
    pub login_path: String,
    /// Path of the registration endpoint, appended to `base_url`.
    #[serde(default = "default_register_path")]
    pub register_path: String,
    /// Connection timeout in seconds (default: 5).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
}

/// Effect runner settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestrationConfig {
    /// Upper bound for one login/register call in seconds (default: 30).
    /// Zero disables the bound.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u32,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_login_path() -> String {
    "/api/auth/login".to_string()
}

fn default_register_path() -> String {
    "/api/auth/register".to_string()
}

fn default_connect_timeout() -> u32 {
    5
}

fn default_request_timeout() -> u32 {
    30
}

impl ServiceConfig {
    pub fn login_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.login_path)
    }

    pub fn register_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.register_path)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.connect_timeout_seconds))
    }
}

impl OrchestrationConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        match self.request_timeout_seconds {
            0 => None,
            secs => Some(Duration::from_secs(u64::from(secs))),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            login_path: default_login_path(),
            register_path: default_register_path(),
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}

impl Default for OrchestrationConfig {
    fn default() -> Self {
        Self {
            request_timeout_seconds: default_request_timeout(),
        }
    }
}
