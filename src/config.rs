//! Environment-driven configuration.
//!
//! Everything is read from the process environment (with `.env` support via
//! `dotenvy` in `main`). Each section has serde-friendly defaults so partial
//! configuration files and test construction stay ergonomic.

use serde::{Deserialize, Serialize};

use crate::error::{DomainChatError, Result};

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (default: 0.0.0.0).
    pub bind: String,
    /// Preferred port. When taken, the server walks upward (see
    /// `max_port_attempts`).
    pub port: u16,
    /// How many successive ports to try when the preferred one is in use.
    pub max_port_attempts: u16,
    /// CORS allow-list. Empty means any origin.
    pub allowed_origins: Vec<String>,
    /// Deployment environment name; "development" unlocks error details in
    /// 500 responses.
    pub environment: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 3000,
            max_port_attempts: 10,
            allowed_origins: Vec::new(),
            environment: "development".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

/// External chat provider (OpenAI-compatible) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// API key. Required at startup; the process refuses to boot without it.
    pub api_key: String,
    /// Model identifier sent with every completion request.
    pub model: String,
    /// Optional organization header value.
    pub organization: Option<String>,
    /// Per-request timeout for the upstream call, in seconds.
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gpt-4-turbo-preview".to_string(),
            organization: None,
            timeout_secs: 30,
        }
    }
}

/// Response cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Per-entry time to live, in seconds.
    pub ttl_secs: u64,
    /// Interval between background sweeps for expired entries, in seconds.
    pub sweep_interval_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 60,
            sweep_interval_secs: 15,
        }
    }
}

/// Retry policy for the chat provider call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of remote attempts per invocation.
    pub max_retries: u32,
    /// Base backoff delay in milliseconds; the delay grows with each attempt.
    pub backoff_base_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_base_ms: 2000,
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub openai: OpenAiConfig,
    pub cache: CacheConfig,
    pub retry: RetryConfig,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// Fails when `OPENAI_API_KEY` is missing — the chat endpoint is the
    /// whole point of the service, so booting without credentials would only
    /// defer the failure to the first request.
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();

        if let Ok(bind) = std::env::var("HOST") {
            config.server.bind = bind;
        }
        if let Ok(port) = std::env::var("PORT") {
            config.server.port = port
                .parse()
                .map_err(|_| DomainChatError::Config(format!("invalid PORT: {port}")))?;
        }
        if let Ok(origins) = std::env::var("ALLOWED_ORIGINS") {
            config.server.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
        if let Ok(env) = std::env::var("NODE_ENV").or_else(|_| std::env::var("APP_ENV")) {
            config.server.environment = env;
        }

        config.openai.api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| DomainChatError::Config("OPENAI_API_KEY is missing".into()))?;
        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            config.openai.model = model;
        }
        config.openai.organization = std::env::var("OPENAI_ORG_ID").ok();

        Ok(config)
    }
}
