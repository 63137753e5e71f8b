//! OpenAI-compatible chat-completion provider.
//!
//! Speaks the `/chat/completions` REST shape directly over reqwest. Sampling
//! parameters are fixed: the service asks short domain questions, so one
//! conservative profile covers every call site.

use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use crate::config::OpenAiConfig;
use crate::error::{DomainChatError, Result};

use super::{ChatMessage, ChatProvider, Completion};

/// OpenAI REST API base.
const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Provider that authenticates with a bearer API key.
pub struct OpenAiProvider {
    api_key: String,
    organization: Option<String>,
    model: String,
    base_url: String,
    client: Client,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl OpenAiProvider {
    pub fn from_config(config: &OpenAiConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(DomainChatError::Config("OPENAI_API_KEY is missing".into()));
        }
        Ok(Self {
            api_key: config.api_key.clone(),
            organization: config.organization.clone(),
            model: config.model.clone(),
            base_url: OPENAI_API_BASE.to_string(),
            client: Self::build_client(config.timeout_secs),
        })
    }

    /// Point the provider at a different OpenAI-compatible endpoint
    /// (self-hosted gateways, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn build_client(timeout_secs: u64) -> Client {
        Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("failed to build HTTP client")
    }

    /// Build the `/chat/completions` request body.
    fn build_request_body(&self, messages: &[ChatMessage]) -> Value {
        json!({
            "model": self.model,
            "messages": messages,
            "temperature": 0.7,
            "max_tokens": 500,
            "top_p": 1,
            "frequency_penalty": 0,
            "presence_penalty": 0
        })
    }

    fn api_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Pull a readable message out of an upstream error body.
    ///
    /// OpenAI errors arrive as `{"error": {"message": "..."}}`; anything else
    /// is passed through raw.
    fn extract_error_message(status: u16, body: &str) -> String {
        let msg = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v["error"]["message"].as_str().map(String::from))
            .unwrap_or_else(|| body.to_string());
        format!("OpenAI API error (status {status}): {msg}")
    }
}

#[async_trait::async_trait]
impl ChatProvider for OpenAiProvider {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<Completion> {
        debug!(model = %self.model, "OpenAI completion request");

        let mut request = self
            .client
            .post(self.api_url())
            .bearer_auth(&self.api_key)
            .json(&self.build_request_body(messages));
        if let Some(org) = &self.organization {
            request = request.header("OpenAI-Organization", org);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DomainChatError::Provider(format!("OpenAI request failed: {e}")))?;

        if response.status().is_success() {
            return response.json::<Completion>().await.map_err(|e| {
                DomainChatError::Provider(format!("failed to parse OpenAI response: {e}"))
            });
        }

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(DomainChatError::Provider(Self::extract_error_message(
            status, &body,
        )))
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_provider() -> OpenAiProvider {
        OpenAiProvider::from_config(&OpenAiConfig {
            api_key: "test-key".into(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_from_config_rejects_empty_key() {
        let result = OpenAiProvider::from_config(&OpenAiConfig::default());
        assert!(matches!(result, Err(DomainChatError::Config(_))));
    }

    #[test]
    fn test_request_body_shape() {
        let provider = test_provider();
        let body = provider.build_request_body(&[
            ChatMessage::system("be helpful"),
            ChatMessage::user("how do I buy an ENS domain?"),
        ]);
        assert_eq!(body["model"], "gpt-4-turbo-preview");
        assert_eq!(body["temperature"], 0.7);
        assert_eq!(body["max_tokens"], 500);
        assert_eq!(body["top_p"], 1);
        assert_eq!(body["frequency_penalty"], 0);
        assert_eq!(body["presence_penalty"], 0);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "how do I buy an ENS domain?");
    }

    #[test]
    fn test_api_url_default_base() {
        let provider = test_provider();
        assert_eq!(
            provider.api_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_api_url_custom_base() {
        let provider = test_provider().with_base_url("http://localhost:8080/v1");
        assert_eq!(provider.api_url(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_extract_error_message_from_json_body() {
        let msg = OpenAiProvider::extract_error_message(
            429,
            r#"{"error": {"message": "Rate limit reached"}}"#,
        );
        assert_eq!(msg, "OpenAI API error (status 429): Rate limit reached");
    }

    #[test]
    fn test_extract_error_message_raw_body_fallback() {
        let msg = OpenAiProvider::extract_error_message(502, "Bad Gateway");
        assert_eq!(msg, "OpenAI API error (status 502): Bad Gateway");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let rendered = format!("{:?}", test_provider());
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("test-key"));
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(test_provider().name(), "openai");
    }
}
