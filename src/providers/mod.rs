//! External chat provider boundary.
//!
//! The [`ChatProvider`] trait is the single seam between the service and the
//! remote completion API. Everything above it (cache, retry wrapper, HTTP
//! handlers) works against the trait, which keeps the retry semantics
//! testable with a mock provider.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub mod openai;

pub use openai::OpenAiProvider;

/// Role tag on a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One role-tagged message in a completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Message payload inside a completion choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceMessage {
    pub content: String,
}

/// One completion choice returned by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// A completion as returned by the external chat provider.
///
/// Stored in the response cache as-is; immutable once received. The wrapper
/// returns it verbatim — whether `choices` is usable is the caller's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    pub model: String,
    pub choices: Vec<Choice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl Completion {
    /// Text of the first choice, when present.
    pub fn text(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

/// A remote chat-completion API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Issue exactly one completion request.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<Completion>;

    /// Provider name for logs.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::System).unwrap(), r#""system""#);
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), r#""user""#);
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            r#""assistant""#
        );
    }

    #[test]
    fn test_message_helpers() {
        let sys = ChatMessage::system("be helpful");
        assert_eq!(sys.role, Role::System);
        let user = ChatMessage::user("hi");
        assert_eq!(user.role, Role::User);
        assert_eq!(user.content, "hi");
    }

    #[test]
    fn test_completion_text_first_choice() {
        let completion = Completion {
            model: "gpt-4-turbo-preview".into(),
            choices: vec![
                Choice {
                    message: ChoiceMessage {
                        content: "first".into(),
                    },
                },
                Choice {
                    message: ChoiceMessage {
                        content: "second".into(),
                    },
                },
            ],
            usage: None,
        };
        assert_eq!(completion.text(), Some("first"));
    }

    #[test]
    fn test_completion_text_none_without_choices() {
        let completion = Completion {
            model: "gpt-4-turbo-preview".into(),
            choices: vec![],
            usage: None,
        };
        assert!(completion.text().is_none());
    }

    #[test]
    fn test_completion_deserializes_wire_shape() {
        let json = r#"{
            "model": "gpt-4-turbo-preview",
            "choices": [{ "message": { "content": "hello" } }],
            "usage": { "prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15 }
        }"#;
        let completion: Completion = serde_json::from_str(json).unwrap();
        assert_eq!(completion.text(), Some("hello"));
        assert_eq!(completion.usage.unwrap().total_tokens, 15);
    }

    #[test]
    fn test_completion_deserializes_without_usage() {
        let json = r#"{"model": "m", "choices": []}"#;
        let completion: Completion = serde_json::from_str(json).unwrap();
        assert!(completion.usage.is_none());
    }
}
