//! Chat endpoint: domain safety gates, then the cached/retried AI call.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::error;

use crate::api::server::AppState;
use crate::domains;
use crate::providers::ChatMessage;

/// Maximum user message length.
const MAX_MESSAGE_LEN: usize = 500;

/// System instruction sent with every chat call.
const SYSTEM_PROMPT: &str = "You are a Web3 domain expert specializing in ENS, Unstoppable \
     Domains, and .sol domains. Provide concise, accurate answers about registration, \
     management, and security. Format responses with Markdown for better readability. \
     If a question is unclear, ask for clarification.";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    /// Optional domain to safety-check before answering.
    #[serde(default)]
    pub domain: String,
    /// Optional cache key; repeated questions in one session reuse the
    /// previous completion for its TTL.
    #[serde(default)]
    pub session_id: Option<String>,
}

/// POST /api/chat
pub async fn post_chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> (StatusCode, Json<Value>) {
    if req.message.is_empty() || req.message.chars().count() > MAX_MESSAGE_LEN {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Message must be a string (max 500 characters)" })),
        );
    }

    if !req.domain.is_empty() {
        if req.domain.chars().count() > 100 {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Domain must be a string (max 100 characters)" })),
            );
        }

        let scam = domains::check_for_scams(&req.domain);
        if scam.is_scam {
            return (
                StatusCode::FORBIDDEN,
                Json(json!({ "reply": scam.message, "flagged": true })),
            );
        }

        let legal = domains::check_legal_compliance(&req.domain);
        if legal.has_issue {
            return (
                StatusCode::FORBIDDEN,
                Json(json!({ "reply": legal.message, "legalWarning": true })),
            );
        }
    }

    let messages = [
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(req.message.as_str()),
    ];

    match state
        .chat
        .completion(&messages, req.session_id.as_deref())
        .await
    {
        Ok(completion) => match completion.text() {
            Some(reply) => (
                StatusCode::OK,
                Json(json!({
                    "reply": reply,
                    "model": completion.model,
                    "usage": completion.usage,
                })),
            ),
            None => {
                error!("Chat Error: completion has no choices");
                service_unavailable(&state, "Invalid response structure from provider")
            }
        },
        Err(e) => {
            error!("Chat Error: {e}");
            service_unavailable(&state, &e.to_string())
        }
    }
}

fn service_unavailable(state: &AppState, details: &str) -> (StatusCode, Json<Value>) {
    let mut body = json!({ "error": "Service temporarily unavailable" });
    if state.is_development() {
        body["details"] = json!(details);
    }
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body))
}
