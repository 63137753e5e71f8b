//! Root endpoint: API self-description.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::server::AppState;

/// GET / — describes the API surface for human and tooling consumption.
pub async fn get_index(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "Web3 Domain Chatbot API",
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.environment,
        "endpoints": {
            "chat": {
                "method": "POST",
                "path": "/api/chat",
                "description": "Get AI-powered answers about Web3 domains",
                "exampleBody": {
                    "message": "How do I buy an ENS domain?",
                    "sessionId": "optional-cache-key"
                }
            },
            "domainCheck": {
                "method": "POST",
                "path": "/api/domain/check",
                "description": "Check domain availability and pricing",
                "exampleBody": {
                    "domain": "example.eth",
                    "checkLegal": true
                }
            },
            "recoverySetup": {
                "method": "POST",
                "path": "/api/recovery/setup",
                "description": "Setup social recovery for wallet",
                "exampleBody": {
                    "walletAddress": "0x...",
                    "guardians": ["email1@test.com", "email2@test.com"],
                    "threshold": 2
                }
            },
            "urlValidate": {
                "method": "POST",
                "path": "/api/url/validate",
                "description": "Validate URL format and safety",
                "exampleBody": { "url": "https://example.com" }
            }
        }
    }))
}
