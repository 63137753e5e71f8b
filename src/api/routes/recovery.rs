//! Social-recovery setup endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::server::AppState;
use crate::error::DomainChatError;

fn default_threshold() -> usize {
    2
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoverySetupRequest {
    #[serde(default)]
    pub wallet_address: String,
    #[serde(default)]
    pub guardians: Vec<String>,
    #[serde(default = "default_threshold")]
    pub threshold: usize,
}

/// POST /api/recovery/setup
pub async fn post_recovery_setup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RecoverySetupRequest>,
) -> (StatusCode, Json<Value>) {
    match state
        .recovery
        .setup(&req.wallet_address, &req.guardians, req.threshold)
    {
        Ok(setup) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "wallet": req.wallet_address,
                "threshold": setup.threshold,
                "guardianCount": setup.shards.len(),
                "setupAt": setup.created_at.to_rfc3339(),
            })),
        ),
        Err(DomainChatError::Validation(msg)) => {
            (StatusCode::BAD_REQUEST, Json(json!({ "error": msg })))
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("Recovery setup failed: {e}") })),
        ),
    }
}
