//! Domain availability and pricing endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::server::AppState;
use crate::domains;

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainCheckRequest {
    #[serde(default)]
    pub domain: String,
    #[serde(default = "default_true")]
    pub check_legal: bool,
}

/// POST /api/domain/check
pub async fn post_domain_check(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DomainCheckRequest>,
) -> (StatusCode, Json<Value>) {
    let domain = match domains::normalize_domain(&req.domain) {
        Ok(d) => d,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": e.to_string() })),
            )
        }
    };

    let legal_warning = req
        .check_legal
        .then(|| domains::check_legal_compliance(&domain).message)
        .flatten();

    let available = state.checker.check_availability(&domain).await;
    let price = if available {
        domains::estimate_price(&domain)
    } else {
        0.0
    };

    (
        StatusCode::OK,
        Json(json!({
            "domain": domain,
            "available": available,
            "price": price,
            "currency": "ETH",
            "legalWarning": legal_warning,
            "checkedAt": Utc::now().to_rfc3339(),
        })),
    )
}
