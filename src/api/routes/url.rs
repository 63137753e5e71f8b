//! URL validation endpoint.

use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::urlcheck::{self, MAX_URL_LEN};

#[derive(Debug, Deserialize)]
pub struct UrlValidateRequest {
    #[serde(default)]
    pub url: String,
}

/// POST /api/url/validate
pub async fn post_url_validate(Json(req): Json<UrlValidateRequest>) -> (StatusCode, Json<Value>) {
    if req.url.is_empty() || req.url.chars().count() > MAX_URL_LEN {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "valid": false,
                "message": "URL must be a string (max 2048 characters)",
                "error": "Invalid input format",
            })),
        );
    }

    let report = urlcheck::validate_url(&req.url);
    debug!(url = %req.url, valid = report.valid, "url validation");
    (
        StatusCode::OK,
        Json(serde_json::to_value(&report).unwrap_or_else(|_| {
            json!({ "valid": false, "message": "URL validation service unavailable" })
        })),
    )
}
