//! Axum API server for the domain chatbot backend.

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue, Method};
use axum::middleware as axum_mw;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::api::middleware::RateLimiter;
use crate::chat::ChatService;
use crate::config::ServerConfig;
use crate::domains::DomainChecker;
use crate::error::{DomainChatError, Result};
use crate::recovery::RecoveryStore;

/// Shared state for all API handlers.
pub struct AppState {
    /// Cache-and-retry wrapper around the external chat provider.
    pub chat: ChatService,
    /// Domain availability checks (registry + optional on-chain seam).
    pub checker: DomainChecker,
    /// In-memory social-recovery setups.
    pub recovery: RecoveryStore,
    /// Per-IP request budget tracking.
    pub rate_limiter: RateLimiter,
    /// "development" exposes error details in 500 bodies.
    pub environment: String,
}

impl AppState {
    pub fn new(
        chat: ChatService,
        checker: DomainChecker,
        recovery: RecoveryStore,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            chat,
            checker,
            recovery,
            rate_limiter: RateLimiter::new(),
            environment: environment.into(),
        }
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

/// Build the axum router with all API routes.
pub fn build_router(state: AppState, allowed_origins: &[String]) -> Router {
    let shared_state = Arc::new(state);

    // CORS: restrict to the configured frontend origins; an empty list means
    // any origin (public API mode).
    let origin = if allowed_origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            allowed_origins
                .iter()
                .filter_map(|o| o.parse::<HeaderValue>().ok()),
        )
    };
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([HeaderName::from_static("content-type")]);

    Router::new()
        .route("/", get(super::routes::index::get_index))
        .route("/api/health", get(super::routes::health::get_health))
        .route("/api/chat", post(super::routes::chat::post_chat))
        .route(
            "/api/domain/check",
            post(super::routes::domains::post_domain_check),
        )
        .route(
            "/api/recovery/setup",
            post(super::routes::recovery::post_recovery_setup),
        )
        .route(
            "/api/url/validate",
            post(super::routes::url::post_url_validate),
        )
        // Body size limit: 10 KiB, applied before anything else runs so
        // oversized payloads are rejected cheaply.
        .layer(DefaultBodyLimit::max(10 * 1024))
        .layer(cors)
        .layer(axum_mw::from_fn(
            super::middleware::security_headers_middleware,
        ))
        .layer(axum_mw::from_fn_with_state(
            shared_state.clone(),
            super::middleware::rate_limit_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(shared_state)
}

/// Start the API server, walking up from the preferred port when it is taken.
///
/// Runs until ctrl-c, then cancels the cache sweeper and returns.
pub async fn start_server(config: &ServerConfig, state: AppState) -> Result<()> {
    let cache = state.chat.cache().clone();
    let app = build_router(state, &config.allowed_origins);

    let listener = bind_with_fallback(config).await?;
    info!(
        "Server running on http://{}",
        listener.local_addr().map(|a| a.to_string()).unwrap_or_default()
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    cache.shutdown();
    info!("Server closed");
    Ok(())
}

async fn bind_with_fallback(config: &ServerConfig) -> Result<tokio::net::TcpListener> {
    let mut port = config.port;
    for attempt in 0..=config.max_port_attempts {
        let addr = format!("{}:{}", config.bind, port);
        match tokio::net::TcpListener::bind(&addr).await {
            Ok(listener) => return Ok(listener),
            Err(e)
                if e.kind() == std::io::ErrorKind::AddrInUse
                    && attempt < config.max_port_attempts =>
            {
                warn!("Port {port} in use, trying {}...", port + 1);
                port += 1;
            }
            Err(e) => return Err(DomainChatError::Io(e)),
        }
    }
    Err(DomainChatError::Config(format!(
        "no free port in {}..={}",
        config.port, port
    )))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {e}");
    } else {
        info!("Shutdown signal received. Shutting down gracefully...");
    }
}
