//! HTTP endpoint layer: axum server, middleware, and route handlers.

pub mod middleware;
pub mod routes;
pub mod server;
