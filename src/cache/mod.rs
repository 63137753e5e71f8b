//! AI response caching with per-key TTL expiry.

pub mod response_cache;

pub use response_cache::ResponseCache;
