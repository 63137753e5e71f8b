//! Web3 domain chatbot backend.
//!
//! Proxies a chat-completion API behind a per-session response cache and a
//! bounded retry loop, and exposes a handful of stateless domain-name checks
//! (scam blacklist, trademark match, availability/price heuristics, URL-shape
//! validation) plus an in-memory social-recovery shard generator.

pub mod api;
pub mod cache;
pub mod chat;
pub mod config;
pub mod domains;
pub mod error;
pub mod providers;
pub mod recovery;
pub mod urlcheck;

pub use error::{DomainChatError, Result};
