//! Domain availability: in-memory registry with an on-chain lookup seam.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::warn;

use crate::error::Result;

/// On-chain name resolution, e.g. the ENS registry.
///
/// The chain client itself lives outside this crate; implementations wrap
/// whatever RPC provider the deployment uses.
#[async_trait]
pub trait EnsLookup: Send + Sync {
    /// Whether a resolver is set for `domain` on-chain. A set resolver means
    /// the name is taken.
    async fn has_resolver(&self, domain: &str) -> Result<bool>;
}

/// A name taken through this service.
#[derive(Debug, Clone)]
pub struct RegisteredDomain {
    pub owner: String,
    pub registered_at: DateTime<Utc>,
}

/// Unbounded in-memory store of taken names, keyed by lowercased domain.
///
/// Known limitation: nothing evicts from this map. Acceptable for the
/// single-process deployment this service targets.
#[derive(Clone, Default)]
pub struct DomainRegistry {
    taken: Arc<DashMap<String, RegisteredDomain>>,
}

impl DomainRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, domain: &str, owner: &str) {
        self.taken.insert(
            domain.to_lowercase(),
            RegisteredDomain {
                owner: owner.to_string(),
                registered_at: Utc::now(),
            },
        );
    }

    pub fn is_taken(&self, domain: &str) -> bool {
        self.taken.contains_key(&domain.to_lowercase())
    }
}

/// Availability checks across the registry and the optional on-chain seam.
#[derive(Clone)]
pub struct DomainChecker {
    registry: DomainRegistry,
    ens: Option<Arc<dyn EnsLookup>>,
}

impl DomainChecker {
    pub fn new(registry: DomainRegistry) -> Self {
        Self {
            registry,
            ens: None,
        }
    }

    pub fn with_ens(mut self, ens: Arc<dyn EnsLookup>) -> Self {
        self.ens = Some(ens);
        self
    }

    /// Whether `domain` is available for registration.
    ///
    /// `.eth` names consult the on-chain lookup when one is configured; a
    /// lookup failure reports unavailable rather than guessing. Everything
    /// else (and `.eth` without a chain client) falls back to the in-memory
    /// registry.
    pub async fn check_availability(&self, domain: &str) -> bool {
        if domain.ends_with(".eth") {
            if let Some(ens) = &self.ens {
                return match ens.has_resolver(domain).await {
                    Ok(has_resolver) => !has_resolver,
                    Err(e) => {
                        warn!(domain, "ENS availability check failed: {e}");
                        false
                    }
                };
            }
        }
        !self.registry.is_taken(domain)
    }
}
