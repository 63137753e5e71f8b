//! Social-recovery shard generation.
//!
//! Placeholder semantics: one opaque UUID "shard" per guardian. This is NOT
//! secret splitting — no key material is derived from the wallet, and any
//! single shard reveals nothing because it contains nothing. Real recovery
//! cryptography is out of scope.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{DomainChatError, Result};

/// Guardian count bounds.
pub const MIN_GUARDIANS: usize = 2;
pub const MAX_GUARDIANS: usize = 5;

static ETH_ADDRESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("address pattern compiles"));

/// Shape check for an Ethereum address (no EIP-55 checksum validation).
pub fn is_eth_address(address: &str) -> bool {
    ETH_ADDRESS.is_match(address)
}

/// One shard handed to one guardian.
#[derive(Debug, Clone, Serialize)]
pub struct RecoveryShard {
    pub guardian: String,
    pub shard: Uuid,
    pub wallet: String,
    pub created_at: DateTime<Utc>,
}

/// A wallet's recovery configuration.
#[derive(Debug, Clone, Serialize)]
pub struct RecoverySetup {
    pub shards: Vec<RecoveryShard>,
    pub threshold: usize,
    pub created_at: DateTime<Utc>,
}

/// Unbounded in-memory store of recovery setups, keyed by lowercased wallet.
///
/// Known limitation: no eviction, mirrors the registry store.
#[derive(Clone, Default)]
pub struct RecoveryStore {
    setups: Arc<DashMap<String, RecoverySetup>>,
}

impl RecoveryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and store a recovery setup, replacing any prior one for the
    /// same wallet. Returns the stored setup.
    pub fn setup(
        &self,
        wallet_address: &str,
        guardians: &[String],
        threshold: usize,
    ) -> Result<RecoverySetup> {
        if !is_eth_address(wallet_address) {
            return Err(DomainChatError::Validation(
                "Invalid Ethereum address".into(),
            ));
        }
        if guardians.len() < threshold.max(MIN_GUARDIANS) || guardians.len() > MAX_GUARDIANS {
            return Err(DomainChatError::Validation(format!(
                "Requires {MIN_GUARDIANS}-{MAX_GUARDIANS} guardians (received {})",
                guardians.len()
            )));
        }
        if threshold < MIN_GUARDIANS || threshold > guardians.len() {
            return Err(DomainChatError::Validation(format!(
                "Threshold must be between {MIN_GUARDIANS} and {}",
                guardians.len()
            )));
        }

        let wallet = wallet_address.to_lowercase();
        let now = Utc::now();
        let setup = RecoverySetup {
            shards: guardians
                .iter()
                .map(|guardian| RecoveryShard {
                    guardian: guardian.clone(),
                    shard: Uuid::new_v4(),
                    wallet: wallet.clone(),
                    created_at: now,
                })
                .collect(),
            threshold,
            created_at: now,
        };
        self.setups.insert(wallet, setup.clone());
        Ok(setup)
    }

    pub fn get(&self, wallet_address: &str) -> Option<RecoverySetup> {
        self.setups
            .get(&wallet_address.to_lowercase())
            .map(|s| s.value().clone())
    }
}
