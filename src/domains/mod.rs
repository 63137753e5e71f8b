//! Stateless domain-name checks: scam blacklist, trademark matching, and the
//! length-based price heuristic.

use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;

use crate::error::{DomainChatError, Result};

pub mod registry;

pub use registry::{DomainChecker, DomainRegistry, EnsLookup};

/// Names commonly impersonated in phishing domains. Matched as
/// case-insensitive substrings anywhere in the domain.
pub const DOMAIN_BLACKLIST: &[&str] = &["vitalik", "coinbase", "opensea", "trustwallet"];

/// Registered marks matched exactly against the name label.
pub const TRADEMARKS: &[&str] = &[
    "google",
    "amazon",
    "microsoft",
    "binance",
    "twitter",
    "facebook",
    "apple",
];

static SCAM_MATCHER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build(DOMAIN_BLACKLIST)
        .expect("blacklist patterns compile")
});

/// Outcome of the scam blacklist check.
#[derive(Debug, Clone)]
pub struct ScamCheck {
    pub is_scam: bool,
    pub message: Option<String>,
}

/// Flag domains that contain a blacklisted name anywhere in the string.
///
/// Substring matching is deliberate: `vitalik-giveaway.eth` is exactly the
/// kind of name this exists to catch.
pub fn check_for_scams(domain: &str) -> ScamCheck {
    let is_scam = SCAM_MATCHER.is_match(domain);
    ScamCheck {
        is_scam,
        message: is_scam.then(|| {
            format!(
                "Security Alert: The domain '{domain}' may be impersonating a well-known Web3 entity."
            )
        }),
    }
}

/// Outcome of the trademark check.
#[derive(Debug, Clone)]
pub struct LegalCheck {
    pub has_issue: bool,
    pub message: Option<String>,
}

/// Flag domains whose name label is exactly a registered mark.
///
/// Exact match only — `googleplex.eth` passes, `google.eth` does not.
pub fn check_legal_compliance(domain: &str) -> LegalCheck {
    let name = domain.to_lowercase();
    let label = name.split('.').next().unwrap_or("");
    let has_issue = TRADEMARKS.contains(&label);
    LegalCheck {
        has_issue,
        message: has_issue
            .then(|| format!("Legal Notice: The domain '{domain}' may violate trademark rights.")),
    }
}

/// Naive price heuristic in ETH, by name-label length.
pub fn estimate_price(domain: &str) -> f64 {
    let label = domain.split('.').next().unwrap_or("");
    match label.chars().count() {
        0..=3 => 1.0,
        4..=5 => 0.5,
        _ => 0.1,
    }
}

/// Validate `name.tld` shape and normalize to lowercase.
pub fn normalize_domain(domain: &str) -> Result<String> {
    if domain.is_empty() || domain.chars().count() > 100 {
        return Err(DomainChatError::Validation(
            "Domain must be a valid string (max 100 characters)".into(),
        ));
    }
    let lower = domain.to_lowercase();
    let mut parts = lower.split('.');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(name), Some(tld), None) if !name.is_empty() && !tld.is_empty() => Ok(lower),
        _ => Err(DomainChatError::Validation(
            "Invalid domain format (expected 'name.tld')".into(),
        )),
    }
}
