//! URL-shape validation.
//!
//! Pure string checks: no DNS resolution and no outbound request is ever
//! made. The report mirrors what the validation endpoint returns.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Maximum accepted URL length.
pub const MAX_URL_LEN: usize = 2048;

static URL_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(https?://)?([\w-]+\.)+[\w-]+([/\w .?%&=-]*)?$").expect("url pattern compiles")
});

static DOMAIN_PART: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(https?://)?([^/]+)").expect("domain pattern compiles"));

/// Example URLs returned alongside a format failure.
pub const EXAMPLE_URLS: &[&str] = &[
    "https://example.com",
    "http://subdomain.example.com/path",
    "https://example.com/page.html?param=value",
];

/// Structural details about a well-formed URL.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UrlDetails {
    pub protocol: String,
    pub domain: String,
    #[serde(rename = "hasPath")]
    pub has_path: bool,
}

/// Validation verdict for one URL.
#[derive(Debug, Clone, Serialize)]
pub struct UrlValidation {
    pub valid: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<UrlDetails>,
}

/// Validate the shape of `url` and report structural details.
///
/// Rejects anything that fails the shape regex and any URL pointing at
/// localhost. Length and type checks belong to the HTTP layer.
pub fn validate_url(url: &str) -> UrlValidation {
    if !URL_SHAPE.is_match(url) {
        return UrlValidation {
            valid: false,
            message: "Invalid URL format. Please include protocol (http/https) and domain"
                .to_string(),
            examples: Some(EXAMPLE_URLS.to_vec()),
            details: None,
        };
    }

    if url.contains("localhost") || url.contains("127.0.0.1") {
        return UrlValidation {
            valid: false,
            message: "Localhost URLs are not allowed for security reasons".to_string(),
            examples: None,
            details: None,
        };
    }

    UrlValidation {
        valid: true,
        message: "URL is properly formatted".to_string(),
        examples: None,
        details: Some(UrlDetails {
            protocol: classify_protocol(url),
            domain: extract_domain(url),
            has_path: has_path(url),
        }),
    }
}

fn classify_protocol(url: &str) -> String {
    if url.starts_with("https") {
        "HTTPS (Secure)".to_string()
    } else if url.starts_with("http") {
        "HTTP".to_string()
    } else {
        "None (Added automatically)".to_string()
    }
}

fn extract_domain(url: &str) -> String {
    DOMAIN_PART
        .captures(url)
        .and_then(|c| c.get(2))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

fn has_path(url: &str) -> bool {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    rest.contains('/')
}
