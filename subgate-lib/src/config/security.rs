use serde::Deserialize;

use super::headers::CustomHeader;

/// Security configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SecurityConfig {
    /// Maximum concurrent client connections (DoS protection)
    /// Default: 1024
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
    /// Security headers applied to every response
    #[serde(default)]
    pub headers: SecurityHeaders,
    /// Per-client rate limiting
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// User-agent based bot detection
    #[serde(default)]
    pub bot: BotConfig,
    /// Country blocking
    #[serde(default)]
    pub geo: GeoConfig,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_connections: default_max_connections(),
            headers: SecurityHeaders::default(),
            rate_limit: RateLimitConfig::default(),
            bot: BotConfig::default(),
            geo: GeoConfig::default(),
        }
    }
}

fn default_max_connections() -> usize {
    1024
}

/// Security headers configuration
///
/// Every entry in `custom` plus the CSP is written on every response the
/// gateway produces, including redirects and 403/429/500 responses.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SecurityHeaders {
    /// Fixed header map added to all responses
    #[serde(default = "default_security_headers")]
    pub custom: Vec<CustomHeader>,
    /// Content-Security-Policy value
    #[serde(default = "default_csp_policy")]
    pub csp: String,
}

impl Default for SecurityHeaders {
    fn default() -> Self {
        Self { custom: default_security_headers(), csp: default_csp_policy() }
    }
}

fn default_security_headers() -> Vec<CustomHeader> {
    vec![
        CustomHeader::new("X-Frame-Options", "DENY"),
        CustomHeader::new("X-Content-Type-Options", "nosniff"),
        CustomHeader::new("X-XSS-Protection", "1; mode=block"),
        CustomHeader::new("Referrer-Policy", "strict-origin-when-cross-origin"),
        CustomHeader::new("Permissions-Policy", "camera=(), microphone=(), geolocation=()"),
        CustomHeader::new("Strict-Transport-Security", "max-age=31536000; includeSubDomains"),
    ]
}

fn default_csp_policy() -> String {
    [
        "default-src 'self'",
        "script-src 'self' 'unsafe-inline' 'unsafe-eval'",
        "style-src 'self' 'unsafe-inline'",
        "img-src 'self' data: https:",
        "font-src 'self' data:",
        "connect-src 'self' https:",
        "frame-ancestors 'none'",
    ]
    .join("; ")
}

/// Rate limiting configuration
///
/// Fixed window per client identifier; exceeding `max_requests` inside one
/// window blocks the client for `block_seconds`, independent of window resets.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    /// Default: true
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Window length in seconds
    /// Default: 60
    #[serde(default = "default_window_seconds")]
    pub window_seconds: u64,
    /// Requests allowed per window
    /// Default: 100
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
    /// Cooldown after the limit trips, in seconds
    /// Default: 300 (5 minutes)
    #[serde(default = "default_block_seconds")]
    pub block_seconds: u64,
    /// Interval of the background sweep removing expired entries, in seconds
    /// Default: 300 (5 minutes)
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window_seconds: default_window_seconds(),
            max_requests: default_max_requests(),
            block_seconds: default_block_seconds(),
            sweep_interval_seconds: default_sweep_interval(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_window_seconds() -> u64 {
    60
}

fn default_max_requests() -> u32 {
    100
}

fn default_block_seconds() -> u64 {
    300
}

fn default_sweep_interval() -> u64 {
    300
}

/// Bot detection configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BotConfig {
    /// User-agent signatures, matched case-insensitively as substrings
    /// A `|`-separated entry is split into alternatives ("bot|crawler")
    #[serde(default = "default_bot_signatures")]
    pub signatures: Vec<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self { signatures: default_bot_signatures() }
    }
}

fn default_bot_signatures() -> Vec<String> {
    [
        "bot",
        "crawler",
        "spider",
        "slurp",
        "bingpreview",
        "facebookexternalhit",
        "embedly",
        "quora link preview",
        "whatsapp",
        "lighthouse",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Geographic blocking configuration
///
/// Only enforced in production; an empty blocklist disables the lookup entirely.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GeoConfig {
    /// ISO 3166-1 alpha-2 country codes to reject (case-insensitive)
    #[serde(default)]
    pub blocked_countries: Vec<String>,
    /// Request header carrying the country resolved by the edge/CDN
    /// Default: "cf-ipcountry"
    #[serde(default = "default_country_header")]
    pub country_header: String,
    /// Upper bound for a single lookup, in milliseconds
    /// Default: 250
    #[serde(default = "default_lookup_timeout")]
    pub lookup_timeout_ms: u64,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            blocked_countries: vec![],
            country_header: default_country_header(),
            lookup_timeout_ms: default_lookup_timeout(),
        }
    }
}

fn default_country_header() -> String {
    "cf-ipcountry".to_string()
}

fn default_lookup_timeout() -> u64 {
    250
}
