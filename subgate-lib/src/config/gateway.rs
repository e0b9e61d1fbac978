use serde::Deserialize;

/// Domain and path classification for the gateway
///
/// The root domain may carry a port (e.g. "localhost:3000") for local
/// development; the port is ignored when matching hosts but kept when building
/// absolute URLs.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GatewayConfig {
    /// Root (apex) domain, without scheme
    /// Example: "example.com"
    pub root_domain: String,
    /// Subdomain labels the gateway recognises
    /// Labels outside this set fall back to root behaviour
    #[serde(default = "default_subdomains")]
    pub subdomains: Vec<String>,
    /// Path prefixes served as static assets (bypass every check)
    #[serde(default = "default_static_prefixes")]
    pub static_prefixes: Vec<String>,
    /// Paths that never require authentication (exact match)
    #[serde(default = "default_public_paths")]
    pub public_paths: Vec<String>,
    /// Prefix of API routes that do their own authentication
    /// Default: "/api"
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    /// Cookie whose presence marks a request as authenticated
    /// Default: "auth-token"
    #[serde(default = "default_session_cookie")]
    pub session_cookie: String,
    /// Scheme used for absolute URLs when no X-Forwarded-Proto header is present
    /// Default: "https"
    #[serde(default = "default_scheme")]
    pub default_scheme: String,
}

fn default_subdomains() -> Vec<String> {
    ["auth", "ump", "provider", "skills", "api", "myaccount", "wallet", "www"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_static_prefixes() -> Vec<String> {
    ["/_next/", "/static/", "/images/", "/fonts/", "/favicon.ico", "/robots.txt", "/sitemap.xml"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_public_paths() -> Vec<String> {
    ["/login", "/signup", "/register", "/forgot-password", "/reset-password", "/verify-email"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_api_prefix() -> String {
    "/api".to_string()
}

fn default_session_cookie() -> String {
    "auth-token".to_string()
}

fn default_scheme() -> String {
    "https".to_string()
}

impl GatewayConfig {
    /// Gateway configuration for `root_domain` with every other field defaulted
    pub fn for_root(root_domain: impl Into<String>) -> Self {
        Self {
            root_domain: root_domain.into(),
            subdomains: default_subdomains(),
            static_prefixes: default_static_prefixes(),
            public_paths: default_public_paths(),
            api_prefix: default_api_prefix(),
            session_cookie: default_session_cookie(),
            default_scheme: default_scheme(),
        }
    }
}
