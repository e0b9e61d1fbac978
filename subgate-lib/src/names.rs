/// HTTP header names for X-Forwarded-* headers
///
/// Read from inbound requests to derive the client identity, and written on
/// requests forwarded to the application upstream.
pub mod forwarded {
    /// Header name for X-Forwarded-For
    ///
    /// Contains the client IP address(es) in a comma-separated list.
    /// The first entry is the originating client.
    pub const FOR: &str = "x-forwarded-for";

    /// Header name for X-Forwarded-Host
    ///
    /// Contains the original Host header value from the client request.
    pub const HOST: &str = "x-forwarded-host";

    /// Header name for X-Forwarded-Proto
    ///
    /// Contains the protocol used by the client ("http" or "https").
    pub const PROTO: &str = "x-forwarded-proto";

    /// Header name for X-Real-IP
    ///
    /// Single client address set by some load balancers instead of X-Forwarded-For.
    pub const REAL_IP: &str = "x-real-ip";
}

/// Rate limit response headers
pub mod rate_limit {
    pub const LIMIT: &str = "x-ratelimit-limit";
    pub const REMAINING: &str = "x-ratelimit-remaining";
}

/// Diagnostic headers attached outside production
///
/// Never emitted in production: they expose how the gateway classified the request.
pub mod debug {
    pub const SUBDOMAIN: &str = "x-gateway-subdomain";
    pub const PATH: &str = "x-gateway-path";
    pub const AUTHENTICATED: &str = "x-gateway-authenticated";
    pub const CLIENT_IP: &str = "x-gateway-client-ip";
    pub const BOT: &str = "x-gateway-bot";
}
