use serde::Deserialize;

/// Timeout configuration
#[derive(Debug, Deserialize, Clone)]
pub struct TimeoutConfig {
    /// Upstream request timeout in milliseconds
    /// Covers connect + response headers from the application upstream
    /// Default: 30000 (30 seconds)
    #[serde(default = "default_upstream_timeout")]
    pub upstream_ms: u64,
    /// Graceful shutdown timeout in seconds
    /// Default: 30
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_secs: u64,
    /// TCP keep-alive for pooled upstream connections, in seconds
    /// Default: 60
    #[serde(default = "default_keep_alive")]
    pub keep_alive_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            upstream_ms: default_upstream_timeout(),
            shutdown_secs: default_shutdown_timeout(),
            keep_alive_secs: default_keep_alive(),
        }
    }
}

fn default_upstream_timeout() -> u64 {
    30000
}

fn default_shutdown_timeout() -> u64 {
    30
}

fn default_keep_alive() -> u64 {
    60
}
