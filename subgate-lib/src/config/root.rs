use serde::Deserialize;
use std::net::SocketAddr;

use super::gateway::GatewayConfig;
use super::security::SecurityConfig;
use super::telemetry::LoggingConfig;
use super::timeout::TimeoutConfig;

/// Deployment environment the gateway runs in
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Geo blocking active, debug headers suppressed
    #[default]
    Production,
    /// Geo blocking skipped, debug headers attached to every response
    Development,
}

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Address and port to listen on
    /// Example: "0.0.0.0:8080" or "127.0.0.1:8080"
    pub listen: SocketAddr,
    /// Application upstream (host:port) receiving pass-through and rewritten requests
    /// Example: "127.0.0.1:3000" or "app:3000"
    pub upstream: String,
    /// Deployment environment
    /// Default: "production"
    #[serde(default)]
    pub environment: Environment,
    /// Domain, subdomain and path classification
    pub gateway: GatewayConfig,
    /// Rate limiting, headers, bot and geo policies
    #[serde(default)]
    pub security: SecurityConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Timeout configuration
    #[serde(default)]
    pub timeout: TimeoutConfig,
}

impl Config {
    /// True when running with production hardening (geo blocking, no debug headers)
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}
