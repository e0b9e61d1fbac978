use http::{HeaderName, HeaderValue};
use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::error::{GatewayError, Result};

pub fn load_from_path<P: AsRef<Path>>(p: P) -> Result<Config> {
    let txt = fs::read_to_string(p)
        .map_err(|e| GatewayError::Config(format!("Failed to read config file: {e}")))?;
    parse(&txt)
}

/// Parse and validate a configuration document
pub fn parse(txt: &str) -> Result<Config> {
    let cfg: Config = toml::from_str(txt)
        .map_err(|e| GatewayError::Config(format!("Failed to parse config: {e}")))?;

    validate(&cfg)?;

    Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
    let gateway = &cfg.gateway;

    let root = gateway.root_domain.trim();
    if root.is_empty() {
        return Err(GatewayError::Config("root_domain cannot be empty".into()));
    }
    if root.contains("://") || root.contains('/') {
        return Err(GatewayError::Config(format!(
            "root_domain must be a bare host (optionally with port), got: {root}"
        )));
    }

    if cfg.upstream.trim().is_empty() {
        return Err(GatewayError::Config("upstream cannot be empty".into()));
    }
    if cfg.upstream.starts_with("https://") {
        return Err(GatewayError::Config(format!(
            "upstream must be a plain HTTP address (host:port), got: {}",
            cfg.upstream
        )));
    }

    if gateway.session_cookie.trim().is_empty() {
        return Err(GatewayError::Config("session_cookie cannot be empty".into()));
    }

    if !matches!(gateway.default_scheme.as_str(), "http" | "https") {
        return Err(GatewayError::Config(format!(
            "default_scheme must be \"http\" or \"https\", got: {}",
            gateway.default_scheme
        )));
    }

    for prefix in &gateway.static_prefixes {
        if !prefix.starts_with('/') {
            return Err(GatewayError::Config(format!(
                "static prefix must start with '/': {prefix}"
            )));
        }
    }
    for path in &gateway.public_paths {
        if !path.starts_with('/') {
            return Err(GatewayError::Config(format!("public path must start with '/': {path}")));
        }
    }
    if !gateway.api_prefix.starts_with('/') {
        return Err(GatewayError::Config(format!(
            "api_prefix must start with '/': {}",
            gateway.api_prefix
        )));
    }

    if cfg.security.max_connections == 0 {
        return Err(GatewayError::Config("max_connections must be > 0".into()));
    }

    let rate_limit = &cfg.security.rate_limit;
    if rate_limit.enabled {
        if rate_limit.window_seconds == 0 {
            return Err(GatewayError::Config("rate_limit.window_seconds must be > 0".into()));
        }
        if rate_limit.max_requests == 0 {
            return Err(GatewayError::Config("rate_limit.max_requests must be > 0".into()));
        }
        if rate_limit.block_seconds == 0 {
            return Err(GatewayError::Config("rate_limit.block_seconds must be > 0".into()));
        }
        if rate_limit.sweep_interval_seconds == 0 {
            return Err(GatewayError::Config(
                "rate_limit.sweep_interval_seconds must be > 0".into(),
            ));
        }
    }

    for header in &cfg.security.headers.custom {
        HeaderName::from_bytes(header.name.as_bytes()).map_err(|e| {
            GatewayError::Config(format!("Invalid security header name '{}': {e}", header.name))
        })?;
        HeaderValue::from_str(&header.value).map_err(|e| {
            GatewayError::Config(format!("Invalid value for security header '{}': {e}", header.name))
        })?;
    }
    HeaderValue::from_str(&cfg.security.headers.csp)
        .map_err(|e| GatewayError::Config(format!("Invalid CSP policy: {e}")))?;

    HeaderName::from_bytes(cfg.security.geo.country_header.as_bytes()).map_err(|e| {
        GatewayError::Config(format!(
            "Invalid geo country_header '{}': {e}",
            cfg.security.geo.country_header
        ))
    })?;

    if cfg.timeout.upstream_ms == 0 {
        return Err(GatewayError::Config("timeout.upstream_ms must be > 0".into()));
    }

    Ok(())
}
