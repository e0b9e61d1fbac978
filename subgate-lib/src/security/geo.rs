//! Country based blocking.
//!
//! The gateway does not resolve IPs to countries itself; it consumes the
//! result of a [`GeoLookup`] collaborator. Every failure mode allows the
//! request through.

use ahash::AHashSet;
use http::{HeaderMap, HeaderName};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::GeoConfig;
use crate::error::{GatewayError, Result};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Error)]
pub enum GeoLookupError {
    #[error("geo lookup unavailable: {0}")]
    Unavailable(String),
    #[error("invalid geo lookup result: {0}")]
    InvalidResult(String),
}

/// Resolves the ISO 3166-1 alpha-2 country of a request
///
/// `Ok(None)` means the country is unknown.
pub trait GeoLookup: Send + Sync {
    fn country<'a>(
        &'a self,
        headers: &'a HeaderMap,
        client_ip: &'a str,
    ) -> BoxFuture<'a, std::result::Result<Option<String>, GeoLookupError>>;
}

/// Reads the country resolved upstream by the CDN (e.g. `cf-ipcountry`)
#[derive(Debug, Clone)]
pub struct HeaderGeoLookup {
    header: HeaderName,
}

impl HeaderGeoLookup {
    pub fn new(header: &str) -> Result<Self> {
        let header = HeaderName::from_bytes(header.as_bytes())
            .map_err(|e| GatewayError::Config(format!("Invalid geo country header: {e}")))?;
        Ok(Self { header })
    }

    fn resolve(&self, headers: &HeaderMap) -> std::result::Result<Option<String>, GeoLookupError> {
        let Some(raw) = headers.get(&self.header) else {
            return Ok(None);
        };
        let value = raw
            .to_str()
            .map_err(|e| GeoLookupError::InvalidResult(e.to_string()))?
            .trim()
            .to_ascii_uppercase();

        // XX and T1 are Cloudflare's "unknown" and "Tor" markers
        if value.is_empty() || value == "XX" || value == "T1" {
            return Ok(None);
        }
        if value.len() != 2 || !value.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(GeoLookupError::InvalidResult(value));
        }
        Ok(Some(value))
    }
}

impl GeoLookup for HeaderGeoLookup {
    fn country<'a>(
        &'a self,
        headers: &'a HeaderMap,
        _client_ip: &'a str,
    ) -> BoxFuture<'a, std::result::Result<Option<String>, GeoLookupError>> {
        Box::pin(async move { self.resolve(headers) })
    }
}

/// Geo blocking capability consumed by the gateway orchestrator
///
/// Resolves to `true` when the request may proceed.
pub trait GeoBlockChecker: Send + Sync {
    fn check<'a>(&'a self, headers: &'a HeaderMap, client_ip: &'a str) -> BoxFuture<'a, bool>;
}

/// Allows every request
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAllGeo;

impl GeoBlockChecker for AllowAllGeo {
    fn check<'a>(&'a self, _headers: &'a HeaderMap, _client_ip: &'a str) -> BoxFuture<'a, bool> {
        Box::pin(async { true })
    }
}

pub struct GeoBlocker {
    enforce: bool,
    blocked: AHashSet<String>,
    lookup: Arc<dyn GeoLookup>,
    timeout: Duration,
}

impl GeoBlocker {
    /// Build a blocker; `production` gates enforcement entirely
    pub fn new(config: &GeoConfig, production: bool, lookup: Arc<dyn GeoLookup>) -> Self {
        let blocked: AHashSet<String> = config
            .blocked_countries
            .iter()
            .map(|c| c.trim().to_ascii_uppercase())
            .filter(|c| !c.is_empty())
            .collect();
        Self {
            enforce: production && !blocked.is_empty(),
            blocked,
            lookup,
            timeout: Duration::from_millis(config.lookup_timeout_ms.max(1)),
        }
    }

    pub fn is_enforcing(&self) -> bool {
        self.enforce
    }

    async fn allowed(&self, headers: &HeaderMap, client_ip: &str) -> bool {
        if !self.enforce {
            return true;
        }

        let country =
            match tokio::time::timeout(self.timeout, self.lookup.country(headers, client_ip)).await
            {
                Ok(Ok(Some(country))) => country,
                Ok(Ok(None)) => return true,
                Ok(Err(e)) => {
                    tracing::debug!(client_ip, "Geo lookup failed, allowing request: {e}");
                    return true;
                }
                Err(_) => {
                    tracing::debug!(client_ip, "Geo lookup timed out, allowing request");
                    return true;
                }
            };

        let denied = self.blocked.contains(&country.to_ascii_uppercase());
        if denied {
            tracing::info!(client_ip, country = %country, "Request blocked by geo policy");
        }
        !denied
    }
}

impl GeoBlockChecker for GeoBlocker {
    fn check<'a>(&'a self, headers: &'a HeaderMap, client_ip: &'a str) -> BoxFuture<'a, bool> {
        Box::pin(self.allowed(headers, client_ip))
    }
}
