use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::Result;
use crate::gateway::GatewayOrchestrator;
use crate::proxy::client_pool::ClientPool;
use crate::proxy::forwarding::upstream_authority;
use crate::security::{
    GeoBlocker, HeaderGeoLookup, NoopRateLimiter, RateLimitChecker, RateLimiter,
};

/// Shared state for every connection and request
pub struct ProxyContext {
    pub gateway: GatewayOrchestrator,
    pub client_pool: ClientPool,
    /// Upstream authority (`host:port`)
    pub upstream: String,
    pub upstream_timeout: Duration,
    pub default_scheme: String,
    /// Present when rate limiting is enabled; owns the sweeper lifecycle
    pub rate_limiter: Option<Arc<RateLimiter>>,
}

impl ProxyContext {
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let rate_limiter = config
            .security
            .rate_limit
            .enabled
            .then(|| Arc::new(RateLimiter::new(&config.security.rate_limit)));
        let checker: Arc<dyn RateLimitChecker> = match &rate_limiter {
            Some(limiter) => limiter.clone(),
            None => Arc::new(NoopRateLimiter),
        };

        let lookup = Arc::new(HeaderGeoLookup::new(&config.security.geo.country_header)?);
        let geo = Arc::new(GeoBlocker::new(&config.security.geo, config.is_production(), lookup));

        Ok(Self {
            client_pool: ClientPool::new(&config.timeout),
            upstream: upstream_authority(&config.upstream).to_string(),
            upstream_timeout: Duration::from_millis(config.timeout.upstream_ms),
            default_scheme: config.gateway.default_scheme.clone(),
            gateway: GatewayOrchestrator::new(config, checker, geo)?,
            rate_limiter,
        })
    }
}
