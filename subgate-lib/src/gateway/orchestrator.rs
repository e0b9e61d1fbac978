use http::header::{HeaderName, HeaderValue, RETRY_AFTER, USER_AGENT};
use http::{HeaderMap, Request, Response};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info};

use super::verdict::Verdict;
use crate::config::Config;
use crate::error::Result;
use crate::names;
use crate::request::{is_authenticated, is_static_path, strip_port, subdomain_of, RequestOrigin};
use crate::routing::{RoutingContext, RoutingEngine, RoutingOutcome};
use crate::security::{
    client_ip, BotDetector, CompiledSecurityHeaders, GeoBlockChecker, RateLimitChecker,
};

/// Composes the security policies and the routing engine
///
/// Order per request: static short-circuit, geo block, bot detection, rate
/// limit (bots exempt), routing dispatch. [`GatewayOrchestrator::finalize`]
/// then stamps the response, whatever produced it.
pub struct GatewayOrchestrator {
    config: Arc<Config>,
    rate_limiter: Arc<dyn RateLimitChecker>,
    geo: Arc<dyn GeoBlockChecker>,
    bots: BotDetector,
    engine: RoutingEngine,
    security_headers: CompiledSecurityHeaders,
}

impl GatewayOrchestrator {
    pub fn new(
        config: Arc<Config>,
        rate_limiter: Arc<dyn RateLimitChecker>,
        geo: Arc<dyn GeoBlockChecker>,
    ) -> Result<Self> {
        let security_headers = CompiledSecurityHeaders::compile(&config.security.headers)?;
        Ok(Self {
            bots: BotDetector::new(&config.security.bot),
            engine: RoutingEngine::new(config.gateway.clone()),
            security_headers,
            rate_limiter,
            geo,
            config,
        })
    }

    /// Bare root URL for the request behind `verdict`
    ///
    /// Used when a redirect target cannot be written as a `Location` header.
    pub fn fallback_url(&self, verdict: &Verdict) -> String {
        verdict
            .context
            .as_ref()
            .map_or_else(|| "/".to_string(), |ctx| self.engine.root_url(ctx, "/"))
    }

    /// Decide what to do with `req`
    ///
    /// Policy blocks are ordinary verdicts; `Err` is reserved for internal faults.
    pub async fn evaluate<B>(&self, req: &Request<B>, peer: Option<SocketAddr>) -> Result<Verdict> {
        let gateway = &self.config.gateway;
        let path = req.uri().path();

        if is_static_path(path, gateway) {
            return Ok(Verdict::pass_through());
        }

        let mut ctx = self.context(req, peer);

        if !self.geo.check(req.headers(), &ctx.client_ip).await {
            return Ok(Verdict {
                outcome: RoutingOutcome::forbidden(),
                context: Some(ctx),
                rate_limit: None,
            });
        }

        ctx.is_bot = self
            .bots
            .is_bot(req.headers().get(USER_AGENT).and_then(|v| v.to_str().ok()));

        let mut rate_limit = None;
        if !ctx.is_bot && self.rate_limiter.is_enabled() {
            let status = self.rate_limiter.check(&ctx.client_ip)?;
            if !status.allowed {
                let retry_after = self.rate_limiter.block_duration().as_secs();
                info!(client_ip = %ctx.client_ip, retry_after, "Request rate limited");
                return Ok(Verdict {
                    outcome: RoutingOutcome::too_many_requests(retry_after),
                    context: Some(ctx),
                    rate_limit: Some(status),
                });
            }
            rate_limit = Some(status);
        }

        let outcome = self.engine.dispatch(&ctx);
        debug!(
            host = %ctx.hostname,
            path = %ctx.path,
            subdomain = ctx.subdomain.map(|s| s.as_str()).unwrap_or("-"),
            authenticated = ctx.is_authenticated,
            outcome = outcome.kind(),
            "Routing decision"
        );

        Ok(Verdict { outcome, context: Some(ctx), rate_limit })
    }

    /// Last step for every response, including synthetic and error responses
    pub fn finalize<B>(&self, response: &mut Response<B>, verdict: &Verdict) {
        let headers = response.headers_mut();
        self.security_headers.apply(headers);

        if let Some(status) = verdict.rate_limit {
            insert_number(headers, names::rate_limit::LIMIT, u64::from(self.rate_limiter.limit()));
            insert_number(headers, names::rate_limit::REMAINING, u64::from(status.remaining));
        }
        if let RoutingOutcome::Block { retry_after_secs: Some(secs), .. } = verdict.outcome {
            insert_number(headers, RETRY_AFTER.as_str(), secs);
        }

        if !self.config.is_production() {
            if let Some(ctx) = &verdict.context {
                insert_debug_headers(headers, ctx);
            }
        }
    }

    /// Security headers only, for responses produced after an internal fault
    pub fn secure(&self, headers: &mut HeaderMap) {
        self.security_headers.apply(headers);
    }

    fn context<B>(&self, req: &Request<B>, peer: Option<SocketAddr>) -> RoutingContext {
        let gateway = &self.config.gateway;
        let headers = req.headers();

        let origin = RequestOrigin::from_request(req.uri(), headers, &gateway.default_scheme)
            .unwrap_or_else(|| RequestOrigin {
                scheme: gateway.default_scheme.clone(),
                host: gateway.root_domain.clone(),
            });

        RoutingContext {
            hostname: strip_port(&origin.host),
            path: req.uri().path().to_string(),
            query: req.uri().query().map(str::to_string),
            method: req.method().clone(),
            client_ip: client_ip(headers, peer),
            is_bot: false,
            is_authenticated: is_authenticated(headers, &gateway.session_cookie),
            subdomain: subdomain_of(&origin.host, gateway),
            origin,
        }
    }
}

fn insert_number(headers: &mut HeaderMap, name: &str, value: u64) {
    if let Ok(name) = HeaderName::from_bytes(name.as_bytes()) {
        headers.insert(name, HeaderValue::from(value));
    }
}

fn insert_debug_headers(headers: &mut HeaderMap, ctx: &RoutingContext) {
    let subdomain = ctx.subdomain.map(|s| s.as_str()).unwrap_or("root");
    let entries = [
        (names::debug::SUBDOMAIN, subdomain),
        (names::debug::PATH, ctx.path.as_str()),
        (names::debug::AUTHENTICATED, bool_str(ctx.is_authenticated)),
        (names::debug::CLIENT_IP, ctx.client_ip.as_str()),
        (names::debug::BOT, bool_str(ctx.is_bot)),
    ];
    for (name, value) in entries {
        if let Ok(value) = HeaderValue::from_str(value) {
            headers.insert(HeaderName::from_static(name), value);
        }
    }
}

fn bool_str(flag: bool) -> &'static str {
    if flag {
        "true"
    } else {
        "false"
    }
}
