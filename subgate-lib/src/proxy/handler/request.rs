use hyper::body::Incoming;
use hyper::{Request, Response};
use std::net::SocketAddr;
use tokio::time::Instant;
use tracing::{debug, error, warn};

use crate::gateway::{GatewayOrchestrator, Verdict};
use crate::proxy::context::ProxyContext;
use crate::proxy::forwarding::{forward, ForwardConfig};
use crate::proxy::handler::headers::add_forwarded_headers;
use crate::proxy::http_result::HttpResult;
use crate::proxy::synthetic_response::{
    blocked_response, redirect_response, synthetic_error_response, RespBody,
};
use crate::routing::RoutingOutcome;
use http::StatusCode;

/// Evaluate the request, execute the outcome and stamp the response
///
/// Never fails: upstream errors become 502/504, internal faults become 500,
/// and every response passes through [`GatewayOrchestrator::finalize`] or at
/// least receives the security headers.
///
/// [`GatewayOrchestrator::finalize`]: crate::gateway::GatewayOrchestrator::finalize
pub async fn handle_request(
    req: Request<Incoming>,
    peer: SocketAddr,
    ctx: &ProxyContext,
) -> Response<RespBody> {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    // evaluate on the head only, the body is never inspected
    let (parts, body) = req.into_parts();
    let head = Request::from_parts(parts, ());
    let verdict = match ctx.gateway.evaluate(&head, Some(peer)).await {
        Ok(v) => v,
        Err(e) => {
            error!(%method, %path, error = %e, "Gateway evaluation failed");
            return fault_response(&ctx.gateway);
        }
    };
    let (parts, ()) = head.into_parts();
    let req = Request::from_parts(parts, body);

    let mut resp = match execute(req, peer, &verdict, ctx).await {
        Ok(resp) => resp,
        Err(e) => {
            let code = StatusCode::from(e.clone());
            if code.is_server_error() && code != StatusCode::INTERNAL_SERVER_ERROR {
                warn!(%method, %path, error_type = e.error_type(), "{e}");
            } else {
                error!(%method, %path, error_type = e.error_type(), "{e}");
            }
            synthetic_error_response(code)
        }
    };

    ctx.gateway.finalize(&mut resp, &verdict);

    debug!(
        %method,
        %path,
        status = resp.status().as_u16(),
        outcome = verdict.outcome.kind(),
        elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        "Request handled"
    );
    resp
}

async fn execute(
    mut req: Request<Incoming>,
    peer: SocketAddr,
    verdict: &Verdict,
    ctx: &ProxyContext,
) -> HttpResult<Response<RespBody>> {
    let target_path = match &verdict.outcome {
        RoutingOutcome::Next => None,
        RoutingOutcome::Rewrite { target_path } => Some(target_path.as_str()),
        RoutingOutcome::Redirect { target_url, permanent } => {
            return redirect_or_root(&ctx.gateway, verdict, target_url, *permanent);
        }
        RoutingOutcome::Block { status, retry_after_secs } => {
            return Ok(blocked_response(*status, *retry_after_secs));
        }
    };

    let scheme = verdict
        .context
        .as_ref()
        .map_or(ctx.default_scheme.as_str(), |c| c.origin.scheme.as_str());
    add_forwarded_headers(req.headers_mut(), &peer.ip().to_string(), scheme);

    forward(
        req,
        ForwardConfig {
            upstream: &ctx.upstream,
            target_path,
            timeout: ctx.upstream_timeout,
            client_pool: &ctx.client_pool,
        },
    )
    .await
}

/// 500 for an internal fault, still carrying the security headers
fn fault_response(gateway: &GatewayOrchestrator) -> Response<RespBody> {
    let mut resp = synthetic_error_response(StatusCode::INTERNAL_SERVER_ERROR);
    gateway.secure(resp.headers_mut());
    resp
}

/// Redirect to `target_url`, or temporarily to the bare root when it is not a
/// valid `Location` value
fn redirect_or_root(
    gateway: &GatewayOrchestrator,
    verdict: &Verdict,
    target_url: &str,
    permanent: bool,
) -> HttpResult<Response<RespBody>> {
    redirect_response(target_url, permanent).or_else(|e| {
        warn!(error = %e, "Unusable redirect target, sending client to the root domain");
        redirect_response(&gateway.fallback_url(verdict), false)
    })
}
