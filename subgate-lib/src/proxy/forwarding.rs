use http::{Request, Response, Uri};
use http_body_util::BodyExt;
use hyper::body::Incoming;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::proxy::client_pool::ClientPool;
use crate::proxy::http_result::{HttpError, HttpResult};
use crate::proxy::synthetic_response::RespBody;

pub struct ForwardConfig<'a> {
    /// Upstream authority (`host:port`)
    pub upstream: &'a str,
    /// Replacement path and query for rewrites; `None` keeps the original
    pub target_path: Option<&'a str>,
    pub timeout: Duration,
    pub client_pool: &'a ClientPool,
}

/// Strip an optional `http://` scheme and trailing slash from a configured upstream
pub fn upstream_authority(upstream: &str) -> &str {
    let upstream = upstream.trim();
    upstream
        .strip_prefix("http://")
        .unwrap_or(upstream)
        .trim_end_matches('/')
}

/// Absolute upstream URI for `path_and_query`
pub fn upstream_uri(upstream: &str, path_and_query: &str) -> HttpResult<Uri> {
    let pq = if path_and_query.starts_with('/') {
        path_and_query.to_string()
    } else {
        format!("/{path_and_query}")
    };
    format!("http://{upstream}{pq}")
        .parse::<Uri>()
        .map_err(|e| HttpError::InvalidUri(e.to_string()))
}

/// Send `req` to the upstream and stream the response back
///
/// The `Host` header is left untouched so the application still sees the
/// subdomain the client asked for.
pub async fn forward(
    req: Request<Incoming>,
    config: ForwardConfig<'_>,
) -> HttpResult<Response<RespBody>> {
    let start = Instant::now();

    let original_pq = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let uri = upstream_uri(config.upstream, config.target_path.unwrap_or(original_pq))?;

    let (mut parts, body) = req.into_parts();
    parts.uri = uri;
    // upstream connection is always HTTP/1.1
    parts.version = http::Version::HTTP_11;
    let out_req = Request::from_parts(parts, body);

    let result = tokio::time::timeout(config.timeout, config.client_pool.client().request(out_req))
        .await
        .map_err(|_| {
            HttpError::UpstreamTimeout(u64::try_from(config.timeout.as_millis()).unwrap_or(u64::MAX))
        })?;

    match result {
        Ok(resp) => {
            debug!(
                status = resp.status().as_u16(),
                elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
                "Upstream responded"
            );
            Ok(resp.map(|b| b.boxed()))
        }
        Err(e) => Err(HttpError::FailedToGetResponseFromUpstream(e.to_string())),
    }
}
