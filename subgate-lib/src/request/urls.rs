use http::{HeaderMap, Uri};
use url::Url;

use crate::names::forwarded;

/// Scheme and host the client used to reach the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOrigin {
    pub scheme: String,
    pub host: String,
}

impl RequestOrigin {
    /// Derive the origin from `Host` (or the URI authority) and `X-Forwarded-Proto`
    ///
    /// Returns `None` when the request carries no usable host at all.
    pub fn from_request(uri: &Uri, headers: &HeaderMap, default_scheme: &str) -> Option<Self> {
        let host = headers
            .get(http::header::HOST)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(str::to_string)
            .or_else(|| uri.authority().map(|a| a.as_str().to_string()))?;

        let scheme = headers
            .get(forwarded::PROTO)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_ascii_lowercase())
            .filter(|v| v == "http" || v == "https")
            .or_else(|| uri.scheme_str().map(str::to_string))
            .unwrap_or_else(|| default_scheme.to_string());

        Some(Self { scheme, host })
    }

    /// Absolute URL of the request as the client sent it
    pub fn absolute(&self, path_and_query: &str) -> String {
        format!("{}://{}{}", self.scheme, self.host, path_and_query)
    }
}

/// Concatenate `base_prefix` and `path`, treating `/` as an empty suffix
///
/// The query string is carried over unchanged; the host never changes.
pub fn build_internal_path(base_prefix: &str, path: &str, query: Option<&str>) -> String {
    let base = base_prefix.trim_end_matches('/');
    let suffix = if path == "/" { "" } else { path };
    let mut target = format!("{base}{suffix}");
    if target.is_empty() {
        target.push('/');
    }
    if let Some(q) = query.filter(|q| !q.is_empty()) {
        target.push('?');
        target.push_str(q);
    }
    target
}

/// Absolute URL on the `auth` subdomain of the root domain, preserving the request scheme
pub fn build_auth_redirect_url(
    origin: &RequestOrigin,
    root_domain: &str,
    path: &str,
) -> Result<Url, url::ParseError> {
    Url::parse(&format!("{}://auth.{}{}", origin.scheme, root_domain, normalize_path(path)))
}

/// Absolute URL on the bare root domain, preserving the request scheme
pub fn build_root_url(
    origin: &RequestOrigin,
    root_domain: &str,
    path_and_query: &str,
) -> Result<Url, url::ParseError> {
    Url::parse(&format!("{}://{}{}", origin.scheme, root_domain, normalize_path(path_and_query)))
}

fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}
