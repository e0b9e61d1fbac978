use http::header::HOST;
use http::{HeaderMap, HeaderValue};

use crate::names::forwarded;

/// Add X-Forwarded-* headers to a request bound for the upstream
///
/// 1. Appends `client_ip` to X-Forwarded-For (or creates it if missing)
/// 2. Sets X-Forwarded-Host from the request's Host header
/// 3. Sets X-Forwarded-Proto to `scheme` unless a load balancer already did
pub fn add_forwarded_headers(headers: &mut HeaderMap, client_ip: &str, scheme: &str) {
    let forwarded_for = match headers.get(forwarded::FOR).and_then(|v| v.to_str().ok()) {
        Some(existing) if !existing.trim().is_empty() => format!("{existing}, {client_ip}"),
        _ => client_ip.to_string(),
    };
    if let Ok(value) = HeaderValue::from_str(&forwarded_for) {
        headers.insert(forwarded::FOR, value);
    }

    if let Some(host) = headers.get(HOST).cloned() {
        headers.insert(forwarded::HOST, host);
    }

    if !headers.contains_key(forwarded::PROTO) {
        if let Ok(value) = HeaderValue::from_str(scheme) {
            headers.insert(forwarded::PROTO, value);
        }
    }
}
