use http::HeaderMap;
use std::net::SocketAddr;

use crate::names::forwarded;

/// Fallback identity when neither headers nor the socket name a client
pub const LOOPBACK: &str = "127.0.0.1";

/// Derive the client IP used for rate limiting and logging
///
/// Order: first entry of `X-Forwarded-For`, then `X-Real-IP`, then the socket
/// peer, then loopback. Forwarded headers are trusted as-is; the gateway is
/// expected to sit behind a load balancer that overwrites them.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    if let Some(first) = header_str(headers, forwarded::FOR)
        .and_then(|xff| xff.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
    {
        return first.to_string();
    }

    if let Some(real_ip) = header_str(headers, forwarded::REAL_IP)
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
    {
        return real_ip.to_string();
    }

    peer.map(|p| p.ip().to_string())
        .unwrap_or_else(|| LOOPBACK.to_string())
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
