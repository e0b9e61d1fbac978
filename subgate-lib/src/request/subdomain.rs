use std::fmt;
use std::str::FromStr;

use crate::config::GatewayConfig;

/// Application area selected by the leftmost host label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subdomain {
    /// Authentication portal
    Auth,
    /// Administrative console
    Ump,
    /// Provider console
    Provider,
    /// Skills / education area
    Skills,
    /// Public API
    Api,
    /// Account area
    MyAccount,
    /// Wallet area
    Wallet,
    /// Explicit `www.` alias of the root domain
    Www,
}

impl Subdomain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Subdomain::Auth => "auth",
            Subdomain::Ump => "ump",
            Subdomain::Provider => "provider",
            Subdomain::Skills => "skills",
            Subdomain::Api => "api",
            Subdomain::MyAccount => "myaccount",
            Subdomain::Wallet => "wallet",
            Subdomain::Www => "www",
        }
    }
}

impl fmt::Display for Subdomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subdomain {
    type Err = ();

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        match label {
            "auth" => Ok(Subdomain::Auth),
            "ump" => Ok(Subdomain::Ump),
            "provider" => Ok(Subdomain::Provider),
            "skills" => Ok(Subdomain::Skills),
            "api" => Ok(Subdomain::Api),
            "myaccount" => Ok(Subdomain::MyAccount),
            "wallet" => Ok(Subdomain::Wallet),
            "www" => Ok(Subdomain::Www),
            _ => Err(()),
        }
    }
}

/// Remove a trailing `:port` (digits only) and lowercase the host
pub fn strip_port(host: &str) -> String {
    let host = host.trim();
    let without_port = match host.rsplit_once(':') {
        Some((name, port))
            if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) && !name.is_empty() =>
        {
            name
        }
        _ => host,
    };
    without_port.trim_end_matches('.').to_ascii_lowercase()
}

/// Resolve the subdomain of `host` relative to the configured root domain
///
/// Returns `None` for the apex itself, for hosts outside the root domain, for
/// multi-label prefixes (`a.b.<root>`) and for labels that are not in the
/// configured subdomain set.
pub fn subdomain_of(host: &str, config: &GatewayConfig) -> Option<Subdomain> {
    let host = strip_port(host);
    let root = strip_port(&config.root_domain);

    if root.is_empty() || host == root {
        return None;
    }

    let label = host.strip_suffix(&root)?.strip_suffix('.')?;
    if label.is_empty() || label.contains('.') {
        return None;
    }

    if !config.subdomains.iter().any(|s| s.eq_ignore_ascii_case(label)) {
        return None;
    }

    label.parse().ok()
}
