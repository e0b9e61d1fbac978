use http::{Method, StatusCode};

use crate::request::{RequestOrigin, Subdomain};

/// Request-scoped facts the routing decision is made from
///
/// Built once per request by the orchestrator and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingContext {
    /// Host without port, lowercased
    pub hostname: String,
    pub path: String,
    pub query: Option<String>,
    pub method: Method,
    pub client_ip: String,
    pub is_bot: bool,
    pub is_authenticated: bool,
    pub subdomain: Option<Subdomain>,
    /// Scheme and host the client used, for absolute redirect URLs
    pub origin: RequestOrigin,
}

impl RoutingContext {
    /// Path plus `?query` when a query is present
    pub fn path_and_query(&self) -> String {
        match self.query.as_deref().filter(|q| !q.is_empty()) {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }

    /// Absolute URL of the request as the client sent it
    pub fn original_url(&self) -> String {
        self.origin.absolute(&self.path_and_query())
    }
}

/// The single decision produced for a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingOutcome {
    /// Forward unchanged
    Next,
    /// Forward to another path (and query) on the same host
    Rewrite { target_path: String },
    /// Answer with a 3xx pointing at `target_url`
    Redirect { target_url: String, permanent: bool },
    /// Answer with a policy block (403, 429)
    Block { status: StatusCode, retry_after_secs: Option<u64> },
}

impl RoutingOutcome {
    pub fn redirect(target_url: impl Into<String>) -> Self {
        Self::Redirect { target_url: target_url.into(), permanent: false }
    }

    pub fn permanent_redirect(target_url: impl Into<String>) -> Self {
        Self::Redirect { target_url: target_url.into(), permanent: true }
    }

    pub fn forbidden() -> Self {
        Self::Block { status: StatusCode::FORBIDDEN, retry_after_secs: None }
    }

    pub fn too_many_requests(retry_after_secs: u64) -> Self {
        Self::Block {
            status: StatusCode::TOO_MANY_REQUESTS,
            retry_after_secs: Some(retry_after_secs),
        }
    }

    /// Short label for logs and debug headers
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::Rewrite { .. } => "rewrite",
            Self::Redirect { .. } => "redirect",
            Self::Block { .. } => "block",
        }
    }
}
