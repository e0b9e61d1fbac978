use crate::routing::{RoutingContext, RoutingOutcome};
use crate::security::RateLimitStatus;

/// Everything the orchestrator decided about one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub outcome: RoutingOutcome,
    /// Absent for static assets, which skip classification entirely
    pub context: Option<RoutingContext>,
    /// Rate limit state after this request, when it was counted
    pub rate_limit: Option<RateLimitStatus>,
}

impl Verdict {
    pub fn pass_through() -> Self {
        Self { outcome: RoutingOutcome::Next, context: None, rate_limit: None }
    }
}
