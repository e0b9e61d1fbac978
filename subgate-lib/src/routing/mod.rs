//! Per-subdomain routing decisions.

mod engine;
mod outcome;

pub use engine::RoutingEngine;
pub use outcome::{RoutingContext, RoutingOutcome};
