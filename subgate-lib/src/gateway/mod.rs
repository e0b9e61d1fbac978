//! Per-request policy pipeline.

mod orchestrator;
mod verdict;

pub use orchestrator::GatewayOrchestrator;
pub use verdict::Verdict;
