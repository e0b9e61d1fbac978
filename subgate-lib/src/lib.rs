#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod gateway;
pub mod names;
pub mod proxy;
pub mod request;
pub mod routing;
pub mod security;
pub mod telemetry;

pub use config::{load_from_path, Config, Environment};
pub use error::{GatewayError, Result};
pub use gateway::{GatewayOrchestrator, Verdict};
pub use proxy::{run, serve};
pub use routing::{RoutingContext, RoutingEngine, RoutingOutcome};
