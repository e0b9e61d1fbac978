mod gateway;
mod headers;
mod loader;
mod root;
mod security;
mod telemetry;
mod timeout;

pub use gateway::GatewayConfig;
pub use headers::CustomHeader;
pub use loader::{load_from_path, parse, validate};
pub use root::{Config, Environment};
pub use security::{BotConfig, GeoConfig, RateLimitConfig, SecurityConfig, SecurityHeaders};
pub use telemetry::LoggingConfig;
pub use timeout::TimeoutConfig;
