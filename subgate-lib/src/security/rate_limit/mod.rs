//! Per-client rate limiting for the gateway.
//!
//! A fixed window counter per identifier (normally the client IP) with a
//! cooldown block that starts when the counter exceeds the configured maximum.
//!
//! # Architecture
//!
//! 1. **RateLimiter** (`limiter.rs`): the counter table, a sharded concurrent
//!    map so each check is a single atomic read-modify-write per identifier.
//!
//! 2. **Sweeper** (`sweeper.rs`): a background task that periodically drops
//!    entries whose window and block have both expired.
//!
//! 3. **Clock** (`clock.rs`): time source, swapped for a manual clock in tests.
//!
//! # Example Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use subgate_lib::config::RateLimitConfig;
//! use subgate_lib::security::rate_limit::RateLimiter;
//!
//! let limiter = Arc::new(RateLimiter::new(&RateLimitConfig::default()));
//! let _sweeper = limiter.spawn_sweeper();
//!
//! let status = limiter.check("203.0.113.7");
//! if !status.allowed {
//!     // respond 429 with Retry-After
//! }
//!
//! limiter.close();
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [security.rate_limit]
//! enabled = true
//! window_seconds = 60
//! max_requests = 100
//! block_seconds = 300
//! sweep_interval_seconds = 300
//! ```

mod clock;
mod limiter;
mod sweeper;

pub use clock::{Clock, ManualClock, SystemClock};
pub use limiter::{
    NoopRateLimiter, RateLimitChecker, RateLimitEntry, RateLimitStatus, RateLimiter,
};
pub use sweeper::SweeperHandle;
