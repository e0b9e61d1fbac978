//! Fixed-window rate limiter with a cooldown block.
//!
//! Each identifier owns one [`RateLimitEntry`]. The whole read-modify-write of
//! a check runs while holding the entry's shard lock, so two concurrent
//! requests from one identifier can never both observe the same count.

use ahash::RandomState;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use super::clock::{Clock, SystemClock};
use crate::config::RateLimitConfig;
use crate::error::Result;

/// Per-identifier counter state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitEntry {
    /// Requests seen in the current window
    pub count: u32,
    /// End of the current window
    pub window_reset_at: Instant,
    /// End of the cooldown, if the limit tripped
    pub blocked_until: Option<Instant>,
}

impl RateLimitEntry {
    fn fresh(now: Instant, window: Duration) -> Self {
        Self { count: 1, window_reset_at: now + window, blocked_until: None }
    }

    fn is_blocked(&self, now: Instant) -> bool {
        self.blocked_until.is_some_and(|until| until > now)
    }

    /// Window elapsed and no block outstanding
    fn is_expired(&self, now: Instant) -> bool {
        self.window_reset_at <= now && !self.is_blocked(now)
    }
}

/// Result of a rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    pub allowed: bool,
    pub remaining: u32,
}

impl RateLimitStatus {
    fn denied() -> Self {
        Self { allowed: false, remaining: 0 }
    }
}

/// Rate limiting capability consumed by the gateway orchestrator
///
/// An error is an internal fault, distinct from a denied request.
pub trait RateLimitChecker: Send + Sync {
    fn check(&self, identifier: &str) -> Result<RateLimitStatus>;

    /// Configured requests per window, reported in `x-ratelimit-limit`
    fn limit(&self) -> u32;

    /// Cooldown reported in `Retry-After` when a request is denied
    fn block_duration(&self) -> Duration;

    /// Disabled checkers are skipped and produce no rate limit headers
    fn is_enabled(&self) -> bool {
        true
    }
}

/// In-memory, single-process rate limiter
#[derive(Debug)]
pub struct RateLimiter {
    entries: DashMap<String, RateLimitEntry, RandomState>,
    max_requests: u32,
    window: Duration,
    block: Duration,
    pub(super) sweep_interval: Duration,
    clock: Arc<dyn Clock>,
    pub(super) shutdown: CancellationToken,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::with_hasher(RandomState::new()),
            max_requests: config.max_requests,
            window: Duration::from_secs(config.window_seconds),
            block: Duration::from_secs(config.block_seconds),
            sweep_interval: Duration::from_secs(config.sweep_interval_seconds.max(1)),
            clock,
            shutdown: CancellationToken::new(),
        }
    }

    /// Record one request for `identifier` and decide whether it may proceed
    ///
    /// 1. An active block denies without touching the counter.
    /// 2. No entry, an elapsed window or an expired block starts a new window
    ///    at `count = 1`.
    /// 3. Otherwise the counter is incremented; exceeding the maximum starts
    ///    the cooldown.
    pub fn check(&self, identifier: &str) -> RateLimitStatus {
        let now = self.clock.now();

        match self.entries.entry(identifier.to_owned()) {
            Entry::Vacant(slot) => {
                slot.insert(RateLimitEntry::fresh(now, self.window));
                RateLimitStatus { allowed: true, remaining: self.max_requests.saturating_sub(1) }
            }
            Entry::Occupied(mut slot) => {
                let entry = slot.get_mut();

                if entry.is_blocked(now) {
                    return RateLimitStatus::denied();
                }

                if entry.window_reset_at <= now || entry.blocked_until.is_some() {
                    *entry = RateLimitEntry::fresh(now, self.window);
                    return RateLimitStatus {
                        allowed: true,
                        remaining: self.max_requests.saturating_sub(1),
                    };
                }

                entry.count = entry.count.saturating_add(1);
                if entry.count > self.max_requests {
                    entry.blocked_until = Some(now + self.block);
                    tracing::debug!(identifier, count = entry.count, "Rate limit exceeded");
                    return RateLimitStatus::denied();
                }

                RateLimitStatus { allowed: true, remaining: self.max_requests - entry.count }
            }
        }
    }

    /// Forget a single identifier, lifting any block
    pub fn reset(&self, identifier: &str) {
        self.entries.remove(identifier);
    }

    /// Forget every identifier
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Remove entries whose window and block have both expired
    ///
    /// Returns the number of entries removed.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            tracing::debug!(removed, remaining = self.entries.len(), "Rate limit sweep");
        }
        removed
    }

    /// Snapshot of the entry for `identifier`
    pub fn entry(&self, identifier: &str) -> Option<RateLimitEntry> {
        self.entries.get(identifier).map(|e| *e)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stop the background sweeper, if one was spawned
    pub fn close(&self) {
        self.shutdown.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.shutdown.is_cancelled()
    }
}

impl RateLimitChecker for RateLimiter {
    fn check(&self, identifier: &str) -> Result<RateLimitStatus> {
        Ok(RateLimiter::check(self, identifier))
    }

    fn limit(&self) -> u32 {
        self.max_requests
    }

    fn block_duration(&self) -> Duration {
        self.block
    }
}

/// Checker that admits everything, used when rate limiting is disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRateLimiter;

impl RateLimitChecker for NoopRateLimiter {
    fn check(&self, _identifier: &str) -> Result<RateLimitStatus> {
        Ok(RateLimitStatus { allowed: true, remaining: u32::MAX })
    }

    fn limit(&self) -> u32 {
        u32::MAX
    }

    fn block_duration(&self) -> Duration {
        Duration::ZERO
    }

    fn is_enabled(&self) -> bool {
        false
    }
}
