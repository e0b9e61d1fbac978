use std::sync::{Arc, Weak};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::limiter::RateLimiter;

/// Handle to the background sweep task
///
/// Dropping the handle stops the task.
#[derive(Debug)]
pub struct SweeperHandle {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl SweeperHandle {
    /// Cancel and wait for the task to finish
    pub async fn shutdown(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!("Rate limit sweeper ended abnormally: {e}");
            }
        }
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

impl RateLimiter {
    /// Run [`RateLimiter::sweep`] every `sweep_interval_seconds` on the current runtime
    ///
    /// The task holds only a weak reference and ends on [`RateLimiter::close`],
    /// when the handle is dropped, or when the limiter itself is dropped.
    pub fn spawn_sweeper(self: &Arc<Self>) -> SweeperHandle {
        let token = self.shutdown.child_token();
        let limiter: Weak<Self> = Arc::downgrade(self);
        let period = self.sweep_interval;
        let cancelled = token.clone();

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // first tick fires immediately
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    _ = interval.tick() => {
                        let Some(limiter) = limiter.upgrade() else { break };
                        limiter.sweep();
                    }
                }
            }
            tracing::debug!("Rate limit sweeper stopped");
        });

        SweeperHandle { token, task: Some(task) }
    }
}
