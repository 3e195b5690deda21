//! Generic state waiter
//!
//! Some resources report a secondary state that keeps moving after their
//! LRO completes (a Redis Enterprise cluster's `resourceState` can still be
//! `Creating` when the create operation says `Succeeded`). [`StateWaiter`]
//! is the pending/target/refresh loop for those: refresh the current state,
//! stop when it lands in the target set, keep waiting while it stays in the
//! pending set, and fail fast on anything else.

use std::future::Future;
use std::time::{Duration, Instant};

use crate::error::{CoreError, Result};

/// Waits for a refreshed state to land in a target set.
///
/// With an empty pending set any non-target state is treated as transient
/// and only the timeout stops the wait.
#[derive(Debug)]
pub struct StateWaiter<S> {
    target: Vec<S>,
    pending: Vec<S>,
    timeout: Duration,
    interval: Duration,
    delay: Duration,
}

impl<S> StateWaiter<S>
where
    S: Clone + PartialEq + std::fmt::Debug,
{
    pub fn new(target: Vec<S>) -> Self {
        Self {
            target,
            pending: Vec::new(),
            timeout: Duration::from_secs(30 * 60),
            interval: Duration::from_secs(10),
            delay: Duration::ZERO,
        }
    }

    /// States the resource is allowed to pass through.
    pub fn pending(mut self, pending: Vec<S>) -> Self {
        self.pending = pending;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Wait before the first refresh; some services briefly report the old
    /// state right after an operation completes.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn target_label(&self) -> String {
        format!("{:?}", self.target)
    }

    /// Run the loop. `refresh` is called once per iteration and returns the
    /// current state.
    pub async fn wait<F, Fut>(&self, mut refresh: F) -> Result<S>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<S>>,
    {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let start = Instant::now();
        loop {
            let state = refresh().await?;
            tracing::trace!(state = ?state, "state waiter refresh");

            if self.target.contains(&state) {
                return Ok(state);
            }
            if !self.pending.is_empty() && !self.pending.contains(&state) {
                return Err(CoreError::UnexpectedState {
                    state: format!("{state:?}"),
                    target: self.target_label(),
                });
            }
            if start.elapsed() > self.timeout {
                return Err(CoreError::StateWaitTimeout {
                    target: self.target_label(),
                    last: format!("{state:?}"),
                    timeout: self.timeout,
                });
            }

            tokio::time::sleep(self.interval).await;
        }
    }
}
