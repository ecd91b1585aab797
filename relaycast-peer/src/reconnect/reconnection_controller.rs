use crate::reconnect::ReconnectPolicy;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Reconnect after `delay`; `attempt` counts from 1.
    Retry { attempt: u32, delay: Duration },
    /// The policy is exhausted.
    GiveUp { attempts: u32 },
}

/// Decides whether and when to rebuild a lost link.
///
/// Owns the retry count and guarantees at most one pending retry. The
/// coordinator owns the timer itself and reports back through
/// [`begin_attempt`](Self::begin_attempt) when it fires.
#[derive(Debug)]
pub struct ReconnectionController {
    policy: ReconnectPolicy,
    retry_count: u32,
    retry_pending: bool,
    exhausted: bool,
}

impl ReconnectionController {
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self {
            policy,
            retry_count: 0,
            retry_pending: false,
            exhausted: false,
        }
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    pub fn is_pending(&self) -> bool {
        self.retry_pending
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Called on relay loss or terminal session failure.
    ///
    /// Returns `None` when a retry is already scheduled or the controller
    /// already gave up, so repeated failures never stack timers.
    pub fn on_failure(&mut self) -> Option<RetryDecision> {
        if self.retry_pending || self.exhausted {
            return None;
        }

        if self.retry_count >= self.policy.max_retries {
            self.exhausted = true;
            warn!("Max reconnection attempts ({}) reached", self.policy.max_retries);
            return Some(RetryDecision::GiveUp {
                attempts: self.retry_count,
            });
        }

        self.retry_count += 1;
        self.retry_pending = true;
        let delay = self.policy.delay_for(self.retry_count);
        info!(
            "Attempting reconnection {}/{} in {:?}",
            self.retry_count, self.policy.max_retries, delay
        );
        Some(RetryDecision::Retry {
            attempt: self.retry_count,
            delay,
        })
    }

    /// The scheduled retry fired.
    pub fn begin_attempt(&mut self) {
        self.retry_pending = false;
    }

    /// A peer connection reached Connected.
    pub fn on_success(&mut self) {
        self.retry_count = 0;
        self.exhausted = false;
    }

    /// Drop any scheduled retry without touching the count.
    pub fn cancel(&mut self) {
        self.retry_pending = false;
    }

    /// Manual reconnect: start over from zero.
    pub fn reset(&mut self) {
        self.retry_count = 0;
        self.retry_pending = false;
        self.exhausted = false;
    }
}
