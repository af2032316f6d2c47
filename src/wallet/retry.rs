//! Conflict retry policy
//!
//! Full-jitter exponential backoff: before attempt `n + 1` the coordinator
//! sleeps a random duration in `[0, min(max_delay, base_delay * 2^(n-1))]`.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts allowed per transfer; 0 = unbounded
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 64,
            base_delay_ms: 2,
            max_delay_ms: 200,
        }
    }
}

impl RetryPolicy {
    /// Retry on every conflict, forever
    pub fn unbounded() -> Self {
        Self {
            max_attempts: 0,
            ..Self::default()
        }
    }

    /// Retry immediately, without sleeping
    pub fn no_backoff(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay_ms: 0,
            max_delay_ms: 0,
        }
    }

    /// Whether another attempt may follow `attempts_made` failed ones
    pub fn allows_retry(&self, attempts_made: u32) -> bool {
        self.max_attempts == 0 || attempts_made < self.max_attempts
    }

    /// Upper bound of the sleep before the attempt following `attempts_made`
    pub fn ceiling(&self, attempts_made: u32) -> Duration {
        let shift = attempts_made.saturating_sub(1).min(20);
        let exp = self.base_delay_ms.saturating_mul(1u64 << shift);
        Duration::from_millis(exp.min(self.max_delay_ms))
    }

    /// Jittered sleep before the attempt following `attempts_made`
    pub fn backoff(&self, attempts_made: u32) -> Duration {
        let ceiling = self.ceiling(attempts_made).as_micros() as u64;
        if ceiling == 0 {
            return Duration::ZERO;
        }
        Duration::from_micros(rand::thread_rng().gen_range(0..=ceiling))
    }
}
