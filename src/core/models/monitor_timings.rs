use std::time::Duration;

use crate::global_constants::{
    DEFAULT_CAPTURE_BACKOFF_MS, DEFAULT_COOLDOWN_MS, DEFAULT_IDLE_DELAY_MS,
    DEFAULT_INTER_CLICK_DELAY_MS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorTimings {
    pub inter_click_delay: Duration,
    pub cooldown: Duration,
    pub idle_delay: Duration,
    pub capture_backoff: Duration,
}

impl Default for MonitorTimings {
    fn default() -> Self {
        Self {
            inter_click_delay: Duration::from_millis(DEFAULT_INTER_CLICK_DELAY_MS),
            cooldown: Duration::from_millis(DEFAULT_COOLDOWN_MS),
            idle_delay: Duration::from_millis(DEFAULT_IDLE_DELAY_MS),
            capture_backoff: Duration::from_millis(DEFAULT_CAPTURE_BACKOFF_MS),
        }
    }
}

impl MonitorTimings {
    /// Worst-case time a monitor may spend in one wait before it re-checks the run state.
    pub fn longest_wait(&self) -> Duration {
        self.inter_click_delay
            .max(self.cooldown)
            .max(self.idle_delay)
            .max(self.capture_backoff)
    }
}
