use std::sync::atomic::{AtomicU8, Ordering};
use std::time::{Duration, Instant};

use crate::global_constants::RUN_STATE_POLL_SLICE_MS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RunState {
    Idle = 0,
    Running = 1,
    Stopping = 2,
}

impl RunState {
    fn from_raw(raw: u8) -> Self {
        match raw {
            1 => RunState::Running,
            2 => RunState::Stopping,
            _ => RunState::Idle,
        }
    }
}

/// Run state shared by every monitor of one run. Only the runner writes it;
/// monitors read it at each suspension point.
#[derive(Debug)]
pub struct RunSignal {
    state: AtomicU8,
}

impl Default for RunSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl RunSignal {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(RunState::Idle as u8),
        }
    }

    pub fn state(&self) -> RunState {
        RunState::from_raw(self.state.load(Ordering::Acquire))
    }

    pub fn is_running(&self) -> bool {
        self.state() == RunState::Running
    }

    /// Idle -> Running. Returns false if the signal was not idle.
    pub fn begin_run(&self) -> bool {
        self.transition(RunState::Idle, RunState::Running)
    }

    /// Running -> Stopping. Returns false if no run was active.
    pub fn request_stop(&self) -> bool {
        self.transition(RunState::Running, RunState::Stopping)
    }

    pub fn finish(&self) {
        self.state.store(RunState::Idle as u8, Ordering::Release);
    }

    /// Sleeps for `duration` unless the run leaves Running first.
    /// Returns whether the run is still active afterwards.
    pub fn pause(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        let slice = Duration::from_millis(RUN_STATE_POLL_SLICE_MS);

        while self.is_running() {
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            std::thread::sleep(slice.min(deadline - now));
        }

        false
    }

    fn transition(&self, from: RunState, to: RunState) -> bool {
        self.state
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}
