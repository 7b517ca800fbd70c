use std::sync::Arc;

use crate::core::errors::{MatchError, TriggerSetupError};
use crate::core::interfaces::adapters::TemplateMatcher;
use crate::core::interfaces::ports::{InputInjector, ScreenCapturer};
use crate::core::models::{MonitorTimings, Point, Raster, RunSignal, TriggerDefinition};
use crate::global_constants::LOG_TAG_MONITOR;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Created,
    Polling,
    Matching,
    Acting,
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorReport {
    pub trigger_index: usize,
    pub action_passes: u64,
    pub clicks_issued: u64,
    pub final_state: MonitorState,
}

/// Collaborators shared by every monitor of a run.
#[derive(Clone)]
pub struct MonitorDependencies {
    pub screen_capturer: Arc<dyn ScreenCapturer>,
    pub template_matcher: Arc<dyn TemplateMatcher>,
    pub input_injector: Arc<dyn InputInjector>,
    pub timings: MonitorTimings,
}

/// Watches the screen for one trigger's reference image and replays its clicks.
pub struct TriggerMonitor {
    trigger_index: usize,
    reference_image: Raster,
    click_sequence: Vec<Point>,
    dependencies: MonitorDependencies,
    run_signal: Arc<RunSignal>,
    state: MonitorState,
    action_passes: u64,
    clicks_issued: u64,
}

impl TriggerMonitor {
    /// Decodes the reference image and, when the screen size is known, checks that
    /// the template fits on screen. The monitor never starts if either step fails.
    pub fn prepare(
        trigger_index: usize,
        definition: &TriggerDefinition,
        screen_size: Option<(u32, u32)>,
        dependencies: MonitorDependencies,
        run_signal: Arc<RunSignal>,
    ) -> Result<Self, TriggerSetupError> {
        let reference_image = definition.reference_image.decode()?;

        if let Some((screen_width, screen_height)) = screen_size {
            if reference_image.width() > screen_width || reference_image.height() > screen_height
            {
                return Err(MatchError::InvalidTemplate {
                    template_width: reference_image.width(),
                    template_height: reference_image.height(),
                    screen_width,
                    screen_height,
                }
                .into());
            }
        }

        log::debug!(
            "{} trigger #{} prepared: {}x{} template, {} click(s)",
            LOG_TAG_MONITOR,
            trigger_index + 1,
            reference_image.width(),
            reference_image.height(),
            definition.click_sequence.len()
        );

        Ok(Self {
            trigger_index,
            reference_image,
            click_sequence: definition.click_sequence.clone(),
            dependencies,
            run_signal,
            state: MonitorState::Created,
            action_passes: 0,
            clicks_issued: 0,
        })
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn run(mut self) -> MonitorReport {
        log::info!(
            "{} trigger #{} monitoring started",
            LOG_TAG_MONITOR,
            self.trigger_index + 1
        );

        while self.run_signal.is_running() {
            if !self.poll_once() {
                break;
            }
        }

        self.transition(MonitorState::Stopped);
        log::info!(
            "{} trigger #{} stopped after {} action pass(es), {} click(s)",
            LOG_TAG_MONITOR,
            self.trigger_index + 1,
            self.action_passes,
            self.clicks_issued
        );

        MonitorReport {
            trigger_index: self.trigger_index,
            action_passes: self.action_passes,
            clicks_issued: self.clicks_issued,
            final_state: self.state,
        }
    }

    /// One capture, match and optional action pass. Returns false once the monitor must exit.
    fn poll_once(&mut self) -> bool {
        self.transition(MonitorState::Polling);

        let screen = match self.dependencies.screen_capturer.capture_full() {
            Ok(screen) => screen,
            Err(error) => {
                log::warn!(
                    "{} trigger #{} capture failed: {}; retrying in {:?}",
                    LOG_TAG_MONITOR,
                    self.trigger_index + 1,
                    error,
                    self.dependencies.timings.capture_backoff
                );
                return self
                    .run_signal
                    .pause(self.dependencies.timings.capture_backoff);
            }
        };

        self.transition(MonitorState::Matching);

        let keep_searching = || self.run_signal.is_running();
        let outcome = match self.dependencies.template_matcher.find_best_match(
            &screen,
            &self.reference_image,
            &keep_searching,
        ) {
            Ok(outcome) => outcome,
            Err(MatchError::Cancelled) => {
                log::debug!(
                    "{} trigger #{} match abandoned, run is stopping",
                    LOG_TAG_MONITOR,
                    self.trigger_index + 1
                );
                return false;
            }
            Err(error) => {
                log::error!(
                    "{} trigger #{} cannot be matched any more: {}",
                    LOG_TAG_MONITOR,
                    self.trigger_index + 1,
                    error
                );
                return false;
            }
        };

        if !outcome.is_hit() {
            return self.run_signal.pause(self.dependencies.timings.idle_delay);
        }

        log::info!(
            "{} trigger #{} hit: score {:.3} at {}",
            LOG_TAG_MONITOR,
            self.trigger_index + 1,
            outcome.score,
            outcome.location
        );

        self.transition(MonitorState::Acting);
        if !self.perform_click_sequence() {
            return false;
        }
        self.action_passes += 1;

        self.run_signal.pause(self.dependencies.timings.cooldown)
    }

    /// Clicks every point in order. Returns false if the run stopped before the
    /// last click was issued; the remaining clicks are dropped.
    fn perform_click_sequence(&mut self) -> bool {
        let sequence_length = self.click_sequence.len();

        for (position, point) in self.click_sequence.iter().enumerate() {
            if !self.run_signal.is_running() {
                log::debug!(
                    "{} trigger #{} stopped mid-sequence, dropping {} click(s)",
                    LOG_TAG_MONITOR,
                    self.trigger_index + 1,
                    sequence_length - position
                );
                return false;
            }

            log::info!(
                "{} trigger #{} clicking {} ({}/{})",
                LOG_TAG_MONITOR,
                self.trigger_index + 1,
                point,
                position + 1,
                sequence_length
            );
            self.dependencies.input_injector.click(*point);
            self.clicks_issued += 1;

            if !self
                .run_signal
                .pause(self.dependencies.timings.inter_click_delay)
            {
                let dropped = sequence_length - position - 1;
                if dropped > 0 {
                    log::debug!(
                        "{} trigger #{} stopped mid-sequence, dropping {} click(s)",
                        LOG_TAG_MONITOR,
                        self.trigger_index + 1,
                        dropped
                    );
                }
                return dropped == 0;
            }
        }

        true
    }

    fn transition(&mut self, next_state: MonitorState) {
        if self.state != next_state {
            log::trace!(
                "{} trigger #{} {:?} -> {:?}",
                LOG_TAG_MONITOR,
                self.trigger_index + 1,
                self.state,
                next_state
            );
            self.state = next_state;
        }
    }
}
