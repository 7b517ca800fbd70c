use std::sync::Arc;
use std::thread::JoinHandle;

use crate::core::errors::RunnerError;
use crate::core::interfaces::adapters::TemplateMatcher;
use crate::core::interfaces::ports::{InputInjector, ScreenCapturer};
use crate::core::models::{MonitorTimings, RunSignal, RunState, Scenario};
use crate::core::orchestrators::trigger_monitor::{
    MonitorDependencies, MonitorReport, TriggerMonitor,
};
use crate::global_constants::LOG_TAG_RUNNER;

/// Starts one monitor thread per trigger of a scenario and stops them together.
pub struct ScenarioRunner {
    dependencies: MonitorDependencies,
}

/// A live run. Owns the monitor threads; dropping it stops and joins them.
pub struct RunHandle {
    scenario_name: String,
    run_signal: Arc<RunSignal>,
    workers: Vec<JoinHandle<MonitorReport>>,
}

impl ScenarioRunner {
    pub fn build(
        screen_capturer: Arc<dyn ScreenCapturer>,
        template_matcher: Arc<dyn TemplateMatcher>,
        input_injector: Arc<dyn InputInjector>,
        timings: MonitorTimings,
    ) -> Self {
        log::debug!(
            "{} building runner, longest wait {:?}",
            LOG_TAG_RUNNER,
            timings.longest_wait()
        );

        Self {
            dependencies: MonitorDependencies {
                screen_capturer,
                template_matcher,
                input_injector,
                timings,
            },
        }
    }

    /// Launches every trigger of `scenario`, or none of them.
    pub fn start(&self, scenario: &Scenario) -> Result<RunHandle, RunnerError> {
        if scenario.triggers.is_empty() {
            return Err(RunnerError::EmptyScenario(scenario.name.clone()));
        }

        log::info!(
            "{} starting scenario '{}' with {} trigger(s)",
            LOG_TAG_RUNNER,
            scenario.name,
            scenario.triggers.len()
        );

        let run_signal = Arc::new(RunSignal::new());
        let monitors = self.prepare_monitors(scenario, &run_signal)?;

        let mut handle = RunHandle {
            scenario_name: scenario.name.clone(),
            run_signal: Arc::clone(&run_signal),
            workers: Vec::with_capacity(monitors.len()),
        };

        run_signal.begin_run();

        for (trigger_index, monitor) in monitors.into_iter().enumerate() {
            log::trace!(
                "{} spawning trigger #{} in state {:?}",
                LOG_TAG_RUNNER,
                trigger_index + 1,
                monitor.state()
            );
            let spawn_result = std::thread::Builder::new()
                .name(format!("trigger-monitor-{}", trigger_index + 1))
                .spawn(move || monitor.run());

            match spawn_result {
                Ok(worker) => handle.workers.push(worker),
                Err(error) => {
                    log::error!(
                        "{} failed to spawn worker for trigger #{}: {}",
                        LOG_TAG_RUNNER,
                        trigger_index + 1,
                        error
                    );
                    handle.stop();
                    return Err(RunnerError::WorkerSpawn(error));
                }
            }
        }

        log::info!(
            "{} scenario '{}' running ({} monitor(s))",
            LOG_TAG_RUNNER,
            scenario.name,
            handle.workers.len()
        );

        Ok(handle)
    }

    pub fn stop(&self, handle: &mut RunHandle) -> Vec<MonitorReport> {
        handle.stop()
    }

    fn prepare_monitors(
        &self,
        scenario: &Scenario,
        run_signal: &Arc<RunSignal>,
    ) -> Result<Vec<TriggerMonitor>, RunnerError> {
        let screen_size = self.current_screen_size();

        scenario
            .triggers
            .iter()
            .enumerate()
            .map(|(trigger_index, definition)| {
                TriggerMonitor::prepare(
                    trigger_index,
                    definition,
                    screen_size,
                    self.dependencies.clone(),
                    Arc::clone(run_signal),
                )
                .map_err(|source| {
                    log::error!(
                        "{} trigger #{} ({}) failed to start: {}",
                        LOG_TAG_RUNNER,
                        trigger_index + 1,
                        definition.reference_image.identifier(),
                        source
                    );
                    RunnerError::TriggerSetup {
                        index: trigger_index,
                        image: definition.reference_image.identifier().to_string(),
                        source,
                    }
                })
            })
            .collect()
    }

    fn current_screen_size(&self) -> Option<(u32, u32)> {
        match self.dependencies.screen_capturer.capture_full() {
            Ok(screen) => Some((screen.width(), screen.height())),
            Err(error) => {
                log::warn!(
                    "{} screen size capture failed ({}), template sizes checked on first match",
                    LOG_TAG_RUNNER,
                    error
                );
                None
            }
        }
    }
}

impl RunHandle {
    pub fn scenario_name(&self) -> &str {
        &self.scenario_name
    }

    pub fn run_state(&self) -> RunState {
        self.run_signal.state()
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Signals Stopping, joins every monitor, then returns to Idle.
    /// Calling it again on a stopped handle does nothing.
    pub fn stop(&mut self) -> Vec<MonitorReport> {
        if self.workers.is_empty() {
            self.run_signal.finish();
            return Vec::new();
        }

        log::info!(
            "{} stopping scenario '{}'",
            LOG_TAG_RUNNER,
            self.scenario_name
        );
        self.run_signal.request_stop();

        let reports: Vec<MonitorReport> = self
            .workers
            .drain(..)
            .filter_map(|worker| match worker.join() {
                Ok(report) => Some(report),
                Err(_) => {
                    log::error!("{} a trigger monitor panicked", LOG_TAG_RUNNER);
                    None
                }
            })
            .collect();

        self.run_signal.finish();

        let total_clicks: u64 = reports.iter().map(|report| report.clicks_issued).sum();
        log::info!(
            "{} scenario '{}' stopped: {} monitor(s) joined, {} click(s) issued",
            LOG_TAG_RUNNER,
            self.scenario_name,
            reports.len(),
            total_clicks
        );

        reports
    }
}

impl Drop for RunHandle {
    fn drop(&mut self) {
        if !self.workers.is_empty() {
            log::warn!(
                "{} run handle for '{}' dropped while running, stopping",
                LOG_TAG_RUNNER,
                self.scenario_name
            );
            self.stop();
        }
    }
}
