mod scenario_runner;
mod trigger_monitor;

#[cfg(test)]
pub(crate) mod test_support;

pub use scenario_runner::ScenarioRunner;
pub use trigger_monitor::MonitorReport;

#[cfg(test)]
pub use trigger_monitor::MonitorState;
