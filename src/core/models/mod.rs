mod match_outcome;
mod monitor_timings;
mod point;
mod raster;
mod run_state;
mod scenario;
mod user_settings;

pub use match_outcome::MatchOutcome;
pub use monitor_timings::MonitorTimings;
pub use point::Point;
pub use raster::Raster;
pub use run_state::{RunSignal, RunState};
pub use scenario::{ReferenceImage, Scenario, TriggerDefinition};
pub use user_settings::UserSettings;
