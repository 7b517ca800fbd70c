pub const APPLICATION_NAME: &str = "ClickMate";
pub const APPLICATION_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APPLICATION_CONFIG_DIR_NAME: &str = "clickmate";

pub const LOG_TAG_MAIN: &str = "[MAIN]";
pub const LOG_TAG_CAPTURE: &str = "[CAPTURE]";
pub const LOG_TAG_MATCHER: &str = "[MATCHER]";
pub const LOG_TAG_MONITOR: &str = "[MONITOR]";
pub const LOG_TAG_RUNNER: &str = "[RUNNER]";
pub const LOG_TAG_STORE: &str = "[STORE]";
pub const LOG_TAG_INPUT: &str = "[INPUT]";
pub const LOG_TAG_KEYBOARD: &str = "[KEYBOARD]";
pub const LOG_TAG_MENU: &str = "[MENU]";
pub const LOG_TAG_AUTHOR: &str = "[AUTHOR]";
pub const LOG_TAG_SETTINGS: &str = "[SETTINGS]";
pub const LOG_TAG_RASTER: &str = "[RASTER]";
pub const LOG_TAG_POINT: &str = "[POINT]";

/// A match counts as a hit only when its score is strictly above this value.
pub const MATCH_HIT_THRESHOLD: f64 = 0.70;

/// Two flat regions are considered the same colour when every channel mean is within this distance.
pub const FLAT_REGION_CHANNEL_TOLERANCE: f64 = 1.0;

/// Searches costing more multiply-adds than this run coarse-to-fine on an image pyramid.
pub const MATCH_EXHAUSTIVE_SEARCH_BUDGET: u64 = 1 << 22;
pub const MATCH_PYRAMID_MIN_TEMPLATE_SIDE: usize = 4;
pub const MATCH_PYRAMID_CANDIDATE_COUNT: usize = 16;
/// Neighbourhood re-scored around each candidate when moving one pyramid level finer.
pub const MATCH_PYRAMID_REFINE_RADIUS: usize = 2;

pub const DEFAULT_INTER_CLICK_DELAY_MS: u64 = 500;
pub const DEFAULT_COOLDOWN_MS: u64 = 1000;
pub const DEFAULT_IDLE_DELAY_MS: u64 = 100;
pub const DEFAULT_CAPTURE_BACKOFF_MS: u64 = 1000;

/// Upper bound on how long a cancellable wait sleeps before re-reading the run state.
pub const RUN_STATE_POLL_SLICE_MS: u64 = 20;

pub const CLICK_PRESS_HOLD_MS: u64 = 20;

pub const INTERRUPT_EXIT_CODE: i32 = 130;

pub const DEFAULT_SCENARIO_FOLDER: &str = "scenarios";
pub const SCENARIO_FILE_EXTENSION: &str = "json";
pub const TRIGGER_IMAGE_PREFIX: &str = "trigger_";
pub const TRIGGER_IMAGE_EXTENSION: &str = "png";

pub const SETTINGS_FILE_NAME: &str = "settings.json";

pub const ERROR_CONTEXT_CAPTURE_MONITOR: &str = "Unable to capture monitor";
pub const ERROR_CONTEXT_LIST_MONITORS: &str = "Unable to enumerate monitors";

pub const MESSAGE_MOUSE_POSITION_FAILED: &str = "Failed to read the mouse position";
pub const MESSAGE_PICK_POINT_HINT: &str = "Right click to pick, Escape to cancel.";

pub const STARTUP_BANNER: &str = r#"
╔════════════════════════════════════════════════════════╗
║  ClickMate - screen automation helper                  ║
║                                                        ║
║  Record "when this appears, click here" scenarios      ║
║  and replay them against the live screen.              ║
║                                                        ║
║  Right click picks a point, Escape cancels.            ║
║  Ctrl+C or Escape stops a running scenario.            ║
╚════════════════════════════════════════════════════════╝
"#;
