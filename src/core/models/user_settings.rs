use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::models::MonitorTimings;
use crate::global_constants;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSettings {
    #[serde(default = "default_scenario_folder")]
    pub scenario_folder: PathBuf,
    #[serde(default = "default_inter_click_delay_ms")]
    pub inter_click_delay_ms: u64,
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
    #[serde(default = "default_idle_delay_ms")]
    pub idle_delay_ms: u64,
    #[serde(default = "default_capture_backoff_ms")]
    pub capture_backoff_ms: u64,
}

fn default_scenario_folder() -> PathBuf {
    PathBuf::from(global_constants::DEFAULT_SCENARIO_FOLDER)
}

fn default_inter_click_delay_ms() -> u64 {
    global_constants::DEFAULT_INTER_CLICK_DELAY_MS
}

fn default_cooldown_ms() -> u64 {
    global_constants::DEFAULT_COOLDOWN_MS
}

fn default_idle_delay_ms() -> u64 {
    global_constants::DEFAULT_IDLE_DELAY_MS
}

fn default_capture_backoff_ms() -> u64 {
    global_constants::DEFAULT_CAPTURE_BACKOFF_MS
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            scenario_folder: default_scenario_folder(),
            inter_click_delay_ms: default_inter_click_delay_ms(),
            cooldown_ms: default_cooldown_ms(),
            idle_delay_ms: default_idle_delay_ms(),
            capture_backoff_ms: default_capture_backoff_ms(),
        }
    }
}

impl UserSettings {
    pub fn load() -> anyhow::Result<Self> {
        let settings_path = Self::get_settings_file_path()?;
        Self::load_from_path(&settings_path)
    }

    pub fn load_from_path(settings_path: &Path) -> anyhow::Result<Self> {
        if !settings_path.exists() {
            log::info!(
                "{} No settings file found, using defaults",
                global_constants::LOG_TAG_SETTINGS
            );
            let default_settings = Self::default();
            default_settings.save_to_path(settings_path)?;
            return Ok(default_settings);
        }

        let contents = std::fs::read_to_string(settings_path)?;
        let settings: UserSettings = serde_json::from_str(&contents)?;

        log::info!(
            "{} Loaded settings from {:?}",
            global_constants::LOG_TAG_SETTINGS,
            settings_path
        );
        log::debug!(
            "{} Scenario folder: {:?}",
            global_constants::LOG_TAG_SETTINGS,
            settings.scenario_folder
        );

        Ok(settings)
    }

    pub fn save_to_path(&self, settings_path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = settings_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(settings_path, contents)?;

        log::info!(
            "{} Saved settings to {:?}",
            global_constants::LOG_TAG_SETTINGS,
            settings_path
        );
        Ok(())
    }

    pub fn monitor_timings(&self) -> MonitorTimings {
        MonitorTimings {
            inter_click_delay: Duration::from_millis(self.inter_click_delay_ms),
            cooldown: Duration::from_millis(self.cooldown_ms),
            idle_delay: Duration::from_millis(self.idle_delay_ms),
            capture_backoff: Duration::from_millis(self.capture_backoff_ms),
        }
    }

    fn get_settings_file_path() -> anyhow::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join(global_constants::APPLICATION_CONFIG_DIR_NAME);

        Ok(config_dir.join(global_constants::SETTINGS_FILE_NAME))
    }
}
