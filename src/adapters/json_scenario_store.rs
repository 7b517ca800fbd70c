use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::errors::StoreError;
use crate::core::interfaces::adapters::ScenarioStore;
use crate::core::models::{Point, Raster, ReferenceImage, Scenario, TriggerDefinition};
use crate::global_constants::{
    LOG_TAG_STORE, SCENARIO_FILE_EXTENSION, TRIGGER_IMAGE_EXTENSION, TRIGGER_IMAGE_PREFIX,
};

#[derive(Debug, Serialize, Deserialize)]
struct ScenarioRecord {
    triggers: Vec<TriggerRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TriggerRecord {
    image: String,
    clicks: Vec<(i32, i32)>,
}

/// Keeps each scenario as `<name>.json` next to its trigger images in one folder.
pub struct JsonScenarioStore {
    scenario_folder: PathBuf,
}

impl JsonScenarioStore {
    pub fn open(scenario_folder: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let scenario_folder = scenario_folder.into();
        std::fs::create_dir_all(&scenario_folder).map_err(|source| StoreError::Io {
            path: scenario_folder.clone(),
            source,
        })?;

        log::info!("{} using scenario folder {:?}", LOG_TAG_STORE, scenario_folder);
        Ok(Self { scenario_folder })
    }

    pub fn folder(&self) -> &Path {
        &self.scenario_folder
    }

    fn validate_name(name: &str) -> Result<(), StoreError> {
        let is_blank = name.trim().is_empty();
        let has_separator = name.contains(['/', '\\']);
        let is_relative_marker = name == "." || name == "..";

        if is_blank || has_separator || is_relative_marker {
            return Err(StoreError::InvalidName(name.to_string()));
        }

        Ok(())
    }

    fn scenario_path(&self, name: &str) -> Result<PathBuf, StoreError> {
        Self::validate_name(name)?;
        Ok(self
            .scenario_folder
            .join(format!("{}.{}", name, SCENARIO_FILE_EXTENSION)))
    }

    fn convert_scenario_to_record(scenario: &Scenario) -> ScenarioRecord {
        ScenarioRecord {
            triggers: scenario
                .triggers
                .iter()
                .map(|trigger| TriggerRecord {
                    image: trigger.reference_image.identifier().to_string(),
                    clicks: trigger
                        .click_sequence
                        .iter()
                        .map(|&point| point.into())
                        .collect(),
                })
                .collect(),
        }
    }

    fn convert_record_to_scenario(&self, name: &str, record: ScenarioRecord) -> Scenario {
        let triggers = record
            .triggers
            .into_iter()
            .map(|trigger| {
                let location = self.scenario_folder.join(&trigger.image);
                TriggerDefinition::new(
                    ReferenceImage::new(trigger.image, location),
                    trigger.clicks.into_iter().map(Point::from).collect(),
                )
            })
            .collect();

        Scenario::new(name, triggers)
    }
}

impl ScenarioStore for JsonScenarioStore {
    fn save(&self, name: &str, scenario: &Scenario) -> Result<(), StoreError> {
        let scenario_path = self.scenario_path(name)?;
        let record = Self::convert_scenario_to_record(scenario);

        let contents =
            serde_json::to_string_pretty(&record).map_err(|source| StoreError::Json {
                path: scenario_path.clone(),
                source,
            })?;
        std::fs::write(&scenario_path, contents).map_err(|source| StoreError::Io {
            path: scenario_path.clone(),
            source,
        })?;

        log::info!(
            "{} saved scenario '{}' ({} trigger(s)) to {:?}",
            LOG_TAG_STORE,
            name,
            record.triggers.len(),
            scenario_path
        );
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Scenario, StoreError> {
        let scenario_path = self.scenario_path(name)?;
        if !scenario_path.is_file() {
            return Err(StoreError::NotFound(name.to_string()));
        }

        let contents =
            std::fs::read_to_string(&scenario_path).map_err(|source| StoreError::Io {
                path: scenario_path.clone(),
                source,
            })?;
        let record: ScenarioRecord =
            serde_json::from_str(&contents).map_err(|source| StoreError::Json {
                path: scenario_path.clone(),
                source,
            })?;

        log::debug!(
            "{} loaded scenario '{}' with {} trigger(s)",
            LOG_TAG_STORE,
            name,
            record.triggers.len()
        );
        Ok(self.convert_record_to_scenario(name, record))
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        let entries =
            std::fs::read_dir(&self.scenario_folder).map_err(|source| StoreError::Io {
                path: self.scenario_folder.clone(),
                source,
            })?;

        let mut names: Vec<String> = entries
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry.path()),
                Err(error) => {
                    log::warn!("{} unreadable folder entry: {}", LOG_TAG_STORE, error);
                    None
                }
            })
            .filter(|path| {
                path.is_file()
                    && path.extension().and_then(|extension| extension.to_str())
                        == Some(SCENARIO_FILE_EXTENSION)
            })
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(str::to_string)
            })
            .collect();

        names.sort();
        Ok(names)
    }

    fn store_reference_image(&self, raster: &Raster) -> Result<ReferenceImage, StoreError> {
        let file_name = format!(
            "{}{}.{}",
            TRIGGER_IMAGE_PREFIX,
            Uuid::new_v4().simple(),
            TRIGGER_IMAGE_EXTENSION
        );
        let location = self.scenario_folder.join(&file_name);

        raster
            .save_to_file(&location)
            .map_err(|source| StoreError::Image {
                path: location.clone(),
                source,
            })?;

        log::info!(
            "{} stored {}x{} reference image {}",
            LOG_TAG_STORE,
            raster.width(),
            raster.height(),
            file_name
        );
        Ok(ReferenceImage::new(file_name, location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn create_store() -> (tempfile::TempDir, JsonScenarioStore) {
        let directory = tempfile::tempdir().unwrap();
        let store = JsonScenarioStore::open(directory.path().join("scenarios")).unwrap();
        (directory, store)
    }

    fn create_scenario(store: &JsonScenarioStore, name: &str) -> Scenario {
        Scenario::new(
            name,
            vec![
                TriggerDefinition::new(
                    ReferenceImage::new("trigger_a.png", store.folder().join("trigger_a.png")),
                    vec![Point::at_coordinates(10, 20), Point::at_coordinates(-5, 7)],
                ),
                TriggerDefinition::new(
                    ReferenceImage::new("trigger_b.png", store.folder().join("trigger_b.png")),
                    Vec::new(),
                ),
            ],
        )
    }

    #[test]
    fn test_open_creates_missing_folder() {
        let directory = tempfile::tempdir().unwrap();
        let folder = directory.path().join("fresh").join("scenarios");

        let store = JsonScenarioStore::open(&folder).unwrap();

        assert!(store.folder().is_dir());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let (_directory, store) = create_store();
        let scenario = create_scenario(&store, "morning");

        store.save("morning", &scenario).unwrap();
        let loaded = store.load("morning").unwrap();

        assert_eq!(loaded, scenario);
    }

    #[test]
    fn test_saved_file_uses_image_and_click_pairs() {
        let (_directory, store) = create_store();
        let scenario = create_scenario(&store, "shape");

        store.save("shape", &scenario).unwrap();
        let contents = std::fs::read_to_string(store.folder().join("shape.json")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&contents).unwrap();

        assert_eq!(json["triggers"][0]["image"], "trigger_a.png");
        assert_eq!(json["triggers"][0]["clicks"][1], serde_json::json!([-5, 7]));
        assert_eq!(json["triggers"][1]["clicks"], serde_json::json!([]));
    }

    #[test]
    fn test_load_accepts_hand_written_file() {
        let (_directory, store) = create_store();
        let json = r#"{
  "triggers": [
    { "image": "trigger_20240101_120000.png", "clicks": [[100, 200], [300, 400]] }
  ]
}"#;
        std::fs::write(store.folder().join("legacy.json"), json).unwrap();

        let scenario = store.load("legacy").unwrap();

        assert_eq!(scenario.name, "legacy");
        assert_eq!(scenario.triggers.len(), 1);
        assert_eq!(
            scenario.triggers[0].click_sequence,
            vec![Point::at_coordinates(100, 200), Point::at_coordinates(300, 400)]
        );
        assert_eq!(
            scenario.triggers[0].reference_image.location(),
            store.folder().join("trigger_20240101_120000.png")
        );
    }

    #[test]
    fn test_load_missing_scenario_is_not_found() {
        let (_directory, store) = create_store();

        let result = store.load("nothing");

        assert!(matches!(result, Err(StoreError::NotFound(name)) if name == "nothing"));
    }

    #[test]
    fn test_invalid_names_are_rejected() {
        let (_directory, store) = create_store();
        let scenario = create_scenario(&store, "ignored");

        for name in ["", "   ", "../escape", "a/b", "a\\b", ".."] {
            let result = store.save(name, &scenario);
            assert!(
                matches!(result, Err(StoreError::InvalidName(_))),
                "name {:?} should be rejected",
                name
            );
        }
    }

    #[test]
    fn test_list_returns_sorted_scenario_names_only() {
        let (_directory, store) = create_store();
        store.save("zeta", &create_scenario(&store, "zeta")).unwrap();
        store.save("alpha", &create_scenario(&store, "alpha")).unwrap();
        std::fs::write(store.folder().join("notes.txt"), "not a scenario").unwrap();
        std::fs::write(store.folder().join("trigger_x.png"), [0u8; 4]).unwrap();

        let names = store.list().unwrap();

        assert_eq!(names, vec!["alpha".to_string(), "zeta".to_string()]);
    }

    #[test]
    fn test_load_all_skips_malformed_files() {
        let (_directory, store) = create_store();
        store.save("good", &create_scenario(&store, "good")).unwrap();
        std::fs::write(store.folder().join("bad.json"), "{ \"triggers\": 42 }").unwrap();

        let scenarios = store.load_all().unwrap();

        assert_eq!(scenarios.len(), 1);
        assert!(scenarios.contains_key("good"));
    }

    #[test]
    fn test_store_reference_image_writes_decodable_png() {
        let (_directory, store) = create_store();
        let raster = Raster::from_rgba_image(RgbaImage::from_pixel(6, 4, Rgba([1, 2, 3, 255])));

        let reference_image = store.store_reference_image(&raster).unwrap();

        assert!(reference_image.identifier().starts_with("trigger_"));
        assert!(reference_image.identifier().ends_with(".png"));
        assert_eq!(reference_image.decode().unwrap(), raster);
    }

    #[test]
    fn test_store_reference_image_uses_unique_names() {
        let (_directory, store) = create_store();
        let raster = Raster::from_rgba_image(RgbaImage::from_pixel(2, 2, Rgba([9, 9, 9, 255])));

        let first = store.store_reference_image(&raster).unwrap();
        let second = store.store_reference_image(&raster).unwrap();

        assert_ne!(first.identifier(), second.identifier());
    }
}
