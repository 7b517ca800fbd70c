use std::collections::BTreeMap;

use crate::core::errors::StoreError;
use crate::core::models::{Raster, ReferenceImage, Scenario};
use crate::global_constants::LOG_TAG_STORE;

/// Persistence of scenario definitions. The core only relies on `save`, `load`
/// and `list`; the encoding is owned by the implementation.
pub trait ScenarioStore: Send + Sync {
    fn save(&self, name: &str, scenario: &Scenario) -> Result<(), StoreError>;

    fn load(&self, name: &str) -> Result<Scenario, StoreError>;

    /// Names of stored scenarios, in the order they should be presented.
    fn list(&self) -> Result<Vec<String>, StoreError>;

    /// Persists a freshly captured template and returns the reference to embed in a trigger.
    fn store_reference_image(&self, raster: &Raster) -> Result<ReferenceImage, StoreError>;

    /// Loads every listed scenario. Entries that fail to load are logged and skipped.
    fn load_all(&self) -> Result<BTreeMap<String, Scenario>, StoreError> {
        let mut scenarios = BTreeMap::new();

        for name in self.list()? {
            match self.load(&name) {
                Ok(scenario) => {
                    scenarios.insert(name, scenario);
                }
                Err(error) => {
                    log::warn!("{} skipping scenario '{}': {}", LOG_TAG_STORE, name, error);
                }
            }
        }

        Ok(scenarios)
    }
}
