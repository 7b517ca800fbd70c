use std::path::{Path, PathBuf};

use crate::core::errors::ResourceError;
use crate::core::models::{Point, Raster};

/// Stored reference image of a trigger: the identifier persisted with the scenario
/// and the file it resolves to. Decoding is deferred until a monitor is prepared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceImage {
    identifier: String,
    location: PathBuf,
}

impl ReferenceImage {
    pub fn new(identifier: impl Into<String>, location: impl Into<PathBuf>) -> Self {
        Self {
            identifier: identifier.into(),
            location: location.into(),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn decode(&self) -> Result<Raster, ResourceError> {
        Raster::load_from_file(&self.location)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerDefinition {
    pub reference_image: ReferenceImage,
    pub click_sequence: Vec<Point>,
}

impl TriggerDefinition {
    pub fn new(reference_image: ReferenceImage, click_sequence: Vec<Point>) -> Self {
        Self {
            reference_image,
            click_sequence,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub name: String,
    pub triggers: Vec<TriggerDefinition>,
}

impl Scenario {
    pub fn new(name: impl Into<String>, triggers: Vec<TriggerDefinition>) -> Self {
        Self {
            name: name.into(),
            triggers,
        }
    }

    pub fn total_click_count(&self) -> usize {
        self.triggers
            .iter()
            .map(|trigger| trigger.click_sequence.len())
            .sum()
    }
}
