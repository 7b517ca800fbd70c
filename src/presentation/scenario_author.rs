use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::Context;

use crate::core::interfaces::adapters::ScenarioStore;
use crate::core::interfaces::ports::{CoordinatePicker, ScreenCapturer};
use crate::core::models::{Point, Scenario, TriggerDefinition};
use crate::global_constants::{LOG_TAG_AUTHOR, MESSAGE_PICK_POINT_HINT};
use crate::presentation::prompt::ask;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthoringChoice {
    AddTrigger,
    SaveAndFinish,
}

fn parse_authoring_choice(input: &str) -> Option<AuthoringChoice> {
    match input {
        "1" => Some(AuthoringChoice::AddTrigger),
        "2" => Some(AuthoringChoice::SaveAndFinish),
        _ => None,
    }
}

/// Interactive recording of a new scenario.
pub struct ScenarioAuthor {
    coordinate_picker: Arc<dyn CoordinatePicker>,
    screen_capturer: Arc<dyn ScreenCapturer>,
    scenario_store: Arc<dyn ScenarioStore>,
}

impl ScenarioAuthor {
    pub fn build(
        coordinate_picker: Arc<dyn CoordinatePicker>,
        screen_capturer: Arc<dyn ScreenCapturer>,
        scenario_store: Arc<dyn ScenarioStore>,
    ) -> Self {
        Self {
            coordinate_picker,
            screen_capturer,
            scenario_store,
        }
    }

    /// Returns the saved scenario, or `None` when the user left without saving.
    pub fn create_scenario(
        &self,
        input: &mut impl BufRead,
        output: &mut impl Write,
    ) -> anyhow::Result<Option<Scenario>> {
        let Some(name) = self.ask_scenario_name(input, output)? else {
            return Ok(None);
        };

        let mut triggers = Vec::new();

        loop {
            writeln!(output, "\n1. Add trigger\n2. Save and finish")?;
            let Some(answer) = ask(input, output, "Choice: ")? else {
                return Ok(None);
            };

            match parse_authoring_choice(&answer) {
                Some(AuthoringChoice::AddTrigger) => {
                    match self.record_trigger(output, triggers.len() + 1)? {
                        Some(trigger) => triggers.push(trigger),
                        None => writeln!(output, "Trigger discarded.")?,
                    }
                }
                Some(AuthoringChoice::SaveAndFinish) => break,
                None => writeln!(output, "Please enter 1 or 2.")?,
            }
        }

        if triggers.is_empty() {
            writeln!(output, "No triggers recorded, '{}' was not saved.", name)?;
            return Ok(None);
        }

        let scenario = Scenario::new(name.as_str(), triggers);
        self.scenario_store
            .save(&name, &scenario)
            .with_context(|| format!("Failed to save scenario '{}'", name))?;

        log::info!(
            "{} created scenario '{}' with {} trigger(s) and {} click(s)",
            LOG_TAG_AUTHOR,
            name,
            scenario.triggers.len(),
            scenario.total_click_count()
        );
        writeln!(output, "Scenario '{}' saved.", name)?;

        Ok(Some(scenario))
    }

    fn ask_scenario_name(
        &self,
        input: &mut impl BufRead,
        output: &mut impl Write,
    ) -> anyhow::Result<Option<String>> {
        let existing_names = self.scenario_store.list().unwrap_or_else(|error| {
            log::warn!("{} could not list scenarios: {}", LOG_TAG_AUTHOR, error);
            Vec::new()
        });

        loop {
            let Some(name) = ask(input, output, "Scenario name: ")? else {
                return Ok(None);
            };

            if name.is_empty() {
                writeln!(output, "The name cannot be empty.")?;
                continue;
            }
            if name.contains(['/', '\\']) || name == "." || name == ".." {
                writeln!(output, "The name cannot contain path separators.")?;
                continue;
            }
            if existing_names.contains(&name) {
                writeln!(output, "A scenario named '{}' exists and will be replaced.", name)?;
            }

            return Ok(Some(name));
        }
    }

    fn record_trigger(
        &self,
        output: &mut impl Write,
        trigger_number: usize,
    ) -> anyhow::Result<Option<TriggerDefinition>> {
        writeln!(
            output,
            "Trigger #{}: mark two opposite corners of the image to watch. {}",
            trigger_number, MESSAGE_PICK_POINT_HINT
        )?;

        let Some(first_corner) = self.pick_with_echo(output, "first corner")? else {
            return Ok(None);
        };
        let Some(second_corner) = self.pick_with_echo(output, "second corner")? else {
            return Ok(None);
        };

        let (top_left, width, height) = first_corner.span_with(&second_corner);
        let raster = match self
            .screen_capturer
            .capture_region(top_left.x, top_left.y, width, height)
        {
            Ok(raster) => raster,
            Err(error) => {
                log::warn!("{} region capture failed: {}", LOG_TAG_AUTHOR, error);
                writeln!(output, "Could not capture that region: {}", error)?;
                return Ok(None);
            }
        };

        let reference_image = self
            .scenario_store
            .store_reference_image(&raster)
            .context("Failed to store the trigger image")?;
        writeln!(
            output,
            "Captured {}x{} image as {}.",
            width,
            height,
            reference_image.identifier()
        )?;

        writeln!(
            output,
            "Right click each point to click when it appears. Escape when done."
        )?;
        let click_sequence = self.collect_click_points(output)?;

        Ok(Some(TriggerDefinition::new(reference_image, click_sequence)))
    }

    fn pick_with_echo(
        &self,
        output: &mut impl Write,
        label: &str,
    ) -> anyhow::Result<Option<Point>> {
        let picked = self.coordinate_picker.pick_point();
        match picked {
            Some(point) => writeln!(output, "  {} at {}", label, point)?,
            None => writeln!(output, "  cancelled")?,
        }
        Ok(picked)
    }

    fn collect_click_points(&self, output: &mut impl Write) -> anyhow::Result<Vec<Point>> {
        let mut click_sequence = Vec::new();

        while let Some(point) = self.coordinate_picker.pick_point() {
            click_sequence.push(point);
            writeln!(output, "  click #{} at {}", click_sequence.len(), point)?;
        }

        Ok(click_sequence)
    }
}
