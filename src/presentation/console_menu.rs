use std::io::{BufRead, Write};
use std::sync::Arc;

use crate::core::interfaces::adapters::ScenarioStore;
use crate::core::models::Scenario;
use crate::core::orchestrators::{MonitorReport, ScenarioRunner};
use crate::global_constants::LOG_TAG_MENU;
use crate::ports::GlobalInputListener;
use crate::presentation::prompt::ask;
use crate::presentation::ScenarioAuthor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    CreateScenario,
    RunScenario,
    Exit,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("{selected} is not in the list, choose between 1 and {count}")]
    OutOfRange { selected: usize, count: usize },
}

pub fn parse_menu_choice(input: &str) -> Option<MenuChoice> {
    match input {
        "1" => Some(MenuChoice::CreateScenario),
        "2" => Some(MenuChoice::RunScenario),
        "3" => Some(MenuChoice::Exit),
        _ => None,
    }
}

/// Maps a 1-based answer onto a 0-based index. Blank input means "go back".
pub fn parse_scenario_selection(
    input: &str,
    count: usize,
) -> Result<Option<usize>, SelectionError> {
    if input.is_empty() {
        return Ok(None);
    }

    let selected: usize = input
        .parse()
        .map_err(|_| SelectionError::NotANumber(input.to_string()))?;

    if selected == 0 || selected > count {
        return Err(SelectionError::OutOfRange { selected, count });
    }

    Ok(Some(selected - 1))
}

pub struct ConsoleMenu {
    scenario_store: Arc<dyn ScenarioStore>,
    scenario_runner: ScenarioRunner,
    scenario_author: ScenarioAuthor,
    input_listener: Arc<GlobalInputListener>,
}

impl ConsoleMenu {
    pub fn build(
        scenario_store: Arc<dyn ScenarioStore>,
        scenario_runner: ScenarioRunner,
        scenario_author: ScenarioAuthor,
        input_listener: Arc<GlobalInputListener>,
    ) -> Self {
        Self {
            scenario_store,
            scenario_runner,
            scenario_author,
            input_listener,
        }
    }

    /// Runs until the user exits or standard input closes.
    pub fn run_main_loop(
        &self,
        input: &mut impl BufRead,
        output: &mut impl Write,
    ) -> anyhow::Result<()> {
        loop {
            writeln!(output, "\n1. Create scenario\n2. Run scenario\n3. Exit")?;
            let Some(answer) = ask(input, output, "Choice: ")? else {
                log::info!("{} input closed, leaving menu", LOG_TAG_MENU);
                return Ok(());
            };

            match parse_menu_choice(&answer) {
                Some(MenuChoice::CreateScenario) => {
                    if let Err(error) = self.scenario_author.create_scenario(input, output) {
                        log::error!("{} scenario creation failed: {:#}", LOG_TAG_MENU, error);
                        writeln!(output, "Scenario creation failed: {:#}", error)?;
                    }
                }
                Some(MenuChoice::RunScenario) => self.run_scenario_flow(input, output)?,
                Some(MenuChoice::Exit) => return Ok(()),
                None => writeln!(output, "Please enter 1, 2 or 3.")?,
            }
        }
    }

    fn run_scenario_flow(
        &self,
        input: &mut impl BufRead,
        output: &mut impl Write,
    ) -> anyhow::Result<()> {
        let scenarios = match self.scenario_store.load_all() {
            Ok(scenarios) => scenarios,
            Err(error) => {
                log::error!("{} could not load scenarios: {}", LOG_TAG_MENU, error);
                writeln!(output, "Could not load scenarios: {}", error)?;
                return Ok(());
            }
        };

        if scenarios.is_empty() {
            writeln!(output, "No scenarios saved yet.")?;
            return Ok(());
        }

        let scenario_list: Vec<&Scenario> = scenarios.values().collect();
        writeln!(output, "\nSaved scenarios:")?;
        for (position, scenario) in scenario_list.iter().enumerate() {
            writeln!(
                output,
                "{}. {} ({} trigger(s))",
                position + 1,
                scenario.name,
                scenario.triggers.len()
            )?;
        }

        loop {
            let Some(answer) = ask(input, output, "Scenario number (blank to go back): ")? else {
                return Ok(());
            };

            match parse_scenario_selection(&answer, scenario_list.len()) {
                Ok(Some(index)) => return self.run_until_stopped(scenario_list[index], output),
                Ok(None) => return Ok(()),
                Err(error) => writeln!(output, "{}", error)?,
            }
        }
    }

    fn run_until_stopped(&self, scenario: &Scenario, output: &mut impl Write) -> anyhow::Result<()> {
        self.input_listener.set_run_active(true);

        let mut run_handle = match self.scenario_runner.start(scenario) {
            Ok(run_handle) => run_handle,
            Err(error) => {
                self.input_listener.set_run_active(false);
                log::error!("{} {:#}", LOG_TAG_MENU, anyhow::Error::from(error));
                writeln!(output, "Could not start '{}'. See the log for details.", scenario.name)?;
                return Ok(());
            }
        };

        writeln!(
            output,
            "Running '{}' with {} monitor(s). Press Ctrl+C or Escape to stop.",
            run_handle.scenario_name(),
            run_handle.worker_count()
        )?;
        output.flush()?;

        self.input_listener.drain_pending();
        self.input_listener.wait_for_stop_request();

        let reports = self.scenario_runner.stop(&mut run_handle);
        self.input_listener.set_run_active(false);
        log::debug!(
            "{} run of '{}' ended in state {:?}",
            LOG_TAG_MENU,
            run_handle.scenario_name(),
            run_handle.run_state()
        );

        writeln!(output, "{}", format_run_summary(&scenario.name, &reports))?;
        Ok(())
    }
}

fn format_run_summary(scenario_name: &str, reports: &[MonitorReport]) -> String {
    let mut summary = format!("Stopped '{}'.", scenario_name);
    for report in reports {
        summary.push_str(&format!(
            "\n  trigger #{}: {} pass(es), {} click(s)",
            report.trigger_index + 1,
            report.action_passes,
            report.clicks_issued
        ));
    }
    summary
}
