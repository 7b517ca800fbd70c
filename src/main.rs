mod adapters;
mod core;
mod global_constants;
mod ports;
mod presentation;

use std::sync::Arc;

use anyhow::Context;

use crate::adapters::JsonScenarioStore;
use crate::core::interfaces::adapters::ScenarioStore;
use crate::core::interfaces::ports::ScreenCapturer;
use crate::core::matching::NormalizedCrossCorrelationMatcher;
use crate::core::models::UserSettings;
use crate::core::orchestrators::ScenarioRunner;
use crate::global_constants::{
    APPLICATION_NAME, APPLICATION_VERSION, LOG_TAG_MAIN, STARTUP_BANNER,
};
use crate::ports::{
    GlobalInputListener, RdevInputInjector, SystemCoordinatePicker, XcapScreenCapturer,
};
use crate::presentation::{ConsoleMenu, ScenarioAuthor};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    log::info!(
        "{} Starting {} {}",
        LOG_TAG_MAIN,
        APPLICATION_NAME,
        APPLICATION_VERSION
    );
    println!("{}", STARTUP_BANNER);

    let user_settings = UserSettings::load().unwrap_or_else(|error| {
        log::warn!(
            "{} Failed to load settings, using defaults: {:#}",
            LOG_TAG_MAIN,
            error
        );
        UserSettings::default()
    });

    let json_scenario_store = JsonScenarioStore::open(&user_settings.scenario_folder)
        .context("Failed to open the scenario folder")?;
    println!("Scenarios are stored in {}", json_scenario_store.folder().display());
    let scenario_store: Arc<dyn ScenarioStore> = Arc::new(json_scenario_store);
    let screen_capturer: Arc<dyn ScreenCapturer> = Arc::new(XcapScreenCapturer::initialize());
    let input_listener = Arc::new(GlobalInputListener::start());

    let scenario_runner = ScenarioRunner::build(
        Arc::clone(&screen_capturer),
        Arc::new(NormalizedCrossCorrelationMatcher::initialize()),
        Arc::new(RdevInputInjector::initialize()),
        user_settings.monitor_timings(),
    );
    let scenario_author = ScenarioAuthor::build(
        Arc::new(SystemCoordinatePicker::initialize(Arc::clone(&input_listener))),
        screen_capturer,
        Arc::clone(&scenario_store),
    );
    let console_menu = ConsoleMenu::build(
        scenario_store,
        scenario_runner,
        scenario_author,
        input_listener,
    );

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut output = std::io::stdout();
    console_menu.run_main_loop(&mut input, &mut output)?;

    log::info!("{} Exiting", LOG_TAG_MAIN);
    Ok(())
}
