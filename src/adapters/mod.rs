mod json_scenario_store;

pub use json_scenario_store::JsonScenarioStore;
