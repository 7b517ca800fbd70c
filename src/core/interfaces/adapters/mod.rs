mod scenario_store;
mod template_matcher;

pub use scenario_store::ScenarioStore;
pub use template_matcher::TemplateMatcher;
