mod console_menu;
mod prompt;
mod scenario_author;

pub use console_menu::ConsoleMenu;
pub use scenario_author::ScenarioAuthor;
