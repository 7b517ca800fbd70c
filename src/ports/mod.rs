mod global_input_listener;
mod rdev_input_injector;
mod system_coordinate_picker;
mod xcap_screen_capturer;

pub use global_input_listener::{GlobalInputEvent, GlobalInputListener};
pub use rdev_input_injector::RdevInputInjector;
pub use system_coordinate_picker::SystemCoordinatePicker;
pub use xcap_screen_capturer::XcapScreenCapturer;
