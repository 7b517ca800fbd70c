mod coordinate_picker;
mod input_injector;
mod screen_capturer;

pub use coordinate_picker::CoordinatePicker;
pub use input_injector::InputInjector;
pub use screen_capturer::ScreenCapturer;
