use std::time::Duration;

use rdev::{simulate, Button, EventType};

use crate::core::interfaces::ports::InputInjector;
use crate::core::models::Point;
use crate::global_constants::{CLICK_PRESS_HOLD_MS, LOG_TAG_INPUT};

/// Left clicks through rdev's event simulation.
pub struct RdevInputInjector;

impl RdevInputInjector {
    pub fn initialize() -> Self {
        log::debug!("{} initializing rdev input injector", LOG_TAG_INPUT);
        Self
    }

    fn build_click_events(point: Point) -> [EventType; 3] {
        [
            EventType::MouseMove {
                x: f64::from(point.x),
                y: f64::from(point.y),
            },
            EventType::ButtonPress(Button::Left),
            EventType::ButtonRelease(Button::Left),
        ]
    }

    fn send_event(&self, event_type: &EventType) -> Result<(), rdev::SimulateError> {
        simulate(event_type)?;
        // Some platforms drop events that arrive back to back.
        std::thread::sleep(Duration::from_millis(CLICK_PRESS_HOLD_MS));
        Ok(())
    }
}

impl InputInjector for RdevInputInjector {
    fn click(&self, point: Point) {
        log::debug!("{} clicking at {}", LOG_TAG_INPUT, point);

        for event_type in Self::build_click_events(point) {
            if let Err(error) = self.send_event(&event_type) {
                log::warn!(
                    "{} failed to simulate {:?} at {}: {:?}",
                    LOG_TAG_INPUT,
                    event_type,
                    point,
                    error
                );
                return;
            }
        }
    }
}
