use std::sync::Arc;

use mouse_position::mouse_position::Mouse;

use crate::core::interfaces::ports::CoordinatePicker;
use crate::core::models::Point;
use crate::global_constants::{LOG_TAG_INPUT, MESSAGE_MOUSE_POSITION_FAILED};
use crate::ports::{GlobalInputEvent, GlobalInputListener};

/// Picks the pointer position at the moment of a right click.
pub struct SystemCoordinatePicker {
    input_listener: Arc<GlobalInputListener>,
}

impl SystemCoordinatePicker {
    pub fn initialize(input_listener: Arc<GlobalInputListener>) -> Self {
        log::debug!("{} initializing coordinate picker", LOG_TAG_INPUT);
        Self { input_listener }
    }

    fn query_system_mouse_position(&self) -> Mouse {
        Mouse::get_mouse_position()
    }

    fn convert_mouse_result_to_point(mouse_result: Mouse) -> Option<Point> {
        match mouse_result {
            Mouse::Position { x, y } => {
                log::debug!("{} picked position ({}, {})", LOG_TAG_INPUT, x, y);
                Some(Point::at_coordinates(x, y))
            }
            Mouse::Error => {
                log::warn!("{} {}", LOG_TAG_INPUT, MESSAGE_MOUSE_POSITION_FAILED);
                None
            }
        }
    }
}

impl CoordinatePicker for SystemCoordinatePicker {
    fn pick_point(&self) -> Option<Point> {
        self.input_listener.drain_pending();

        loop {
            match self.input_listener.wait_for_event()? {
                GlobalInputEvent::PickRequested => {
                    let mouse_position_result = self.query_system_mouse_position();
                    if let Some(point) = Self::convert_mouse_result_to_point(mouse_position_result)
                    {
                        return Some(point);
                    }
                }
                GlobalInputEvent::CancelPressed | GlobalInputEvent::StopRequested => {
                    log::debug!("{} point picking cancelled", LOG_TAG_INPUT);
                    return None;
                }
            }
        }
    }
}
