use crate::core::models::Point;

pub trait CoordinatePicker {
    /// Blocks until the user picks a point. `None` means the pick was cancelled.
    fn pick_point(&self) -> Option<Point>;
}
