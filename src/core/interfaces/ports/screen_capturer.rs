use crate::core::errors::CaptureError;
use crate::core::models::Raster;

/// Source of screen snapshots. Each call returns an independent copy, so concurrent
/// callers never observe each other's pixels.
pub trait ScreenCapturer: Send + Sync {
    fn capture_full(&self) -> Result<Raster, CaptureError>;

    fn capture_region(&self, x: i32, y: i32, width: u32, height: u32)
        -> Result<Raster, CaptureError>;
}
