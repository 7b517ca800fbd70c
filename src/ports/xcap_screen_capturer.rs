use crate::core::errors::CaptureError;
use crate::core::interfaces::ports::ScreenCapturer;
use crate::core::models::Raster;
use crate::global_constants::{
    ERROR_CONTEXT_CAPTURE_MONITOR, ERROR_CONTEXT_LIST_MONITORS, LOG_TAG_CAPTURE,
};

/// Captures the primary monitor through xcap. Region captures are cut out of a full
/// capture so both operations share one coordinate space.
pub struct XcapScreenCapturer;

impl XcapScreenCapturer {
    pub fn initialize() -> Self {
        log::debug!("{} initializing xcap screen capturer", LOG_TAG_CAPTURE);
        Self
    }

    fn get_primary_monitor(&self) -> Result<xcap::Monitor, CaptureError> {
        let monitors = xcap::Monitor::all().map_err(|error| {
            CaptureError::Backend(format!("{}: {}", ERROR_CONTEXT_LIST_MONITORS, error))
        })?;

        let mut fallback = None;
        for monitor in monitors {
            if monitor.is_primary().unwrap_or(false) {
                return Ok(monitor);
            }
            if fallback.is_none() {
                fallback = Some(monitor);
            }
        }

        fallback.ok_or(CaptureError::NoMonitor)
    }

    fn get_monitor_origin(&self, monitor: &xcap::Monitor) -> (i32, i32) {
        (monitor.x().unwrap_or(0), monitor.y().unwrap_or(0))
    }

    fn capture_monitor_image(
        &self,
        monitor: &xcap::Monitor,
    ) -> Result<xcap::image::RgbaImage, CaptureError> {
        monitor.capture_image().map_err(|error| {
            CaptureError::Backend(format!("{}: {}", ERROR_CONTEXT_CAPTURE_MONITOR, error))
        })
    }

    fn convert_image_to_raster(
        &self,
        image: xcap::image::RgbaImage,
    ) -> Result<Raster, CaptureError> {
        let width_pixels = image.width();
        let height_pixels = image.height();

        log::trace!(
            "{} captured {}x{} screenshot",
            LOG_TAG_CAPTURE,
            width_pixels,
            height_pixels
        );

        Raster::build_from_raw_data(width_pixels, height_pixels, image.into_raw())
    }

    fn capture_primary_screen(&self) -> Result<(Raster, (i32, i32)), CaptureError> {
        let monitor = self.get_primary_monitor()?;
        let origin = self.get_monitor_origin(&monitor);
        let captured_image = self.capture_monitor_image(&monitor)?;
        let raster = self.convert_image_to_raster(captured_image)?;

        Ok((raster, origin))
    }
}

/// Maps an absolute screen rectangle onto raster coordinates of a monitor at `origin`.
fn translate_region_to_raster(
    origin: (i32, i32),
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    raster: &Raster,
) -> Result<(u32, u32), CaptureError> {
    let relative_x = i64::from(x) - i64::from(origin.0);
    let relative_y = i64::from(y) - i64::from(origin.1);

    match (u32::try_from(relative_x), u32::try_from(relative_y)) {
        (Ok(raster_x), Ok(raster_y)) => Ok((raster_x, raster_y)),
        _ => Err(CaptureError::RegionOutOfBounds {
            x: relative_x,
            y: relative_y,
            width,
            height,
            screen_width: raster.width(),
            screen_height: raster.height(),
        }),
    }
}

impl ScreenCapturer for XcapScreenCapturer {
    fn capture_full(&self) -> Result<Raster, CaptureError> {
        let (raster, _origin) = self.capture_primary_screen()?;
        Ok(raster)
    }

    fn capture_region(
        &self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    ) -> Result<Raster, CaptureError> {
        log::debug!(
            "{} capturing {}x{} region at ({}, {})",
            LOG_TAG_CAPTURE,
            width,
            height,
            x,
            y
        );

        let (raster, origin) = self.capture_primary_screen()?;
        let (raster_x, raster_y) = translate_region_to_raster(origin, x, y, width, height, &raster)?;

        raster.crop_region(raster_x, raster_y, width, height)
    }
}
