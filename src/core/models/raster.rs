use std::path::Path;

use image::RgbaImage;

use crate::core::errors::{CaptureError, ResourceError};
use crate::global_constants::LOG_TAG_RASTER;

/// Owned RGBA snapshot. Every capture and every crop yields an independent copy.
#[derive(Clone, PartialEq)]
pub struct Raster {
    pixels: RgbaImage,
}

impl std::fmt::Debug for Raster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Raster")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl Raster {
    pub fn from_rgba_image(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn build_from_raw_data(
        width_pixels: u32,
        height_pixels: u32,
        raw_rgba_data: Vec<u8>,
    ) -> Result<Self, CaptureError> {
        log::trace!(
            "{} building raster: {}x{}",
            LOG_TAG_RASTER,
            width_pixels,
            height_pixels
        );

        let data_length = raw_rgba_data.len();
        RgbaImage::from_raw(width_pixels, height_pixels, raw_rgba_data)
            .map(Self::from_rgba_image)
            .ok_or_else(|| {
                CaptureError::Backend(format!(
                    "{} bytes do not form a {}x{} RGBA image",
                    data_length, width_pixels, height_pixels
                ))
            })
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ResourceError> {
        let decoded = image::open(path).map_err(|source| ResourceError {
            path: path.to_path_buf(),
            source,
        })?;

        log::debug!(
            "{} decoded {:?}: {}x{}",
            LOG_TAG_RASTER,
            path,
            decoded.width(),
            decoded.height()
        );

        Ok(Self::from_rgba_image(decoded.to_rgba8()))
    }

    pub fn save_to_file(&self, path: &Path) -> image::ImageResult<()> {
        self.pixels.save(path)
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn as_rgba_image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn crop_region(
        &self,
        x: u32,
        y: u32,
        crop_width: u32,
        crop_height: u32,
    ) -> Result<Self, CaptureError> {
        if crop_width == 0 || crop_height == 0 {
            return Err(CaptureError::EmptyRegion {
                width: crop_width,
                height: crop_height,
            });
        }

        let fits_horizontally = x
            .checked_add(crop_width)
            .is_some_and(|right| right <= self.width());
        let fits_vertically = y
            .checked_add(crop_height)
            .is_some_and(|bottom| bottom <= self.height());

        if !fits_horizontally || !fits_vertically {
            return Err(CaptureError::RegionOutOfBounds {
                x: i64::from(x),
                y: i64::from(y),
                width: crop_width,
                height: crop_height,
                screen_width: self.width(),
                screen_height: self.height(),
            });
        }

        log::debug!(
            "{} cropping region: {}x{} at ({}, {}) from {}x{}",
            LOG_TAG_RASTER,
            crop_width,
            crop_height,
            x,
            y,
            self.width(),
            self.height()
        );

        let cropped = image::imageops::crop_imm(&self.pixels, x, y, crop_width, crop_height);
        Ok(Self::from_rgba_image(cropped.to_image()))
    }
}
