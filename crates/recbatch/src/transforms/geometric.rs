//! Spatial transforms: center square-crop, exact resize, jittered crop.

use image::imageops::{self, FilterType};

use super::Transform;
use crate::decode::BgrFrame;
use crate::error::{Error, Result};
use crate::rng::iter_gen_range;

/// Margin the train path adds around the target shape before the random
/// crop; crop origins are sampled per-axis from `[0, CROP_JITTER)`.
pub const CROP_JITTER: u32 = 32;

// ============================================================================
// CenterSquareCrop
// ============================================================================

/// Center-crops a non-square frame along its longer axis to the shorter
/// side's length (integer midpoint truncation). Square frames pass through
/// untouched.
#[derive(Debug, Clone)]
pub struct CenterSquareCrop;

impl Transform<BgrFrame, BgrFrame> for CenterSquareCrop {
    fn apply(&self, frame: BgrFrame) -> Result<BgrFrame> {
        let (width, height) = frame.dimensions();
        let side = width.min(height);
        if side == 0 {
            return Err(Error::DegenerateImage {
                width,
                height,
                reason: "shorter side is zero".to_string(),
            });
        }
        if width == height {
            return Ok(frame);
        }

        let (x, y) = if height > width {
            (0, (height - width) / 2)
        } else {
            ((width - height) / 2, 0)
        };
        Ok(imageops::crop_imm(&frame, x, y, side, side).to_image())
    }
}

// ============================================================================
// ResizeExact
// ============================================================================

/// Resizes to exactly `width x height` with bilinear filtering, ignoring the
/// aspect ratio (the pipeline squares frames up first).
#[derive(Debug)]
pub struct ResizeExact {
    width: u32,
    height: u32,
}

impl ResizeExact {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::Config(format!(
                "resize target must be positive (got {width}x{height})"
            )));
        }
        Ok(Self { width, height })
    }
}

impl Transform<BgrFrame, BgrFrame> for ResizeExact {
    fn apply(&self, frame: BgrFrame) -> Result<BgrFrame> {
        let (width, height) = frame.dimensions();
        if width == 0 || height == 0 {
            return Err(Error::DegenerateImage {
                width,
                height,
                reason: "cannot resize an empty frame".to_string(),
            });
        }
        if (width, height) == (self.width, self.height) {
            return Ok(frame);
        }
        Ok(imageops::resize(
            &frame,
            self.width,
            self.height,
            FilterType::Triangle,
        ))
    }
}

// ============================================================================
// RandomCrop
// ============================================================================

/// Takes a `width x height` crop whose origin is sampled uniformly and
/// independently per axis from `[0, CROP_JITTER)`.
///
/// The input frame must be at least `target + CROP_JITTER` on both axes; the
/// train pipeline guarantees this by resizing to exactly that size first.
#[derive(Debug)]
pub struct RandomCrop {
    width: u32,
    height: u32,
}

impl RandomCrop {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::Config(format!(
                "crop target must be positive (got {width}x{height})"
            )));
        }
        Ok(Self { width, height })
    }
}

impl Transform<BgrFrame, BgrFrame> for RandomCrop {
    fn apply(&self, frame: BgrFrame) -> Result<BgrFrame> {
        let (width, height) = frame.dimensions();
        if width < self.width + CROP_JITTER || height < self.height + CROP_JITTER {
            return Err(Error::DegenerateImage {
                width,
                height,
                reason: format!(
                    "frame too small for a {}x{} crop with {} jitter",
                    self.width, self.height, CROP_JITTER
                ),
            });
        }

        let x = iter_gen_range(0..CROP_JITTER);
        let y = iter_gen_range(0..CROP_JITTER);
        Ok(imageops::crop_imm(&frame, x, y, self.width, self.height).to_image())
    }
}
