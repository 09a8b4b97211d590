//! Mode-dependent assembly of the full augmentation pipeline.

use std::fmt;

use tch::Tensor;

use super::{
    BgrToRgbChw, CenterSquareCrop, RandomCrop, RandomHorizontalFlip, RandomRotation,
    RandomVerticalFlip, ResizeExact, Transform, CROP_JITTER,
};
use crate::decode::BgrFrame;
use crate::error::Result;
use crate::iter::Mode;

/// The decoded-frame → tensor pipeline for one iterator mode.
///
/// Every mode starts with a center square-crop to the shorter side, then:
///
/// - **Train**: exact resize to `(H+32, W+32)`, random `(H, W)` crop with
///   per-axis origins in `[0, 32)`, independent 50% vertical and horizontal
///   flips, and a rotation by a uniform integer angle in `[0, 360)` degrees.
/// - **Validation / Test**: exact resize to `(H, W)`, no randomness.
///
/// Both end in [`BgrToRgbChw`], producing `[3, H, W]` f32 RGB tensors.
pub struct AugmentPipeline {
    mode: Mode,
    height: u32,
    width: u32,
    pipeline: Box<dyn Transform<BgrFrame, Tensor>>,
}

impl AugmentPipeline {
    pub fn new(mode: Mode, height: u32, width: u32) -> Result<Self> {
        let pipeline: Box<dyn Transform<BgrFrame, Tensor>> = if mode.is_train() {
            Box::new(
                CenterSquareCrop
                    .then(ResizeExact::new(width + CROP_JITTER, height + CROP_JITTER)?)
                    .then(RandomCrop::new(width, height)?)
                    .then(RandomVerticalFlip::new(0.5)?)
                    .then(RandomHorizontalFlip::new(0.5)?)
                    .then(RandomRotation)
                    .then(BgrToRgbChw),
            )
        } else {
            Box::new(
                CenterSquareCrop
                    .then(ResizeExact::new(width, height)?)
                    .then(BgrToRgbChw),
            )
        };

        Ok(Self {
            mode,
            height,
            width,
            pipeline,
        })
    }

    /// Runs one decoded frame through the pipeline.
    pub fn apply(&self, frame: BgrFrame) -> Result<Tensor> {
        self.pipeline.apply(frame)
    }
}

impl fmt::Debug for AugmentPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AugmentPipeline")
            .field("mode", &self.mode)
            .field("height", &self.height)
            .field("width", &self.width)
            .finish()
    }
}
