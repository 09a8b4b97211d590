//! Random train-time augmentations: flips and rotation.

use image::imageops;
use image::Rgb;
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};

use super::Transform;
use crate::decode::BgrFrame;
use crate::error::{Error, Result};
use crate::rng::{iter_gen_bool, iter_gen_range};

// ============================================================================
// RandomVerticalFlip
// ============================================================================

/// Flips the frame top-to-bottom with probability `p`.
#[derive(Debug)]
pub struct RandomVerticalFlip {
    p: f64,
}

impl RandomVerticalFlip {
    pub fn new(p: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&p) {
            return Err(Error::Config(format!(
                "flip probability must be in [0.0, 1.0] (got {p})"
            )));
        }
        Ok(Self { p })
    }
}

impl Transform<BgrFrame, BgrFrame> for RandomVerticalFlip {
    fn apply(&self, frame: BgrFrame) -> Result<BgrFrame> {
        Ok(if iter_gen_bool(self.p) {
            imageops::flip_vertical(&frame)
        } else {
            frame
        })
    }
}

// ============================================================================
// RandomHorizontalFlip
// ============================================================================

/// Flips the frame left-to-right with probability `p`.
#[derive(Debug)]
pub struct RandomHorizontalFlip {
    p: f64,
}

impl RandomHorizontalFlip {
    pub fn new(p: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&p) {
            return Err(Error::Config(format!(
                "flip probability must be in [0.0, 1.0] (got {p})"
            )));
        }
        Ok(Self { p })
    }
}

impl Transform<BgrFrame, BgrFrame> for RandomHorizontalFlip {
    fn apply(&self, frame: BgrFrame) -> Result<BgrFrame> {
        Ok(if iter_gen_bool(self.p) {
            imageops::flip_horizontal(&frame)
        } else {
            frame
        })
    }
}

// ============================================================================
// RandomRotation
// ============================================================================

/// Rotates the frame about its center by an integer angle drawn uniformly
/// from `[0, 360)` degrees.
///
/// Bilinear interpolation, same output size; corners that rotate out of the
/// frame are filled with black. The frame is neither cropped nor padded to
/// hide the resulting border artifacts.
#[derive(Debug)]
pub struct RandomRotation;

impl Transform<BgrFrame, BgrFrame> for RandomRotation {
    fn apply(&self, frame: BgrFrame) -> Result<BgrFrame> {
        let (width, height) = frame.dimensions();
        if width == 0 || height == 0 {
            return Err(Error::DegenerateImage {
                width,
                height,
                reason: "cannot rotate an empty frame".to_string(),
            });
        }

        let degrees = iter_gen_range(0..360u32);
        let theta = (degrees as f32).to_radians();
        Ok(rotate_about_center(
            &frame,
            theta,
            Interpolation::Bilinear,
            Rgb([0u8, 0, 0]),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::init_iter_rng;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_vertical_flip_always() -> Result<()> {
        // 1x2 frame: top bright, bottom dark
        let mut img = RgbImage::new(1, 2);
        img.put_pixel(0, 0, Rgb([200, 0, 0]));
        img.put_pixel(0, 1, Rgb([10, 0, 0]));

        let flipped = RandomVerticalFlip::new(1.0)?.apply(img)?;
        assert_eq!(flipped.get_pixel(0, 0)[0], 10);
        assert_eq!(flipped.get_pixel(0, 1)[0], 200);
        Ok(())
    }

    #[test]
    fn test_horizontal_flip_always() -> Result<()> {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([200, 0, 0]));
        img.put_pixel(1, 0, Rgb([10, 0, 0]));

        let flipped = RandomHorizontalFlip::new(1.0)?.apply(img)?;
        assert_eq!(flipped.get_pixel(0, 0)[0], 10);
        assert_eq!(flipped.get_pixel(1, 0)[0], 200);
        Ok(())
    }

    #[test]
    fn test_flip_never() -> Result<()> {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([200, 0, 0]));
        img.put_pixel(1, 0, Rgb([10, 0, 0]));

        let out = RandomHorizontalFlip::new(0.0)?.apply(img.clone())?;
        assert_eq!(out.as_raw(), img.as_raw());
        Ok(())
    }

    #[test]
    fn test_flip_probability_out_of_range() {
        assert!(RandomVerticalFlip::new(1.5).is_err());
        assert!(RandomHorizontalFlip::new(-0.1).is_err());
    }

    #[test]
    fn test_rotation_preserves_dimensions() -> Result<()> {
        init_iter_rng(0, 7);
        let frame = RgbImage::from_pixel(48, 48, Rgb([128, 64, 32]));
        for _ in 0..16 {
            let rotated = RandomRotation.apply(frame.clone())?;
            assert_eq!(rotated.dimensions(), (48, 48));
        }
        Ok(())
    }

    #[test]
    fn test_rotation_rejects_empty_frame() {
        let err = RandomRotation.apply(RgbImage::new(0, 0)).unwrap_err();
        assert!(matches!(err, Error::DegenerateImage { .. }));
    }
}
