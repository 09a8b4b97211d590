//! BGR frame → channel-first RGB f32 tensor.

use tch::Tensor;

use super::Transform;
use crate::decode::BgrFrame;
use crate::error::{Error, Result};

/// Converts an interleaved BGR frame to a `[3, H, W]` f32 tensor in RGB
/// channel order.
///
/// Pixel values stay in the raw `0.0..=255.0` range; mean subtraction and
/// scaling are left to the training harness.
#[derive(Debug, Clone)]
pub struct BgrToRgbChw;

impl Transform<BgrFrame, Tensor> for BgrToRgbChw {
    fn apply(&self, frame: BgrFrame) -> Result<Tensor> {
        let (width, height) = frame.dimensions();
        if width == 0 || height == 0 {
            return Err(Error::DegenerateImage {
                width,
                height,
                reason: "cannot convert an empty frame".to_string(),
            });
        }

        let (w, h) = (width as usize, height as usize);
        let plane = w * h;
        let raw = frame.as_raw();

        let mut chw = vec![0f32; 3 * plane];
        for y in 0..h {
            for x in 0..w {
                let src = (y * w + x) * 3;
                let dst = y * w + x;
                chw[dst] = raw[src + 2] as f32; // R
                chw[plane + dst] = raw[src + 1] as f32; // G
                chw[2 * plane + dst] = raw[src] as f32; // B
            }
        }

        Ok(Tensor::from_slice(&chw).reshape(&[3, height as i64, width as i64]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_bgr_to_rgb_chw_reorders_channels() -> Result<()> {
        // solid blue in BGR byte order: (255, 0, 0)
        let frame = RgbImage::from_pixel(10, 10, Rgb([255, 0, 0]));
        let tensor = BgrToRgbChw.apply(frame)?;

        assert_eq!(tensor.size(), vec![3, 10, 10]);
        assert_eq!(tensor.kind(), tch::Kind::Float);
        assert_eq!(tensor.double_value(&[0, 0, 0]), 0.0); // R
        assert_eq!(tensor.double_value(&[1, 0, 0]), 0.0); // G
        assert_eq!(tensor.double_value(&[2, 0, 0]), 255.0); // B
        Ok(())
    }

    #[test]
    fn test_layout_is_channel_first() -> Result<()> {
        // single pixel marked in the green byte at (1, 0)
        let mut img = RgbImage::new(2, 2);
        img.put_pixel(1, 0, Rgb([0, 77, 0]));

        let tensor = BgrToRgbChw.apply(img)?;
        assert_eq!(tensor.double_value(&[1, 0, 1]), 77.0);
        assert_eq!(tensor.double_value(&[1, 0, 0]), 0.0);
        Ok(())
    }

    #[test]
    fn test_rejects_empty_frame() {
        let err = BgrToRgbChw.apply(RgbImage::new(0, 4)).unwrap_err();
        assert!(matches!(err, Error::DegenerateImage { .. }));
    }
}
