//! Compressed payload → pixel frame decoding.
//!
//! JPEG payloads go through TurboJPEG, which decompresses straight into BGR
//! byte order; everything else (PNG, WebP, ...) goes through the `image`
//! crate and is reordered to match. Downstream transforms operate on
//! [`BgrFrame`]s and keep BGR order until [`BgrToRgbChw`] reorders the data
//! during tensor conversion.
//!
//! [`BgrToRgbChw`]: crate::transforms::BgrToRgbChw

use image::{ImageBuffer, RgbImage};
use tracing::warn;
use turbojpeg::{Decompressor, Image, PixelFormat};

/// A decoded frame in interleaved (HWC) layout with **BGR** byte order.
///
/// The `RgbImage` container is reused purely for its geometry operations
/// (crop, resize, flip, rotate are channel-agnostic); its channel names do
/// not apply to the stored bytes.
pub type BgrFrame = RgbImage;

/// Decode failures for a single image payload.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("empty image payload")]
    EmptyPayload,

    #[error("jpeg decode failed")]
    Jpeg(#[source] turbojpeg::Error),

    #[error("image decode failed")]
    Image(#[from] image::ImageError),

    #[error("decoded buffer has unexpected size for {width}x{height}")]
    BufferSize { width: u32, height: u32 },
}

/// Decodes a compressed image payload into a [`BgrFrame`].
///
/// JPEG payloads (sniffed by magic bytes) take the TurboJPEG fast path; on
/// failure they fall back to the generic decoder.
pub fn decode_bgr(payload: &[u8]) -> Result<BgrFrame, DecodeError> {
    if payload.is_empty() {
        return Err(DecodeError::EmptyPayload);
    }

    if is_jpeg(payload) {
        match decode_jpeg_bgr(payload) {
            Ok(frame) => return Ok(frame),
            Err(err) => {
                warn!("turbojpeg failed, falling back to generic decoder: {err}");
            }
        }
    }

    decode_generic_bgr(payload)
}

fn is_jpeg(payload: &[u8]) -> bool {
    payload.len() >= 2 && payload[0] == 0xFF && payload[1] == 0xD8
}

/// Decompresses a JPEG payload directly into BGR bytes.
fn decode_jpeg_bgr(payload: &[u8]) -> Result<BgrFrame, DecodeError> {
    let mut decompressor = Decompressor::new().map_err(DecodeError::Jpeg)?;
    let header = decompressor.read_header(payload).map_err(DecodeError::Jpeg)?;

    let width = header.width;
    let height = header.height;

    // 3 bytes per pixel, tightly packed rows
    let mut pixels = vec![0u8; (width * height * 3) as usize];
    let output = Image {
        pixels: pixels.as_mut_slice(),
        width: width as usize,
        height: height as usize,
        format: PixelFormat::BGR,
        pitch: (width * 3) as usize,
    };

    decompressor
        .decompress(payload, output)
        .map_err(DecodeError::Jpeg)?;

    ImageBuffer::from_raw(width as u32, height as u32, pixels).ok_or(DecodeError::BufferSize {
        width: width as u32,
        height: height as u32,
    })
}

/// Decodes any format the `image` crate understands, then reorders the bytes
/// to BGR so both paths hand identical data to the transforms.
fn decode_generic_bgr(payload: &[u8]) -> Result<BgrFrame, DecodeError> {
    let rgb = image::load_from_memory(payload)?.to_rgb8();
    let (width, height) = rgb.dimensions();

    let mut raw = rgb.into_raw();
    for px in raw.chunks_exact_mut(3) {
        px.swap(0, 2);
    }

    ImageBuffer::from_raw(width, height, raw).ok_or(DecodeError::BufferSize { width, height })
}
