use std::io::Cursor;

use image::{ImageOutputFormat, Rgb, RgbImage};
use recbatch::InMemoryStore;

/// PNG-encodes a solid-color image (color given in RGB order).
pub fn png_bytes(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb(rgb));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png)
        .unwrap();
    buf
}

/// Store with keys `0..n`, label = key, and a solid `width x height` image
/// per record (red channel varies with the key so images stay distinct).
pub fn solid_store(n: u64, width: u32, height: u32) -> InMemoryStore {
    InMemoryStore::new(
        (0..n)
            .map(|key| {
                let payload = png_bytes(width, height, [(key % 256) as u8, 128, 64]);
                (key, key as f32, payload)
            })
            .collect(),
    )
}
