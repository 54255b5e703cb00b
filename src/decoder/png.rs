//! `.png` → 28×28 grayscale, normalised to `[0, 1]`.
//!
//! Colour input is reduced to 8-bit luma with the ITU-R 601-2 weights
//! (299/587/114), 16-bit grayscale is clipped to 255, and the result is
//! resampled with the Catmull-Rom (bicubic) filter.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma, RgbImage};

use super::float_literals;
use crate::error::Result;
use crate::model::{DecodedArray, IMAGE_LEN, IMAGE_SIDE};

pub fn decode(path: &Path) -> Result<DecodedArray> {
    let gray = to_gray(image::open(path)?);
    let resized = imageops::resize(&gray, IMAGE_SIDE, IMAGE_SIDE, FilterType::CatmullRom);

    // ImageBuffer storage is already row-major
    let pixels: Vec<f32> = resized
        .into_raw()
        .into_iter()
        .map(|p| p as f32 / 255.0)
        .collect();
    debug_assert_eq!(pixels.len(), IMAGE_LEN);

    Ok(DecodedArray {
        count: pixels.len(),
        literals: float_literals(&pixels),
    })
}

fn to_gray(img: DynamicImage) -> GrayImage {
    match img {
        DynamicImage::ImageLuma8(gray) => gray,
        DynamicImage::ImageLuma16(wide) => {
            GrayImage::from_fn(wide.width(), wide.height(), |x, y| {
                Luma([wide.get_pixel(x, y)[0].min(255) as u8])
            })
        }
        // alpha is dropped, not blended
        other => luma_601(&other.to_rgb8()),
    }
}

/// `L = R·299/1000 + G·587/1000 + B·114/1000` in 16.16 fixed point, rounded.
fn luma_601(rgb: &RgbImage) -> GrayImage {
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let l = (r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16;
        Luma([l as u8])
    })
}
