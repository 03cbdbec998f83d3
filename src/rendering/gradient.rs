/// Background fills

use crate::rendering::Background;
use image::{Rgb, RgbImage};

/// A vertical fade from `top_gray` on the first row towards black.
///
/// Row `y` gets `floor(top_gray * (1 - y / height))`.
pub fn vertical_gradient(width: u32, height: u32, top_gray: u8) -> RgbImage {
    let h = height.max(1) as f32;
    RgbImage::from_fn(width, height, |_, y| {
        let gray = (top_gray as f32 * (1.0 - y as f32 / h)) as u8;
        Rgb([gray, gray, gray])
    })
}

/// Allocate a canvas filled with `background`.
pub fn fill(width: u32, height: u32, background: Background) -> RgbImage {
    match background {
        Background::Gradient { top_gray } => vertical_gradient(width, height, top_gray),
        Background::Solid(rgb) => RgbImage::from_pixel(width, height, Rgb(rgb)),
    }
}
