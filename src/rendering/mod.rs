//! Rendering pipeline for text images
//!
//! `layout` positions wrapped lines, `paint` turns a layout into a display
//! list, `raster` executes the list on a pixel buffer and encodes PNG.

pub mod gradient;
pub mod layout;
pub mod paint;
pub mod raster;

use sha2::{Digest, Sha256};

pub use raster::render_text_png;

/// An encoded PNG and its pixel dimensions.
#[derive(Debug, Clone)]
pub struct Screenshot {
    pub width: u32,
    pub height: u32,
    pub png_data: Vec<u8>,
}

impl Screenshot {
    pub fn new(width: u32, height: u32, png_data: Vec<u8>) -> Self {
        Self { width, height, png_data }
    }

    /// Content digest suitable for an HTTP `ETag` (hex SHA-256 of the PNG).
    pub fn etag(&self) -> String {
        hex::encode(Sha256::digest(&self.png_data))
    }
}

/// Canvas fill drawn before any text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    /// Vertical fade from `top_gray` at the top edge towards black.
    Gradient { top_gray: u8 },
    /// Flat colour.
    Solid([u8; 3]),
}

/// Per-request rendering parameters, in output pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub width: u32,
    pub height: u32,
    pub font_size: u32,
    pub padding: u32,
    pub background: Background,
    /// Render at this multiple of the output size, then downsample.
    pub supersample: u32,
    pub color: [u8; 3],
    /// Extra gap between lines as a fraction of the line height.
    pub line_spacing: f32,
}

impl TextStyle {
    /// Gradient background, white text, 2x supersampling.
    pub fn full(width: u32, height: u32, font_size: u32, padding: u32) -> Self {
        Self {
            width,
            height,
            font_size,
            padding,
            background: Background::Gradient { top_gray: 30 },
            supersample: 2,
            color: [255, 255, 255],
            line_spacing: 0.3,
        }
    }

    /// Solid black background, drawn directly at output size.
    pub fn minimal(width: u32, height: u32, font_size: u32, padding: u32) -> Self {
        Self {
            background: Background::Solid([0, 0, 0]),
            supersample: 1,
            ..Self::full(width, height, font_size, padding)
        }
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::full(800, 1000, 36, 20)
    }
}
