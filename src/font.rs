//! Font resolution, measurement and glyph rasterization (via `ab_glyph`)

use crate::{Error, Result};
use ab_glyph::{point, Font, FontArc, GlyphId, PxScale, Rect, ScaleFont};
use image::{Rgb, RgbImage};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Font files probed when no explicit list is configured, in priority order.
pub const DEFAULT_FONT_CANDIDATES: &[&str] = &[
    "fonts/Manrope-Bold.ttf",
    "fonts/Manrope-Variable.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Bold.ttf",
];

/// An ordered list of candidate font files.
///
/// The list is resolved once at startup; the first file that exists and
/// parses wins. There is no silent fallback to a built-in font.
#[derive(Debug, Clone)]
pub struct FontSource {
    candidates: Vec<PathBuf>,
}

impl FontSource {
    pub fn new<I, P>(candidates: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
        }
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// Load the first usable candidate.
    ///
    /// Fails with [`Error::FontNotFound`] naming every path that was tried.
    pub fn resolve(&self) -> Result<LoadedFont> {
        let mut tried = Vec::with_capacity(self.candidates.len());

        for path in &self.candidates {
            tried.push(path.display().to_string());
            if !path.is_file() {
                debug!("Font candidate {} does not exist", path.display());
                continue;
            }
            match LoadedFont::from_file(path) {
                Ok(font) => {
                    info!("Using font {}", path.display());
                    return Ok(font);
                }
                Err(e) => warn!("Skipping font candidate {}: {}", path.display(), e),
            }
        }

        Err(Error::FontNotFound(tried))
    }
}

impl Default for FontSource {
    fn default() -> Self {
        Self::new(DEFAULT_FONT_CANDIDATES.iter().copied())
    }
}

/// A parsed font plus the path it was loaded from. Cheap to clone.
#[derive(Clone)]
pub struct LoadedFont {
    font: FontArc,
    origin: String,
}

impl std::fmt::Debug for LoadedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedFont").field("origin", &self.origin).finish()
    }
}

impl LoadedFont {
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)
            .map_err(|e| Error::InvalidFont(format!("{}: {}", path.display(), e)))?;
        Self::from_bytes(data, path.display().to_string())
    }

    pub fn from_bytes(data: Vec<u8>, origin: impl Into<String>) -> Result<Self> {
        let origin = origin.into();
        let font = FontArc::try_from_vec(data).map_err(|_| Error::InvalidFont(origin.clone()))?;
        Ok(Self { font, origin })
    }

    /// Where the font was loaded from (a path or a caller supplied label).
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Size the font so that one em spans `px` pixels.
    pub fn sized(&self, px: f32) -> SizedFont {
        // PxScale is ascent-to-descent height; convert from em size.
        let units_per_em = self.font.units_per_em().unwrap_or(1000.0);
        let height = px * self.font.height_unscaled() / units_per_em;
        SizedFont {
            font: self.font.clone(),
            scale: PxScale::from(height),
        }
    }
}

/// A font bound to a pixel size, used to measure and draw single lines.
#[derive(Clone)]
pub struct SizedFont {
    font: FontArc,
    scale: PxScale,
}

impl SizedFont {
    /// Baseline offset from the top of a line.
    pub fn ascent(&self) -> f32 {
        self.font.as_scaled(self.scale).ascent()
    }

    /// Rendered advance width of `text`, including kerning, rounded up.
    pub fn measure(&self, text: &str) -> u32 {
        let width = self.layout(text, 0.0, 0.0).last().map_or(0.0, |(_, x)| *x);
        width.max(0.0).ceil() as u32
    }

    /// Union of glyph outline bounds with the line top at `y = 0`.
    pub fn ink_bounds(&self, text: &str) -> Option<Rect> {
        let mut bounds: Option<Rect> = None;
        for (glyph, _) in self.layout(text, 0.0, 0.0) {
            let Some(outlined) = self.font.outline_glyph(glyph) else {
                continue;
            };
            let b = outlined.px_bounds();
            bounds = Some(match bounds {
                None => b,
                Some(acc) => Rect {
                    min: point(acc.min.x.min(b.min.x), acc.min.y.min(b.min.y)),
                    max: point(acc.max.x.max(b.max.x), acc.max.y.max(b.max.y)),
                },
            });
        }
        bounds
    }

    /// Height of one line of text, taken from the ink extent of `"Ay"`.
    pub fn line_height(&self) -> u32 {
        match self.ink_bounds("Ay") {
            Some(r) if r.height() > 0.0 => r.height().ceil() as u32,
            _ => {
                let scaled = self.font.as_scaled(self.scale);
                (scaled.ascent() - scaled.descent()).ceil().max(1.0) as u32
            }
        }
    }

    /// Rasterize `text` with its ascender line at `y`, blending coverage
    /// over whatever is already on the canvas. Pixels outside are clipped.
    pub fn draw_line(&self, canvas: &mut RgbImage, x: i32, y: i32, text: &str, color: Rgb<u8>) {
        let (width, height) = canvas.dimensions();

        for (glyph, _) in self.layout(text, x as f32, y as f32) {
            let Some(outlined) = self.font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let px = bounds.min.x as i64 + gx as i64;
                let py = bounds.min.y as i64 + gy as i64;
                if px < 0 || py < 0 || px >= width as i64 || py >= height as i64 {
                    return;
                }
                let pixel = canvas.get_pixel_mut(px as u32, py as u32);
                *pixel = blend(*pixel, color, coverage);
            });
        }
    }

    /// Position each glyph of `text` on a line whose top is at `(x, y)`.
    /// Yields the glyph and the caret position after it.
    fn layout(&self, text: &str, x: f32, y: f32) -> Vec<(ab_glyph::Glyph, f32)> {
        let scaled = self.font.as_scaled(self.scale);
        let baseline = y + scaled.ascent();
        let mut caret = 0.0f32;
        let mut previous: Option<GlyphId> = None;
        let mut glyphs = Vec::with_capacity(text.len());

        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(self.scale, point(x + caret, baseline));
            caret += scaled.h_advance(id);
            previous = Some(id);
            glyphs.push((glyph, caret));
        }

        glyphs
    }
}

fn blend(under: Rgb<u8>, over: Rgb<u8>, coverage: f32) -> Rgb<u8> {
    let a = coverage.clamp(0.0, 1.0);
    let mix = |u: u8, o: u8| (u as f32 * (1.0 - a) + o as f32 * a).round() as u8;
    Rgb([
        mix(under[0], over[0]),
        mix(under[1], over[1]),
        mix(under[2], over[2]),
    ])
}
