/// Rasterizer: executes a display list and encodes PNG

use crate::font::{LoadedFont, SizedFont};
use crate::rendering::layout::layout_text;
use crate::rendering::paint::{build_display_list, PaintCommand};
use crate::rendering::{gradient, Screenshot, TextStyle};
use crate::{Error, Result};
use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgb, RgbImage};
use log::debug;
use std::io::Cursor;

/// Execute `commands` on a fresh `width x height` canvas.
pub fn rasterize(commands: &[PaintCommand], font: &SizedFont, width: u32, height: u32) -> RgbImage {
    let mut canvas = RgbImage::new(width, height);
    for cmd in commands {
        match cmd {
            PaintCommand::Fill(background) => {
                canvas = gradient::fill(width, height, *background);
            }
            PaintCommand::Text { x, y, text, rgb } => {
                font.draw_line(&mut canvas, *x, *y, text, Rgb(*rgb));
            }
        }
    }
    canvas
}

pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}

/// Render `text` onto a PNG according to `style`.
///
/// With `supersample = s > 1`, layout and drawing happen on a canvas `s`
/// times larger (font size and padding scaled to match) which is then
/// downsampled with a Lanczos3 filter.
pub fn render_text_png(font: &LoadedFont, text: &str, style: &TextStyle) -> Result<Screenshot> {
    validate(style)?;

    let scale = style.supersample;
    let canvas_w = scaled(style.width, scale, "width")?;
    let canvas_h = scaled(style.height, scale, "height")?;
    let padding = scaled(style.padding, scale, "padding")?;
    let font_px = scaled(style.font_size, scale, "font_size")?;

    let sized = font.sized(font_px as f32);
    let layout = layout_text(&sized, text, canvas_w, canvas_h, padding, style.line_spacing);
    debug!(
        "Laid out {} line(s) at {}px on a {}x{} canvas",
        layout.lines.len(),
        font_px,
        canvas_w,
        canvas_h
    );

    let commands = build_display_list(style, &layout);
    let mut image = rasterize(&commands, &sized, canvas_w, canvas_h);

    if scale > 1 {
        image = imageops::resize(&image, style.width, style.height, FilterType::Lanczos3);
    }

    let png_data = encode_png(&image)?;
    Ok(Screenshot::new(style.width, style.height, png_data))
}

fn validate(style: &TextStyle) -> Result<()> {
    if style.width == 0 || style.height == 0 {
        return Err(Error::InvalidDimensions(format!(
            "image must be at least 1x1, got {}x{}",
            style.width, style.height
        )));
    }
    if style.font_size == 0 {
        return Err(Error::InvalidDimensions("font_size must be positive".into()));
    }
    if style.supersample == 0 {
        return Err(Error::InvalidDimensions("supersample factor must be positive".into()));
    }
    Ok(())
}

fn scaled(value: u32, scale: u32, what: &str) -> Result<u32> {
    value
        .checked_mul(scale)
        .ok_or_else(|| Error::InvalidDimensions(format!("{} {} overflows at {}x", what, value, scale)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::tests::system_font;
    use crate::rendering::Background;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

    fn decode(png: &[u8]) -> RgbImage {
        image::load_from_memory_with_format(png, ImageFormat::Png)
            .expect("decode png")
            .to_rgb8()
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let Some(font) = system_font() else { return };
        let style = TextStyle::full(0, 10, 12, 0);
        let err = render_text_png(&font, "x", &style).unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn oversized_scale_overflows_cleanly() {
        let Some(font) = system_font() else { return };
        let style = TextStyle { supersample: u32::MAX, ..TextStyle::full(10, 10, 12, 0) };
        assert!(matches!(render_text_png(&font, "x", &style), Err(Error::InvalidDimensions(_))));
    }

    #[test]
    fn full_render_has_requested_size_and_gradient() {
        let Some(font) = system_font() else { return };
        let style = TextStyle::full(120, 90, 16, 8);
        let shot = render_text_png(&font, "Hello, World!", &style).expect("render");

        assert_eq!(&shot.png_data[..8], PNG_MAGIC);
        let img = decode(&shot.png_data);
        assert_eq!(img.dimensions(), (120, 90));

        // bottom-right corner stays background: darker than the top-right one
        let top = img.get_pixel(119, 0)[0];
        let bottom = img.get_pixel(119, 89)[0];
        assert!(top > bottom, "expected gradient, got top={} bottom={}", top, bottom);

        // some pixels are near-white text
        assert!(img.pixels().any(|p| p[0] > 200));
    }

    #[test]
    fn minimal_render_uses_solid_background() {
        let Some(font) = system_font() else { return };
        let style = TextStyle::minimal(100, 60, 14, 4);
        let shot = render_text_png(&font, "Hi", &style).expect("render");
        let img = decode(&shot.png_data);

        assert_eq!(img.dimensions(), (100, 60));
        assert_eq!(img.get_pixel(99, 59), &Rgb([0, 0, 0]));
        assert!(img.pixels().any(|p| p[0] > 200));
    }

    #[test]
    fn rasterize_without_text_is_background_only() {
        let Some(font) = system_font() else { return };
        let sized = font.sized(12.0);
        let cmds = vec![PaintCommand::Fill(Background::Solid([9, 9, 9]))];
        let img = rasterize(&cmds, &sized, 8, 8);
        assert!(img.pixels().all(|p| *p == Rgb([9, 9, 9])));
    }

    #[test]
    fn same_input_renders_identical_bytes() {
        let Some(font) = system_font() else { return };
        let style = TextStyle::full(64, 64, 10, 2);
        let a = render_text_png(&font, "stable", &style).expect("render");
        let b = render_text_png(&font, "stable", &style).expect("render");
        assert_eq!(a.etag(), b.etag());
    }
}
