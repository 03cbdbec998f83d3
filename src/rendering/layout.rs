/// Line layout for text images

use crate::font::SizedFont;
use crate::wrap::wrap_text_infallible;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// One wrapped line and the top-left corner of its line box.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedLine {
    pub x: i32,
    pub y: i32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    /// Area available to text after padding.
    pub content: Rect,
    pub line_height: u32,
    /// Distance between consecutive line tops (height plus spacing).
    pub line_advance: u32,
    pub lines: Vec<PositionedLine>,
}

/// Wrap `text` into the padded area of a `canvas_width x canvas_height`
/// canvas and stack the lines top-down.
///
/// Lines that would start below the canvas are dropped.
pub fn layout_text(
    font: &SizedFont,
    text: &str,
    canvas_width: u32,
    canvas_height: u32,
    padding: u32,
    line_spacing: f32,
) -> TextLayout {
    let content = Rect {
        x: padding as i32,
        y: padding as i32,
        width: canvas_width.saturating_sub(padding.saturating_mul(2)),
        height: canvas_height.saturating_sub(padding.saturating_mul(2)),
    };

    let line_height = font.line_height();
    let spacing = (line_height as f32 * line_spacing.max(0.0)) as u32;
    let line_advance = line_height + spacing;

    let wrapped = wrap_text_infallible(text, content.width, |s| font.measure(s));

    let mut lines = Vec::with_capacity(wrapped.len());
    let mut y = content.y as i64;
    for text in wrapped {
        if y >= canvas_height as i64 {
            break;
        }
        lines.push(PositionedLine {
            x: content.x,
            y: y as i32,
            text,
        });
        y += line_advance as i64;
    }

    TextLayout {
        content,
        line_height,
        line_advance,
        lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::tests::system_font;

    #[test]
    fn lines_stack_at_fixed_advance() {
        let Some(font) = system_font() else { return };
        let sized = font.sized(20.0);
        let layout = layout_text(&sized, "one\ntwo\nthree", 400, 400, 10, 0.3);

        assert_eq!(layout.lines.len(), 3);
        assert_eq!(layout.line_advance, layout.line_height + (layout.line_height as f32 * 0.3) as u32);
        for (i, line) in layout.lines.iter().enumerate() {
            assert_eq!(line.x, 10);
            assert_eq!(line.y, 10 + i as i32 * layout.line_advance as i32);
        }
    }

    #[test]
    fn wrapped_lines_fit_content_width() {
        let Some(font) = system_font() else { return };
        let sized = font.sized(24.0);
        let text = "The quick brown fox jumps over the lazy dog and keeps on running";
        let layout = layout_text(&sized, text, 300, 2000, 20, 0.3);

        assert_eq!(layout.content.width, 260);
        assert!(layout.lines.len() > 1);
        for line in &layout.lines {
            assert!(sized.measure(&line.text) <= layout.content.width);
        }
    }

    #[test]
    fn overflowing_lines_are_dropped() {
        let Some(font) = system_font() else { return };
        let sized = font.sized(30.0);
        let text = (0..50).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        let layout = layout_text(&sized, &text, 200, 100, 0, 0.3);

        assert!(!layout.lines.is_empty());
        assert!(layout.lines.len() < 50);
        assert!(layout.lines.iter().all(|l| l.y < 100));
    }
}
