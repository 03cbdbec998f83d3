/// Display list for text images

use crate::rendering::layout::TextLayout;
use crate::rendering::{Background, TextStyle};

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    /// Cover the whole canvas.
    Fill(Background),
    /// One line of text with its ascender line at `y`.
    Text {
        x: i32,
        y: i32,
        text: String,
        rgb: [u8; 3],
    },
}

/// Background first, then one text command per non-empty line.
pub fn build_display_list(style: &TextStyle, layout: &TextLayout) -> Vec<PaintCommand> {
    let mut commands = Vec::with_capacity(layout.lines.len() + 1);
    commands.push(PaintCommand::Fill(style.background));
    commands.extend(
        layout
            .lines
            .iter()
            .filter(|line| !line.text.is_empty())
            .map(|line| PaintCommand::Text {
                x: line.x,
                y: line.y,
                text: line.text.clone(),
                rgb: style.color,
            }),
    );
    commands
}
