//! Input normalisation helpers shared by the handlers

/// Text rendered when the caller supplies nothing printable.
pub const DEFAULT_TEXT: &str = "Hello, World!";

/// Keep printable ASCII and whitespace, then trim the ends.
///
/// The bundled fonts only cover ASCII, so anything else would rasterize as
/// missing-glyph boxes.
pub fn clean_text(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_graphic() || c.is_whitespace())
        .collect();
    cleaned.trim().to_string()
}

/// Clean `text`, falling back to [`DEFAULT_TEXT`] when nothing is left.
pub fn clean_or_default(text: &str) -> String {
    let cleaned = clean_text(text);
    if cleaned.is_empty() {
        DEFAULT_TEXT.to_string()
    } else {
        cleaned
    }
}

/// Escape the characters that are significant in HTML text and attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
