//! Greedy pixel-width line wrapping
//!
//! Text is split on explicit newlines first; each paragraph is then filled
//! word by word until the next word would push the line past `max_width`.
//! Words that cannot fit on a line of their own are broken character by
//! character.

use std::convert::Infallible;

/// Wrap `text` into lines whose measured width does not exceed `max_width`.
///
/// `measure` returns the rendered pixel width of a string. Any error it
/// returns is propagated unchanged and aborts wrapping.
///
/// A whitespace-only paragraph yields a single empty line. When `max_width`
/// is narrower than a single character, each character lands on its own line.
///
/// ```
/// use textshot::wrap::wrap_text_infallible;
///
/// // every character is 10px wide
/// let lines = wrap_text_infallible("hello big world", 60, |s| s.chars().count() as u32 * 10);
/// assert_eq!(lines, vec!["hello", "big", "world"]);
/// ```
pub fn wrap_text<F, E>(text: &str, max_width: u32, mut measure: F) -> Result<Vec<String>, E>
where
    F: FnMut(&str) -> Result<u32, E>,
{
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        if paragraph.trim().is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                place_word(word, max_width, &mut measure, &mut current, &mut lines)?;
                continue;
            }

            let candidate = format!("{} {}", current, word);
            if measure(&candidate)? <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::take(&mut current));
                place_word(word, max_width, &mut measure, &mut current, &mut lines)?;
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
    }

    Ok(lines)
}

/// Convenience wrapper for measurement functions that cannot fail.
pub fn wrap_text_infallible<F>(text: &str, max_width: u32, mut measure: F) -> Vec<String>
where
    F: FnMut(&str) -> u32,
{
    match wrap_text(text, max_width, |s| Ok::<u32, Infallible>(measure(s))) {
        Ok(lines) => lines,
        Err(never) => match never {},
    }
}

/// Start a fresh line with `word`, breaking it per character if it is wider
/// than `max_width` on its own. The trailing fragment is left in `current`.
fn place_word<F, E>(
    word: &str,
    max_width: u32,
    measure: &mut F,
    current: &mut String,
    lines: &mut Vec<String>,
) -> Result<(), E>
where
    F: FnMut(&str) -> Result<u32, E>,
{
    debug_assert!(current.is_empty());

    if measure(word)? <= max_width {
        current.push_str(word);
        return Ok(());
    }

    for ch in word.chars() {
        // An empty line always accepts the character, so each step consumes input.
        if current.is_empty() {
            current.push(ch);
            continue;
        }
        let mut candidate = current.clone();
        candidate.push(ch);
        if measure(&candidate)? <= max_width {
            *current = candidate;
        } else {
            lines.push(std::mem::take(current));
            current.push(ch);
        }
    }

    Ok(())
}
