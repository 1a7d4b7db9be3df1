//! Greedy word wrapping and line planning.

use super::font::Face;

/// One slot in the vertical line sequence of a canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Text(String),
    /// Vertical gap separating consecutive quotes
    Spacer,
}

/// Relative heights against the face's line height
pub const TEXT_LINE_FACTOR: f32 = 1.2;
pub const SPACER_LINE_FACTOR: f32 = 0.6;

/// Wrap every quote and insert one spacer between consecutive quotes.
pub fn layout_quotes(quotes: &[String], max_width: u32, face: &Face) -> Vec<Line> {
    let mut lines = Vec::new();
    for (i, quote) in quotes.iter().enumerate() {
        if i > 0 {
            lines.push(Line::Spacer);
        }
        lines.extend(wrap(quote, max_width, face).into_iter().map(Line::Text));
    }
    lines
}

/// Greedy wrap against measured pixel widths. Words are never split or
/// truncated: a single word wider than the limit becomes its own
/// overflowing line.
pub fn wrap(text: &str, max_width: u32, face: &Face) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current.join(" "), word)
        };

        if face.measure(&candidate) <= max_width {
            current.push(word);
        } else {
            if !current.is_empty() {
                lines.push(current.join(" "));
            }
            current = vec![word];
        }
    }
    if !current.is_empty() {
        lines.push(current.join(" "));
    }

    lines
}

/// Total pixel height of the block the line sequence occupies.
pub fn block_height(lines: &[Line], line_height: f32) -> f32 {
    lines
        .iter()
        .map(|line| match line {
            Line::Text(_) => line_height * TEXT_LINE_FACTOR,
            Line::Spacer => line_height * SPACER_LINE_FACTOR,
        })
        .sum()
}
