//! Wallpaper composition
//!
//! Turns a quote set and a target resolution into a finished canvas:
//! background, wrapped text block centered on both axes, drop shadow
//! under every line for legibility.

pub mod background;
pub mod font;
pub mod layout;

use image::{Rgb, RgbImage};
use std::path::PathBuf;

use crate::quotes::QuoteSet;

/// Fraction of min(width, height) a glyph line takes up
const FONT_SIZE_DIVISOR: u32 = 20;

/// Everything a single composition needs. Built from the run configuration,
/// with documented defaults.
pub struct RenderRequest<'a> {
    pub quotes: &'a QuoteSet,
    pub width: u32,
    pub height: u32,
    pub background: Option<PathBuf>,
    pub text_color: Rgb<u8>,
    pub shadow_color: Rgb<u8>,
    pub shadow_offset: (i32, i32),
    pub margin_ratio: f32,
    /// Font files probed in order; kept on the request so tests can force
    /// the deterministic built-in face
    pub font_candidates: Vec<PathBuf>,
}

impl<'a> RenderRequest<'a> {
    pub fn new(quotes: &'a QuoteSet, width: u32, height: u32) -> Self {
        Self {
            quotes,
            width,
            height,
            background: None,
            text_color: Rgb([54, 54, 54]),
            shadow_color: Rgb([0, 0, 0]),
            shadow_offset: (3, 3),
            margin_ratio: 0.1,
            font_candidates: font::default_candidates(),
        }
    }
}

/// Compose a wallpaper. The output canvas always has exactly the requested
/// dimensions; text that would overflow vertically is drawn as-is.
pub fn compose(request: &RenderRequest) -> RgbImage {
    let mut canvas = background::acquire(
        request.background.as_deref(),
        request.width,
        request.height,
    );

    let font_size = (request.width.min(request.height) / FONT_SIZE_DIVISOR).max(1);
    let face = font::resolve(&request.font_candidates, font_size as f32);

    let margin = (request.width as f32 * request.margin_ratio) as u32;
    let max_text_width = request.width.saturating_sub(2 * margin).max(1);
    let lines = layout::layout_quotes(request.quotes.quotes(), max_text_width, &face);

    let line_height = face.height();
    let total_height = layout::block_height(&lines, line_height);
    let mut cursor_y = (request.height as f32 - total_height) / 2.0;

    let (shadow_dx, shadow_dy) = request.shadow_offset;
    for line in &lines {
        match line {
            layout::Line::Text(text) => {
                let text_width = face.measure(text);
                let x = (request.width as i32 - text_width as i32) / 2;
                let y = cursor_y as i32;
                face.draw(
                    &mut canvas,
                    x + shadow_dx,
                    y + shadow_dy,
                    text,
                    request.shadow_color,
                );
                face.draw(&mut canvas, x, y, text, request.text_color);
                cursor_y += line_height * layout::TEXT_LINE_FACTOR;
            }
            layout::Line::Spacer => {
                cursor_y += line_height * layout::SPACER_LINE_FACTOR;
            }
        }
    }

    canvas
}
