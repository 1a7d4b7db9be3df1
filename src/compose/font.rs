//! Font resolution and glyph drawing.
//!
//! A run probes a fixed list of system font files and uses the first one
//! that loads. When none do (headless machines, tests), an 8x8 bitmap face
//! scaled to roughly the requested size stands in, so composition never
//! fails for lack of a font.

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use std::path::{Path, PathBuf};

const BITMAP_GLYPH_SIZE: u32 = 8;

/// Known system font locations, probed in order.
pub fn default_candidates() -> Vec<PathBuf> {
    [
        "/System/Library/Fonts/HelveticaNeue.ttc",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "/Library/Fonts/Arial.ttf",
    ]
    .iter()
    .map(PathBuf::from)
    .collect()
}

pub enum Face {
    Ttf { font: FontVec, scale: PxScale },
    /// Built-in 8x8 glyphs drawn as `scale`-sized pixel blocks
    Builtin { scale: u32 },
}

/// Probe candidates in order and load the first that works. Never fails.
pub fn resolve(candidates: &[PathBuf], size: f32) -> Face {
    for path in candidates {
        if !path.exists() {
            continue;
        }
        if let Ok(face) = load_ttf(path, size) {
            return face;
        }
    }
    Face::Builtin {
        scale: builtin_scale(size),
    }
}

fn load_ttf(path: &Path, size: f32) -> anyhow::Result<Face> {
    let bytes = std::fs::read(path)?;
    let font = FontVec::try_from_vec(bytes)?;
    Ok(Face::Ttf {
        font,
        scale: PxScale::from(size),
    })
}

fn builtin_scale(size: f32) -> u32 {
    ((size / BITMAP_GLYPH_SIZE as f32).round() as u32).max(1)
}

impl Face {
    /// Line height from the face's ascent/descent metrics.
    pub fn height(&self) -> f32 {
        match self {
            Face::Ttf { font, scale } => {
                let scaled = font.as_scaled(*scale);
                scaled.ascent() - scaled.descent()
            }
            Face::Builtin { scale } => (scale * BITMAP_GLYPH_SIZE) as f32,
        }
    }

    /// Rendered pixel width of `text`.
    pub fn measure(&self, text: &str) -> u32 {
        match self {
            Face::Ttf { font, scale } => text_size(*scale, font, text).0,
            Face::Builtin { scale } => {
                text.chars().count() as u32 * BITMAP_GLYPH_SIZE * scale
            }
        }
    }

    /// Draw `text` with its top-left corner at (x, y), clipped to the canvas.
    pub fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, text: &str, color: Rgb<u8>) {
        match self {
            Face::Ttf { font, scale } => {
                draw_text_mut(canvas, color, x, y, *scale, font, text)
            }
            Face::Builtin { scale } => draw_bitmap_text(canvas, x, y, text, color, *scale),
        }
    }
}

fn draw_bitmap_text(
    canvas: &mut RgbImage,
    x: i32,
    y: i32,
    text: &str,
    color: Rgb<u8>,
    scale: u32,
) {
    let mut pen_x = x;
    let advance = (BITMAP_GLYPH_SIZE * scale) as i32;

    for ch in text.chars() {
        let glyph = font8x8::legacy::BASIC_LEGACY
            .get(ch as usize)
            .copied()
            .unwrap_or(font8x8::legacy::BASIC_LEGACY[b'?' as usize]);

        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..BITMAP_GLYPH_SIZE {
                if (bits >> col) & 1 == 0 {
                    continue;
                }
                fill_block(
                    canvas,
                    pen_x + (col * scale) as i32,
                    y + (row as u32 * scale) as i32,
                    scale,
                    color,
                );
            }
        }
        pen_x += advance;
    }
}

fn fill_block(canvas: &mut RgbImage, x: i32, y: i32, size: u32, color: Rgb<u8>) {
    for dy in 0..size {
        for dx in 0..size {
            let px = x + dx as i32;
            let py = y + dy as i32;
            if px >= 0 && py >= 0 && (px as u32) < canvas.width() && (py as u32) < canvas.height()
            {
                canvas.put_pixel(px as u32, py as u32, color);
            }
        }
    }
}
