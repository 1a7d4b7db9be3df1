//! Canvas backgrounds: stock gradient or a cover-scaled picture.

use anyhow::{Context, Result};
use colored::*;
use image::{Rgb, RgbImage, imageops::FilterType};
use std::path::Path;

/// Vertical gradient anchors, top to bottom
const GRADIENT_TOP: [u8; 3] = [20, 30, 50];
const GRADIENT_BOTTOM: [u8; 3] = [30, 50, 80];

/// Opacity of the dark layer composited over background pictures (out of 255)
const OVERLAY_ALPHA: u32 = 100;

/// Produce the canvas the text is drawn onto. Always exactly
/// `width` x `height`; any problem with the configured picture silently
/// downgrades to the gradient.
pub fn acquire(background: Option<&Path>, width: u32, height: u32) -> RgbImage {
    if let Some(path) = background
        && path.exists()
    {
        match load_cover(path, width, height) {
            Ok(canvas) => return canvas,
            Err(e) => println!(
                "{}",
                format!("Could not load background image ({e:#}), using gradient").yellow()
            ),
        }
    }
    gradient(width, height)
}

/// Two-stop vertical gradient, interpolated per scanline.
pub fn gradient(width: u32, height: u32) -> RgbImage {
    let mut canvas = RgbImage::new(width, height);
    for y in 0..height {
        let ratio = y as f32 / height as f32;
        let pixel = Rgb([
            lerp(GRADIENT_TOP[0], GRADIENT_BOTTOM[0], ratio),
            lerp(GRADIENT_TOP[1], GRADIENT_BOTTOM[1], ratio),
            lerp(GRADIENT_TOP[2], GRADIENT_BOTTOM[2], ratio),
        ]);
        for x in 0..width {
            canvas.put_pixel(x, y, pixel);
        }
    }
    canvas
}

fn lerp(a: u8, b: u8, t: f32) -> u8 {
    (a as f32 + (b as f32 - a as f32) * t) as u8
}

/// Load a picture, scale it so it fully covers the canvas, center-crop the
/// excess, and darken it so text stays legible on any content.
fn load_cover(path: &Path, width: u32, height: u32) -> Result<RgbImage> {
    let picture =
        image::open(path).with_context(|| format!("decoding {}", path.display()))?;

    let (source_width, source_height) = (picture.width().max(1), picture.height().max(1));
    let factor = f32::max(
        width as f32 / source_width as f32,
        height as f32 / source_height as f32,
    );
    let scaled_width = ((source_width as f32 * factor).round() as u32).max(width);
    let scaled_height = ((source_height as f32 * factor).round() as u32).max(height);

    let scaled = picture.resize_exact(scaled_width, scaled_height, FilterType::Lanczos3);
    let crop_x = (scaled_width - width) / 2;
    let crop_y = (scaled_height - height) / 2;
    let mut canvas = scaled.crop_imm(crop_x, crop_y, width, height).to_rgb8();

    darken(&mut canvas, OVERLAY_ALPHA);
    Ok(canvas)
}

/// Composite a black layer of the given alpha over the whole canvas.
fn darken(canvas: &mut RgbImage, alpha: u32) {
    for pixel in canvas.pixels_mut() {
        for channel in &mut pixel.0 {
            *channel = ((*channel as u32 * (255 - alpha)) / 255) as u8;
        }
    }
}
