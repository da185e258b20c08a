// SPDX-License-Identifier: MIT
//
// Shadowed label overlay drawn centered on the processed image.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use tracing::{debug, instrument};

use crate::fonts::SizedFont;

/// Smallest label size in pixels.
pub const MIN_FONT_SIZE: u32 = 24;
/// Largest label size in pixels.
pub const MAX_FONT_SIZE: u32 = 300;

const SHADOW_COLOR: Rgb<u8> = Rgb([0, 0, 0]);
const LABEL_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Label size for an image of the given height: 10% of the height, clamped.
pub fn label_font_size(image_height: u32) -> u32 {
    ((image_height as f32 * 0.10) as u32).clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
}

/// Shadow thickness for a label of the given size.
pub fn shadow_offset(font_size: u32) -> i32 {
    (font_size / 20).max(3) as i32
}

/// Draw `text` centered on `canvas` with a black drop shadow and a red face.
///
/// The shadow is produced by stamping the text at every pixel offset within
/// the shadow radius (the unshifted position excluded), then the label is
/// drawn once, unshifted, in red. Text wider than the canvas is clipped.
#[instrument(skip(canvas, font), fields(text, font_size))]
pub fn draw_label(canvas: &mut RgbImage, text: &str, font: &SizedFont, font_size: u32) {
    let (text_w, text_h) = text_size(font.scale, &font.font, text);
    let x = (canvas.width() as i32 - text_w as i32) / 2;
    let y = (canvas.height() as i32 - text_h as i32) / 2;

    let offset = shadow_offset(font_size);
    for ox in -offset..=offset {
        for oy in -offset..=offset {
            if ox != 0 || oy != 0 {
                draw_text_mut(canvas, SHADOW_COLOR, x + ox, y + oy, font.scale, &font.font, text);
            }
        }
    }
    draw_text_mut(canvas, LABEL_COLOR, x, y, font.scale, &font.font, text);

    debug!(text_w, text_h, x, y, offset, "Label drawn");
}
