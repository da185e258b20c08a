// SPDX-License-Identifier: MIT
//
// Enhancement filters — sharpen, edge enhance, mean-centred contrast, smooth,
// and alpha flattening. Kernel weights and enhancement semantics follow the
// classic raster-editor definitions: "enhance by factor f" interpolates
// between a degenerate image and the original, with f > 1 extrapolating.

use image::{Rgb, RgbImage, RgbaImage};
use tracing::{debug, instrument};

/// 3x3 edge-enhance kernel: centre 10, neighbours -1, divisor 2.
const EDGE_ENHANCE_WEIGHTS: [i32; 9] = [
    -1, -1, -1, //
    -1, 10, -1, //
    -1, -1, -1,
];
const EDGE_ENHANCE_DIVISOR: i32 = 2;

/// 3x3 smoothing kernel: centre 5, neighbours 1, divisor 13.
const SMOOTH_WEIGHTS: [i32; 9] = [
    1, 1, 1, //
    1, 5, 1, //
    1, 1, 1,
];
const SMOOTH_DIVISOR: i32 = 13;

/// Chainable wrapper around the working image.
///
/// Each method consumes `self` and returns a new `Enhancer` holding the
/// filtered image, enabling the pipeline to be written as a single chain:
///
/// ```ignore
/// let out = Enhancer::new(rgb)
///     .sharpen(1.5)
///     .edge_enhance()
///     .adjust_contrast(1.2)
///     .smooth()
///     .into_inner();
/// ```
pub struct Enhancer {
    image: RgbImage,
}

impl Enhancer {
    pub fn new(image: RgbImage) -> Self {
        Self { image }
    }

    /// Consume the chain and return the working image.
    pub fn into_inner(self) -> RgbImage {
        self.image
    }

    /// Sharpness enhancement: extrapolate away from a smoothed copy.
    ///
    /// `factor` 1.0 is a no-op, 0.0 yields the smoothed image, values above
    /// 1.0 sharpen.
    #[instrument(skip(self), fields(factor))]
    pub fn sharpen(self, factor: f32) -> Self {
        let base = smooth(&self.image);
        let sharpened = interpolate(&base, &self.image, factor);
        debug!("Sharpness enhancement applied");
        Self { image: sharpened }
    }

    /// Edge-enhance convolution.
    #[instrument(skip(self))]
    pub fn edge_enhance(self) -> Self {
        let filtered = convolve3x3(&self.image, &EDGE_ENHANCE_WEIGHTS, EDGE_ENHANCE_DIVISOR);
        debug!("Edge enhancement applied");
        Self { image: filtered }
    }

    /// Contrast enhancement about the image's mean luma.
    ///
    /// The degenerate image is a solid grey at the rounded mean luma
    /// (Rec. 601 weights); `factor` > 1.0 pushes pixels away from it.
    #[instrument(skip(self), fields(factor))]
    pub fn adjust_contrast(self, factor: f32) -> Self {
        let mean = mean_luma(&self.image);
        debug!(mean, "Contrast enhancement applied");
        let adjusted = map_channels(&self.image, |channel| {
            mean + factor * (channel as f32 - mean)
        });
        Self { image: adjusted }
    }

    /// Smoothing convolution.
    #[instrument(skip(self))]
    pub fn smooth(self) -> Self {
        let smoothed = smooth(&self.image);
        debug!("Smoothing applied");
        Self { image: smoothed }
    }
}

/// Apply the smoothing kernel to an image.
pub fn smooth(image: &RgbImage) -> RgbImage {
    convolve3x3(image, &SMOOTH_WEIGHTS, SMOOTH_DIVISOR)
}

/// Composite an RGBA image onto an opaque white background, dropping alpha.
pub fn flatten_onto_white(image: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let image::Rgba([r, g, b, a]) = *image.get_pixel(x, y);
        let alpha = a as u32;
        let blend = |channel: u8| -> u8 {
            // channel * a + 255 * (255 - a), rounded, over 255.
            ((channel as u32 * alpha + 255 * (255 - alpha) + 127) / 255) as u8
        };
        Rgb([blend(r), blend(g), blend(b)])
    })
}

/// 3x3 convolution with integer weights, rounded division by `divisor`, and
/// replicated edges.
///
/// Integer weights keep uniform regions exact: a flat patch convolved with a
/// kernel whose weights sum to the divisor comes back bit-identical, which
/// the sharpen no-op relies on.
fn convolve3x3(image: &RgbImage, weights: &[i32; 9], divisor: i32) -> RgbImage {
    let (width, height) = image.dimensions();
    RgbImage::from_fn(width, height, |x, y| {
        let mut acc = [0i32; 3];
        for ky in 0..3i32 {
            for kx in 0..3i32 {
                let sx = (x as i32 + kx - 1).clamp(0, width as i32 - 1) as u32;
                let sy = (y as i32 + ky - 1).clamp(0, height as i32 - 1) as u32;
                let px = image.get_pixel(sx, sy).0;
                let weight = weights[(ky * 3 + kx) as usize];
                for (channel, value) in acc.iter_mut().zip(px) {
                    *channel += weight * value as i32;
                }
            }
        }
        Rgb(std::array::from_fn(|i| {
            (acc[i] as f32 / divisor as f32).round().clamp(0.0, 255.0) as u8
        }))
    })
}

/// Per-pixel interpolation `base + factor * (target - base)`, clamped.
///
/// `factor` values outside [0, 1] extrapolate, which is how enhancement
/// strengths above 1.0 work. Both images must share dimensions.
fn interpolate(base: &RgbImage, target: &RgbImage, factor: f32) -> RgbImage {
    debug_assert_eq!(base.dimensions(), target.dimensions());
    RgbImage::from_fn(base.width(), base.height(), |x, y| {
        let b = base.get_pixel(x, y).0;
        let t = target.get_pixel(x, y).0;
        Rgb(std::array::from_fn(|i| {
            let value = b[i] as f32 + factor * (t[i] as f32 - b[i] as f32);
            value.round().clamp(0.0, 255.0) as u8
        }))
    })
}

/// Apply a channel-wise transform, clamping results to [0, 255].
fn map_channels(image: &RgbImage, op: impl Fn(u8) -> f32) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let px = image.get_pixel(x, y).0;
        Rgb(std::array::from_fn(|i| {
            op(px[i]).round().clamp(0.0, 255.0) as u8
        }))
    })
}

/// Mean luma of the image (Rec. 601 weights), rounded to the nearest integer.
fn mean_luma(image: &RgbImage) -> f32 {
    let pixel_count = image.width() as u64 * image.height() as u64;
    if pixel_count == 0 {
        return 128.0;
    }
    let mut total: u64 = 0;
    for Rgb([r, g, b]) in image.pixels() {
        total += (299 * *r as u64 + 587 * *g as u64 + 114 * *b as u64) / 1000;
    }
    ((total as f64 / pixel_count as f64) + 0.5).floor() as f32
}
