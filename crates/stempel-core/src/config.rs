// SPDX-License-Identifier: MIT
//
// Pipeline configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings for the enhancement and watermark pipeline.
///
/// The filter order is fixed; these knobs cover the label text, font
/// discovery, and the enhancement strengths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Text drawn centered over the processed image.
    pub watermark_text: String,
    /// Font files tried in order when loading the label font. The
    /// `STEMPEL_FONT` environment variable, when set, is tried first.
    pub font_paths: Vec<PathBuf>,
    /// Maximum number of size-keyed fonts kept cached before the cache is
    /// cleared wholesale.
    pub font_cache_cap: usize,
    /// Sharpness enhancement strength (1.0 is a no-op).
    pub sharpness_factor: f32,
    /// Contrast enhancement strength about the image mean (1.0 is a no-op).
    pub contrast_factor: f32,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            watermark_text: "STEMPEL DEMO".to_string(),
            font_paths: default_font_paths(),
            font_cache_cap: 10,
            sharpness_factor: 1.5,
            contrast_factor: 1.2,
        }
    }
}

/// Platform-typical locations for a general-purpose sans-serif font.
///
/// Paths that do not exist are skipped at load time, so this list can span
/// platforms without harm.
pub fn default_font_paths() -> Vec<PathBuf> {
    [
        // Linux
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        // macOS
        "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "/Library/Fonts/Arial.ttf",
        // Windows
        "C:\\Windows\\Fonts\\arialbd.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
        "C:\\Windows\\Fonts\\segoeui.ttf",
    ]
    .iter()
    .map(PathBuf::from)
    .collect()
}
