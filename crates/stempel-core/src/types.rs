// SPDX-License-Identifier: MIT
//
// Core domain types for the Stempel pipeline.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::StempelError;

/// File extensions (lowercase, with leading dot) accepted by the pipeline.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".gif", ".bmp", ".webp", ".tif", ".tiff",
];

/// Whether `ext` (leading dot, any case) is an accepted image extension.
pub fn is_supported_extension(ext: &str) -> bool {
    let lowered = ext.to_ascii_lowercase();
    SUPPORTED_EXTENSIONS.contains(&lowered.as_str())
}

/// Metadata attached to a successful processing run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingMetadata {
    /// The input file as given by the caller.
    pub input_path: PathBuf,
    /// Original dimensions `[width, height]` in pixels.
    pub original_size: [u32; 2],
    /// Channel layout of the input before normalization (e.g. `RGB`, `RGBA`, `L`).
    pub original_mode: String,
    /// Size of the written PNG in bytes.
    pub output_size_bytes: u64,
    /// Wall-clock completion time.
    pub processed_at: DateTime<Local>,
}

/// Outcome of a single pipeline invocation.
///
/// Serializes to the wire contract: a `status` tag of `success` or `error`,
/// with either an output path plus metadata, or an error message and an
/// optional category string. Validation failures omit the category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProcessingResult {
    Success {
        output_image_path: PathBuf,
        metadata: ProcessingMetadata,
    },
    Error {
        error: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error_type: Option<String>,
    },
}

impl ProcessingResult {
    /// Build an error result from a pipeline error, applying the contract's
    /// rule that validation failures carry no category.
    pub fn from_error(err: &StempelError) -> Self {
        Self::Error {
            error: err.to_string(),
            error_type: (!err.is_validation()).then(|| err.category().to_string()),
        }
    }

    /// Build an error result from a bare message (no category).
    pub fn from_message(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
            error_type: None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Minimal mirror of the decoder's color-type information.
///
/// Kept in `stempel-core` so result types stay independent of the imaging
/// crates; `stempel-imaging` converts from `image::ColorType`.
pub mod image_color {
    /// Channel layout and bit depth of a decoded image.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum ColorKind {
        L8,
        La8,
        Rgb8,
        Rgba8,
        L16,
        La16,
        Rgb16,
        Rgba16,
        Rgb32F,
        Rgba32F,
        Other,
    }

    impl ColorKind {
        pub fn mode_name(self) -> &'static str {
            match self {
                Self::L8 => "L",
                Self::La8 => "LA",
                Self::Rgb8 => "RGB",
                Self::Rgba8 => "RGBA",
                Self::L16 => "L16",
                Self::La16 => "LA16",
                Self::Rgb16 => "RGB16",
                Self::Rgba16 => "RGBA16",
                Self::Rgb32F => "RGB32F",
                Self::Rgba32F => "RGBA32F",
                Self::Other => "UNKNOWN",
            }
        }

        /// Whether this layout carries an alpha channel.
        pub fn has_alpha(self) -> bool {
            matches!(
                self,
                Self::La8 | Self::Rgba8 | Self::La16 | Self::Rgba16 | Self::Rgba32F
            )
        }
    }
}
