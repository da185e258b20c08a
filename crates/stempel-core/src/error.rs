// SPDX-License-Identifier: MIT
//
// Unified error types for Stempel.

use thiserror::Error;

/// Top-level error type for all Stempel operations.
#[derive(Debug, Error)]
pub enum StempelError {
    // -- Input validation (reported without an error category) --
    #[error("Empty path")]
    EmptyPath,

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Not a file: {0}")]
    NotAFile(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    // -- Pipeline errors --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("font loading failed: {0}")]
    FontError(String),

    // -- Packaging errors --
    #[error("bytecode compilation failed: {0}")]
    CompileError(String),

    #[error("archive creation failed: {0}")]
    ArchiveError(String),

    // -- Ambient --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StempelError {
    /// Whether this error is an input-validation failure.
    ///
    /// Validation failures are reported as a bare message in the response
    /// contract; every other class additionally carries [`Self::category`].
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyPath
                | Self::FileNotFound(_)
                | Self::NotAFile(_)
                | Self::UnsupportedFormat(_)
        )
    }

    /// Stable category name used as the `error_type` field of error responses.
    pub fn category(&self) -> &'static str {
        match self {
            Self::EmptyPath
            | Self::FileNotFound(_)
            | Self::NotAFile(_)
            | Self::UnsupportedFormat(_) => "ValidationError",
            Self::ImageError(_) => "ImageError",
            Self::FontError(_) => "FontError",
            Self::CompileError(_) => "CompileError",
            Self::ArchiveError(_) => "ArchiveError",
            Self::Io(_) => "IoError",
            Self::Serialization(_) => "SerializationError",
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, StempelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_flagged() {
        assert!(StempelError::EmptyPath.is_validation());
        assert!(StempelError::FileNotFound("x".into()).is_validation());
        assert!(StempelError::NotAFile("x".into()).is_validation());
        assert!(StempelError::UnsupportedFormat(".txt".into()).is_validation());
        assert!(!StempelError::ImageError("bad".into()).is_validation());
    }

    #[test]
    fn categories_are_stable() {
        assert_eq!(StempelError::ImageError("x".into()).category(), "ImageError");
        assert_eq!(StempelError::FontError("x".into()).category(), "FontError");
        assert_eq!(
            StempelError::Io(std::io::Error::other("x")).category(),
            "IoError"
        );
    }

    #[test]
    fn messages_match_contract() {
        assert_eq!(StempelError::EmptyPath.to_string(), "Empty path");
        assert_eq!(
            StempelError::FileNotFound("/a/b.png".into()).to_string(),
            "File not found: /a/b.png"
        );
        assert_eq!(
            StempelError::UnsupportedFormat(".txt".into()).to_string(),
            "Unsupported format: .txt"
        );
    }
}
