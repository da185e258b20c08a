// SPDX-License-Identifier: MIT
//
// Font discovery and the bounded size-keyed font cache.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use ab_glyph::{FontVec, PxScale};
use stempel_core::error::{Result, StempelError};
use tracing::{debug, warn};

/// Environment variable naming a font file tried before the configured paths.
pub const FONT_ENV_VAR: &str = "STEMPEL_FONT";

/// A parsed font bound to the pixel size it was requested at.
#[derive(Debug)]
pub struct SizedFont {
    pub font: FontVec,
    pub scale: PxScale,
}

/// Load a font at `size` pixels from the first usable candidate.
///
/// Candidates are, in order: the `STEMPEL_FONT` environment override, then
/// `search_paths`. Candidates that are missing, unreadable, or not parseable
/// as a font are skipped with a warning.
pub fn load_sized(search_paths: &[PathBuf], size: u32) -> Result<SizedFont> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Ok(env_path) = std::env::var(FONT_ENV_VAR) {
        candidates.push(PathBuf::from(env_path));
    }
    candidates.extend(search_paths.iter().cloned());

    for path in &candidates {
        if !path.is_file() {
            continue;
        }
        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "font file unreadable; skipping");
                continue;
            }
        };
        match FontVec::try_from_vec(data) {
            Ok(font) => {
                debug!(path = %path.display(), size, "Label font loaded");
                return Ok(SizedFont {
                    font,
                    scale: PxScale::from(size as f32),
                });
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "font file unparseable; skipping");
            }
        }
    }

    Err(StempelError::FontError(format!(
        "no usable font among {} candidate path(s)",
        candidates.len()
    )))
}

/// Bounded mapping from requested pixel size to a loaded font resource.
///
/// When an insert would push the cache past its cap, the whole cache is
/// cleared first, so the entry count never exceeds the cap. Not synchronized;
/// intended for single-threaded use inside one processor.
pub struct FontCache<F = Arc<SizedFont>> {
    entries: HashMap<u32, F>,
    cap: usize,
}

impl<F: Clone> FontCache<F> {
    /// Create an empty cache holding at most `cap` entries (minimum 1).
    pub fn new(cap: usize) -> Self {
        Self {
            entries: HashMap::new(),
            cap: cap.max(1),
        }
    }

    /// Look up the font loaded for `size`, if cached.
    pub fn get(&self, size: u32) -> Option<F> {
        self.entries.get(&size).cloned()
    }

    /// Insert a font for `size`, clearing the cache wholesale if it is full.
    pub fn insert(&mut self, size: u32, font: F) {
        if !self.entries.contains_key(&size) && self.entries.len() >= self.cap {
            debug!(cap = self.cap, "font cache full; clearing");
            self.entries.clear();
        }
        self.entries.insert(size, font);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
