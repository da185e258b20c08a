// SPDX-License-Identifier: MIT
//
// Pipeline orchestration — validation, color-mode normalization, the fixed
// filter chain, the watermark label, and the timestamped PNG output.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use image::{ColorType, DynamicImage, ImageFormat, RgbImage};
use stempel_core::error::{Result, StempelError};
use stempel_core::types::image_color::ColorKind;
use stempel_core::types::{is_supported_extension, ProcessingMetadata, ProcessingResult};
use stempel_core::ProcessorConfig;
use tracing::{info, instrument, warn};

use crate::fonts::{self, FontCache, SizedFont};
use crate::pipeline::filters::{self, Enhancer};
use crate::pipeline::watermark;

/// Single-image enhancement processor.
///
/// Holds the configuration and the bounded font cache; everything else is
/// per-invocation. Synchronous and single-threaded — one image is held in
/// memory at a time and the font cache is not synchronized.
pub struct Processor {
    config: ProcessorConfig,
    fonts: FontCache,
}

impl Processor {
    pub fn new(config: ProcessorConfig) -> Self {
        let cap = config.font_cache_cap;
        Self {
            config,
            fonts: FontCache::new(cap),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(ProcessorConfig::default())
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Run the full pipeline on one input image.
    ///
    /// Never panics and never returns `Err`: validation failures and pipeline
    /// errors are both folded into the returned [`ProcessingResult`], the
    /// latter with an error category attached.
    #[instrument(skip(self), fields(input = %input_path.display()))]
    pub fn process(&mut self, input_path: &Path, output_dir: Option<&Path>) -> ProcessingResult {
        if let Err(err) = validate_input(input_path) {
            info!(error = %err, "input rejected");
            return ProcessingResult::from_error(&err);
        }

        match self.run_pipeline(input_path, output_dir) {
            Ok(result) => result,
            Err(err) => {
                warn!(error = %err, category = err.category(), "processing failed");
                ProcessingResult::from_error(&err)
            }
        }
    }

    fn run_pipeline(
        &mut self,
        input_path: &Path,
        output_dir: Option<&Path>,
    ) -> Result<ProcessingResult> {
        let decoded = image::open(input_path).map_err(|err| {
            StempelError::ImageError(format!(
                "failed to open {}: {}",
                input_path.display(),
                err
            ))
        })?;

        let original_size = [decoded.width(), decoded.height()];
        let original_mode = color_kind(decoded.color()).mode_name().to_string();
        info!(
            width = original_size[0],
            height = original_size[1],
            mode = %original_mode,
            "Image loaded"
        );

        let rgb = normalize_to_rgb(decoded);

        let mut enhanced = Enhancer::new(rgb)
            .sharpen(self.config.sharpness_factor)
            .edge_enhance()
            .adjust_contrast(self.config.contrast_factor)
            .smooth()
            .into_inner();

        self.apply_label(&mut enhanced);

        let output_path = generate_output_path(input_path, output_dir)?;
        enhanced
            .save_with_format(&output_path, ImageFormat::Png)
            .map_err(|err| {
                StempelError::ImageError(format!(
                    "failed to save {}: {}",
                    output_path.display(),
                    err
                ))
            })?;

        let output_size_bytes = std::fs::metadata(&output_path)?.len();
        info!(output = %output_path.display(), output_size_bytes, "Processing complete");

        Ok(ProcessingResult::Success {
            output_image_path: output_path,
            metadata: ProcessingMetadata {
                input_path: input_path.to_path_buf(),
                original_size,
                original_mode,
                output_size_bytes,
                processed_at: Local::now(),
            },
        })
    }

    /// Draw the watermark label, or skip it with a warning when no font can
    /// be found. A missing font degrades the output rather than failing the
    /// run, mirroring a default-font fallback.
    fn apply_label(&mut self, canvas: &mut RgbImage) {
        let font_size = watermark::label_font_size(canvas.height());
        match self.sized_font(font_size) {
            Ok(font) => {
                watermark::draw_label(canvas, &self.config.watermark_text, &font, font_size)
            }
            Err(err) => warn!(error = %err, "no usable label font; skipping watermark"),
        }
    }

    /// Fetch the font for `size` from the cache, loading it on a miss.
    fn sized_font(&mut self, size: u32) -> Result<Arc<SizedFont>> {
        if let Some(font) = self.fonts.get(size) {
            return Ok(font);
        }
        let loaded = Arc::new(fonts::load_sized(&self.config.font_paths, size)?);
        self.fonts.insert(size, Arc::clone(&loaded));
        Ok(loaded)
    }
}

/// Reject inputs the pipeline cannot process.
///
/// The extension check runs before the existence checks so that an
/// unsupported extension is reported the same way whether or not the file
/// exists.
pub fn validate_input(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(StempelError::EmptyPath);
    }

    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default();
    if !is_supported_extension(&ext) {
        return Err(StempelError::UnsupportedFormat(ext));
    }

    if !path.exists() {
        return Err(StempelError::FileNotFound(path.display().to_string()));
    }
    if !path.is_file() {
        return Err(StempelError::NotAFile(path.display().to_string()));
    }
    Ok(())
}

/// Map the decoder's color type onto the core color-kind mirror.
fn color_kind(color: ColorType) -> ColorKind {
    match color {
        ColorType::L8 => ColorKind::L8,
        ColorType::La8 => ColorKind::La8,
        ColorType::Rgb8 => ColorKind::Rgb8,
        ColorType::Rgba8 => ColorKind::Rgba8,
        ColorType::L16 => ColorKind::L16,
        ColorType::La16 => ColorKind::La16,
        ColorType::Rgb16 => ColorKind::Rgb16,
        ColorType::Rgba16 => ColorKind::Rgba16,
        ColorType::Rgb32F => ColorKind::Rgb32F,
        ColorType::Rgba32F => ColorKind::Rgba32F,
        _ => ColorKind::Other,
    }
}

/// Flatten any alpha onto white; otherwise convert to plain 8-bit RGB.
///
/// Palette inputs are expanded by the decoder before this point, so the two
/// branches cover every layout the pipeline sees.
fn normalize_to_rgb(decoded: DynamicImage) -> RgbImage {
    if color_kind(decoded.color()).has_alpha() {
        filters::flatten_onto_white(&decoded.to_rgba8())
    } else {
        decoded.to_rgb8()
    }
}

/// Build `processed_<stem>_<YYYYMMDD_HHMMSS_microseconds>.png` inside
/// `output_dir` (created if missing) or the system temp directory.
fn generate_output_path(input_path: &Path, output_dir: Option<&Path>) -> Result<PathBuf> {
    let dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => std::env::temp_dir(),
    };
    std::fs::create_dir_all(&dir)?;

    let stem = input_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("image");
    let timestamp = Local::now().format("%Y%m%d_%H%M%S_%6f");
    Ok(dir.join(format!("processed_{stem}_{timestamp}.png")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use stempel_core::config::default_font_paths;

    fn write_test_png(dir: &Path, name: &str, w: u32, h: u32) -> PathBuf {
        let path = dir.join(name);
        RgbImage::from_pixel(w, h, Rgb([120, 130, 140]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn empty_path_is_rejected() {
        let err = validate_input(Path::new("")).unwrap_err();
        assert_eq!(err.to_string(), "Empty path");
    }

    #[test]
    fn missing_file_is_rejected_with_path_in_message() {
        let err = validate_input(Path::new("/no/such/place/input.png")).unwrap_err();
        assert!(err.to_string().starts_with("File not found: "));
        assert!(err.is_validation());
    }

    #[test]
    fn directory_path_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("sub.png");
        std::fs::create_dir(&nested).unwrap();
        let err = validate_input(&nested).unwrap_err();
        assert!(err.to_string().starts_with("Not a file: "));
    }

    #[test]
    fn unsupported_extension_is_rejected_even_when_file_exists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();
        let err = validate_input(&path).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported format: .txt");
    }

    #[test]
    fn unsupported_extension_is_rejected_when_file_is_missing() {
        let err = validate_input(Path::new("/no/such/notes.txt")).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported format: .txt");
    }

    #[test]
    fn output_names_are_timestamped_and_distinct() {
        let dir = tempfile::tempdir().unwrap();
        let input = Path::new("/somewhere/holiday.jpg");
        let first = generate_output_path(input, Some(dir.path())).unwrap();
        // Full pipeline runs are always further apart than the clock tick;
        // keep this bare-generator test off the sub-microsecond edge.
        std::thread::sleep(std::time::Duration::from_micros(10));
        let second = generate_output_path(input, Some(dir.path())).unwrap();

        let name = first.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("processed_holiday_"));
        assert!(name.ends_with(".png"));
        assert_ne!(first, second, "timestamps should differ at microsecond resolution");
    }

    #[test]
    fn process_preserves_dimensions_and_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_test_png(dir.path(), "input.png", 64, 48);

        let mut processor = Processor::with_defaults();
        let result = processor.process(&input, Some(dir.path()));

        let ProcessingResult::Success {
            output_image_path,
            metadata,
        } = &result
        else {
            panic!("expected success, got {result:?}");
        };

        assert_eq!(metadata.original_size, [64, 48]);
        assert_eq!(metadata.original_mode, "RGB");
        assert!(metadata.output_size_bytes > 0);

        let reloaded = image::open(&output_image_path).unwrap();
        assert_eq!(reloaded.width(), 64);
        assert_eq!(reloaded.height(), 48);
    }

    #[test]
    fn process_flattens_alpha_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("translucent.png");
        image::RgbaImage::from_pixel(200, 200, image::Rgba([0, 0, 0, 0]))
            .save(&path)
            .unwrap();

        let mut processor = Processor::with_defaults();
        let result = processor.process(&path, Some(dir.path()));

        let ProcessingResult::Success {
            output_image_path,
            metadata,
        } = &result
        else {
            panic!("expected success, got {result:?}");
        };
        assert_eq!(metadata.original_mode, "RGBA");

        // Fully transparent input flattens to white; the filters and any
        // label clipping leave the corner pixel untouched.
        let out = image::open(&output_image_path).unwrap().to_rgb8();
        assert_eq!(out.get_pixel(0, 0).0, [255, 255, 255]);
    }

    #[test]
    fn process_missing_file_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut processor = Processor::with_defaults();
        let result = processor.process(Path::new("/no/such/input.png"), Some(dir.path()));

        match result {
            ProcessingResult::Error { error, error_type } => {
                assert!(error.starts_with("File not found"));
                assert!(error_type.is_none(), "validation errors carry no category");
            }
            other => panic!("expected error, got {other:?}"),
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn repeated_runs_produce_distinct_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_test_png(dir.path(), "input.png", 32, 32);

        let mut processor = Processor::with_defaults();
        let first = processor.process(&input, Some(dir.path()));
        let second = processor.process(&input, Some(dir.path()));

        let path_of = |result: &ProcessingResult| match result {
            ProcessingResult::Success {
                output_image_path, ..
            } => output_image_path.clone(),
            other => panic!("expected success, got {other:?}"),
        };
        assert_ne!(path_of(&first), path_of(&second));
    }

    #[test]
    fn label_is_drawn_when_a_font_is_available() {
        // Depends on a system font; skip quietly on machines without one.
        if fonts::load_sized(&default_font_paths(), 24).is_err() {
            eprintln!("no system font available; skipping label assertion");
            return;
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("canvas.png");
        RgbImage::from_pixel(400, 240, Rgb([255, 255, 255])).save(&path).unwrap();

        let mut processor = Processor::with_defaults();
        let result = processor.process(&path, Some(dir.path()));
        let ProcessingResult::Success {
            output_image_path, ..
        } = result
        else {
            panic!("expected success");
        };

        // The shadow stamps pure black somewhere near the centre band.
        let out = image::open(&output_image_path).unwrap().to_rgb8();
        let has_dark = out
            .pixels()
            .any(|px| px.0[0] < 60 && px.0[1] < 60 && px.0[2] < 60);
        assert!(has_dark, "expected label shadow pixels in output");
    }
}
