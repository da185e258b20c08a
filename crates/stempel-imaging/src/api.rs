// SPDX-License-Identifier: MIT
//
// JSON invocation contract used by the CLI and by embedding hosts.
//
// Request:  {"input_image_path": "...", "output_dir": "..."?}
// Response: the serialized ProcessingResult.

use serde::Deserialize;
use std::path::PathBuf;
use stempel_core::types::ProcessingResult;
use tracing::instrument;

use crate::pipeline::processor::Processor;

/// A single processing request.
#[derive(Debug, Deserialize)]
pub struct ProcessRequest {
    /// Path of the image to process.
    #[serde(default)]
    pub input_image_path: Option<PathBuf>,
    /// Directory for the output PNG; the system temp directory when absent.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

/// Run one request given as a JSON string, returning the JSON response.
///
/// Malformed JSON and a missing `input_image_path` are reported as error
/// responses rather than panics, so a host can always parse what comes back.
#[instrument(skip_all)]
pub fn process_json(processor: &mut Processor, request: &str) -> String {
    let result = match serde_json::from_str::<ProcessRequest>(request) {
        Err(err) => ProcessingResult::from_message(format!("Invalid JSON: {err}")),
        Ok(request) => match request.input_image_path {
            None => ProcessingResult::from_message("Missing input_image_path"),
            Some(input) => processor.process(&input, request.output_dir.as_deref()),
        },
    };

    serde_json::to_string(&result).unwrap_or_else(|_| {
        r#"{"status":"error","error":"response serialization failed"}"#.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn malformed_json_is_reported() {
        let mut processor = Processor::with_defaults();
        let response = process_json(&mut processor, "{not json");
        let value: serde_json::Value = serde_json::from_str(&response).unwrap();
        assert_eq!(value["status"], "error");
        assert!(value["error"].as_str().unwrap().starts_with("Invalid JSON: "));
    }

    #[test]
    fn missing_input_field_is_reported() {
        let mut processor = Processor::with_defaults();
        let response = process_json(&mut processor, r#"{"output_dir": "/tmp"}"#);
        let value: serde_json::Value = serde_json::from_str(&response).unwrap();
        assert_eq!(value["error"], "Missing input_image_path");
        assert!(value.get("error_type").is_none());
    }

    #[test]
    fn null_output_dir_falls_back_to_temp() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        RgbImage::from_pixel(16, 16, Rgb([1, 2, 3])).save(&input).unwrap();

        let request = serde_json::json!({
            "input_image_path": input,
            "output_dir": null,
        });

        let mut processor = Processor::with_defaults();
        let response = process_json(&mut processor, &request.to_string());
        let value: serde_json::Value = serde_json::from_str(&response).unwrap();
        assert_eq!(value["status"], "success");

        // Output landed in the system temp dir; remove it again.
        let out = PathBuf::from(value["output_image_path"].as_str().unwrap());
        assert!(out.starts_with(std::env::temp_dir()));
        let _ = std::fs::remove_file(out);
    }

    #[test]
    fn end_to_end_request_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        RgbImage::from_pixel(40, 30, Rgb([10, 20, 30])).save(&input).unwrap();

        let request = serde_json::json!({
            "input_image_path": input,
            "output_dir": dir.path(),
        });

        let mut processor = Processor::with_defaults();
        let response = process_json(&mut processor, &request.to_string());
        let value: serde_json::Value = serde_json::from_str(&response).unwrap();

        assert_eq!(value["status"], "success");
        assert_eq!(value["metadata"]["original_size"][0], 40);
        assert_eq!(value["metadata"]["original_size"][1], 30);
        let out = value["output_image_path"].as_str().unwrap();
        assert!(std::path::Path::new(out).is_file());
    }
}
