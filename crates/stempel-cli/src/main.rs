// SPDX-License-Identifier: MIT
//
// stempel — apply the enhancement pipeline and watermark to one image.
//
// Prints the JSON response on stdout; logs go to stderr so the output stays
// machine-parseable. The exit code is 0 for both success and error responses
// — the `status` field carries the verdict.

use std::path::PathBuf;

use clap::Parser;
use stempel_imaging::{api, Processor};

/// Apply the fixed enhancement filters and watermark label to a single
/// image, writing a timestamped PNG and printing a JSON status record.
#[derive(Debug, Parser)]
#[command(name = "stempel", version)]
struct Cli {
    /// Input image path.
    input: PathBuf,
    /// Directory for the processed PNG (system temp directory when omitted).
    #[arg(short = 'o', long = "output-dir")]
    output_dir: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::info!(input = %cli.input.display(), "stempel starting");

    // Route through the same JSON contract an embedding host uses.
    let request = serde_json::json!({
        "input_image_path": cli.input,
        "output_dir": cli.output_dir,
    });

    let mut processor = Processor::with_defaults();
    let response = api::process_json(&mut processor, &request.to_string());
    println!("{response}");
}
