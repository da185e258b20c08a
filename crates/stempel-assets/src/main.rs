// SPDX-License-Identifier: MIT
//
// stempel-assets — package a Python module as a zipped bytecode asset.

use std::path::PathBuf;

use clap::Parser;

/// Compile a Python module to bytecode and zip it for embedding in a host
/// application.
#[derive(Debug, Parser)]
#[command(name = "stempel-assets", version)]
struct Cli {
    /// Python source file to compile.
    input_py: PathBuf,
    /// Directory receiving app_modules.zip (created if missing).
    output_dir: PathBuf,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match stempel_assets::build_assets(&cli.input_py, &cli.output_dir) {
        Ok(archive) => println!("Created {}", archive.display()),
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}
