// SPDX-License-Identifier: MIT
//
// Asset packaging — compile a Python module to bytecode with an external
// interpreter, zip the result under fixed names, and remove the intermediate
// bytecode file. The archive is consumed by a host application that mounts
// it on its module path.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::Command;

use stempel_core::error::{Result, StempelError};
use tracing::{debug, info, instrument, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Fixed archive name produced in the output directory.
pub const ARCHIVE_NAME: &str = "app_modules.zip";
/// Fixed name of the compiled module inside the archive.
pub const MODULE_NAME: &str = "image_processor.pyc";
/// Environment variable naming the Python interpreter to use.
pub const PYTHON_ENV_VAR: &str = "STEMPEL_PYTHON";

const PY_COMPILE_SNIPPET: &str = "import sys, py_compile; \
py_compile.compile(sys.argv[1], cfile=sys.argv[2], doraise=True, optimize=1)";

/// Compile `input_py` to bytecode and package it as `app_modules.zip` in
/// `output_dir`, which is created if missing. Returns the archive path.
///
/// The intermediate `.pyc` is always removed, whether or not archiving
/// succeeded.
#[instrument(skip_all, fields(input = %input_py.display(), output = %output_dir.display()))]
pub fn build_assets(input_py: &Path, output_dir: &Path) -> Result<PathBuf> {
    let input = input_py
        .canonicalize()
        .map_err(|_| StempelError::FileNotFound(input_py.display().to_string()))?;
    if !input.is_file() {
        return Err(StempelError::NotAFile(input.display().to_string()));
    }

    std::fs::create_dir_all(output_dir)?;
    let pyc_path = output_dir.join(MODULE_NAME);

    info!(pyc = %pyc_path.display(), "Compiling module to bytecode");
    compile_bytecode(&input, &pyc_path)?;

    let archive = write_archive(&pyc_path, output_dir);

    if let Err(err) = std::fs::remove_file(&pyc_path) {
        warn!(error = %err, "failed to remove intermediate bytecode file");
    }

    let archive_path = archive?;
    info!(archive = %archive_path.display(), "Asset archive created");
    Ok(archive_path)
}

/// Locate a Python interpreter: the `STEMPEL_PYTHON` override, else the
/// first of `python3` / `python` that answers `--version`.
pub fn find_python() -> Option<PathBuf> {
    if let Ok(explicit) = std::env::var(PYTHON_ENV_VAR) {
        return Some(PathBuf::from(explicit));
    }
    ["python3", "python"].iter().find_map(|candidate| {
        let works = Command::new(candidate)
            .arg("--version")
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false);
        works.then(|| PathBuf::from(candidate))
    })
}

/// Compile `input` to `cfile` with `py_compile` (`doraise`, `optimize=1`).
fn compile_bytecode(input: &Path, cfile: &Path) -> Result<()> {
    let python = find_python().ok_or_else(|| {
        StempelError::CompileError(format!(
            "no Python interpreter found (set {PYTHON_ENV_VAR})"
        ))
    })?;

    debug!(interpreter = %python.display(), "Invoking interpreter");
    let output = Command::new(&python)
        .arg("-c")
        .arg(PY_COMPILE_SNIPPET)
        .arg(input)
        .arg(cfile)
        .output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(StempelError::CompileError(stderr.trim().to_string()));
    }
    if !cfile.is_file() {
        return Err(StempelError::CompileError(
            "interpreter reported success but produced no bytecode file".to_string(),
        ));
    }
    Ok(())
}

/// Write `app_modules.zip` in `output_dir` containing a single deflated
/// entry, `image_processor.pyc`, copied from `pyc_path`.
pub fn write_archive(pyc_path: &Path, output_dir: &Path) -> Result<PathBuf> {
    let archive_path = output_dir.join(ARCHIVE_NAME);
    let file = File::create(&archive_path)?;
    let mut writer = ZipWriter::new(file);

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    writer
        .start_file(MODULE_NAME, options)
        .map_err(|err| StempelError::ArchiveError(err.to_string()))?;

    let mut source = File::open(pyc_path)?;
    std::io::copy(&mut source, &mut writer)?;

    writer
        .finish()
        .map_err(|err| StempelError::ArchiveError(err.to_string()))?;

    debug!(archive = %archive_path.display(), "Archive written");
    Ok(archive_path)
}
