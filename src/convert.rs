use log::info;
use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::SplitError;

/// Calibre's command-line converter; handles EPUB, AZW3, MOBI and friends.
const CONVERTER: &str = "ebook-convert";

/// Hand back a PDF path for `path`: PDFs pass through untouched, anything
/// else is transcoded next to the source via the external converter.
///
/// The converter runs as a plain blocking subprocess with captured output;
/// a missing binary or non-zero exit is `ConversionFailed`.
pub fn ensure_pdf(path: &Path) -> Result<PathBuf, SplitError> {
    if let Some(ext) = path.extension().and_then(OsStr::to_str) {
        if ext.eq_ignore_ascii_case("pdf") {
            return Ok(path.to_path_buf());
        }
    }

    let target = path.with_extension("pdf");
    info!(
        "converting {} to {} with {}",
        path.display(),
        target.display(),
        CONVERTER
    );

    let output = Command::new(CONVERTER)
        .arg(path)
        .arg(&target)
        .output()
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => SplitError::ConversionFailed(format!(
                "{} not found on PATH (install Calibre)",
                CONVERTER
            )),
            _ => SplitError::ConversionFailed(format!("could not launch {}: {}", CONVERTER, e)),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SplitError::ConversionFailed(format!(
            "{} exited with {}: {}",
            CONVERTER,
            output.status,
            stderr.trim()
        )));
    }

    Ok(target)
}
