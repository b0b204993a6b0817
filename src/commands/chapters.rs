use anyhow::{Context, Result};
use std::path::Path;

use crate::convert::ensure_pdf;
use crate::pdf::PdfDocument;
use crate::split;

pub fn run(input: &Path, depth: u32, output_dir: &Path) -> Result<()> {
    let pdf_path = ensure_pdf(input)?;
    let doc = PdfDocument::open(&pdf_path)?;

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create directory: {}", output_dir.display()))?;

    let report = split::split_by_outline(&doc, depth, output_dir)?;

    println!(
        "Wrote {} chapter file(s) to {}",
        report.written.len(),
        output_dir.display()
    );
    for err in &report.failed {
        eprintln!("  {}", err);
    }
    if !report.is_clean() {
        anyhow::bail!("{} slice(s) could not be written", report.failed.len());
    }

    Ok(())
}
