use anyhow::{Context, Result};
use lopdf::Document;
use std::path::Path;
use tempfile::NamedTempFile;

use crate::error::SplitError;

/// Read-only view over the source PDF. Opened once per run and shared by
/// every slice extraction.
#[derive(Debug)]
pub struct PdfDocument {
    pub doc: Document,
    pub path: String,
}

impl PdfDocument {
    pub fn open<P: AsRef<Path>>(path: P) -> std::result::Result<Self, SplitError> {
        let path = path.as_ref();
        let doc = Document::load(path).map_err(|source| SplitError::UnreadableSource {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(PdfDocument {
            doc,
            path: path.display().to_string(),
        })
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Copy pages `[start, end)` (0-based, half-open) into a new standalone
    /// document. Works on a clone of the source and deletes the complement,
    /// which keeps each page's content stream and resources intact.
    pub fn extract_slice(&self, start: u32, end: u32) -> Result<Document> {
        let total = self.page_count();
        if start >= end || end > total {
            anyhow::bail!(
                "slice {}..{} is outside the document (0..{})",
                start,
                end,
                total
            );
        }

        let mut sliced = self.doc.clone();
        // 1-based page p survives iff start < p <= end.
        let doomed: Vec<u32> = (1..=total).filter(|&p| p <= start || p > end).collect();
        if !doomed.is_empty() {
            sliced.delete_pages(&doomed);
        }
        Ok(sliced)
    }

    /// Save to `path` through a temp file in the same directory, so a failed
    /// write never leaves a truncated file at the final name. An existing
    /// file at `path` is overwritten.
    pub fn save_atomic(doc: &mut Document, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)
            .with_context(|| format!("failed to create temp file in {}", dir.display()))?;
        doc.save_to(tmp.as_file_mut())
            .with_context(|| format!("failed to serialize PDF for {}", path.display()))?;
        tmp.persist(path)
            .with_context(|| format!("failed to move output into place at {}", path.display()))?;
        Ok(())
    }
}
