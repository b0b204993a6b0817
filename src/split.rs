use log::{info, warn};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::chapters;
use crate::error::SplitError;
use crate::pdf::outline::outline_tree;
use crate::pdf::PdfDocument;
use crate::ranges::{self, Range};

/// How the caller wants the document divided: by bookmarks at a given depth,
/// or by an explicit page list. Parses the selector strings used on the
/// external interface ("1", "2", "manual").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitMode {
    Bookmarks { depth: u32 },
    PageList,
}

impl FromStr for SplitMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(SplitMode::Bookmarks { depth: 1 }),
            "2" => Ok(SplitMode::Bookmarks { depth: 2 }),
            "manual" => Ok(SplitMode::PageList),
            other => Err(format!(
                "unknown mode {:?}: expected \"1\", \"2\" or \"manual\"",
                other
            )),
        }
    }
}

/// What a run produced: the files written, and the per-range failures that
/// were skipped over. A report with failures is still a completed run.
#[derive(Debug, Default)]
pub struct SplitReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<SplitError>,
}

impl SplitReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Auto mode: chapter boundaries from the bookmark tree at `depth`.
///
/// Fails with `NoBookmarksFound` before anything is written when the outline
/// is absent or yields no chapter at that depth.
pub fn split_by_outline(
    doc: &PdfDocument,
    depth: u32,
    out_dir: &Path,
) -> Result<SplitReport, SplitError> {
    let outline = outline_tree(&doc.doc);
    let chapters = chapters::resolve(&outline, depth)?;
    info!(
        "{}: {} chapter(s) at depth {}",
        doc.path,
        chapters.len(),
        depth
    );

    let ranges = ranges::from_chapters(&chapters, doc.page_count());
    Ok(write_ranges(doc, &ranges, out_dir))
}

/// Manual mode: chapter boundaries from a comma-separated page list.
///
/// Fails with `InvalidPageList` before anything is written when the list
/// contains no usable page numbers.
pub fn split_by_pages(
    doc: &PdfDocument,
    page_list: &str,
    out_dir: &Path,
) -> Result<SplitReport, SplitError> {
    let ranges = ranges::from_page_list(page_list, doc.page_count())?;
    info!("{}: {} section(s)", doc.path, ranges.len());
    Ok(write_ranges(doc, &ranges, out_dir))
}

/// Extract every range in order, one at a time. A failed slice is recorded
/// and skipped so the remaining ranges still get their chance; the caller
/// reports the accumulated failures at the end.
fn write_ranges(doc: &PdfDocument, ranges: &[Range], out_dir: &Path) -> SplitReport {
    let mut report = SplitReport::default();

    for range in ranges {
        let dest = out_dir.join(&range.filename);
        match extract_one(doc, range, &dest) {
            Ok(()) => {
                info!(
                    "wrote {} (pages {}-{})",
                    dest.display(),
                    range.start + 1,
                    range.end
                );
                report.written.push(dest);
            }
            Err(reason) => {
                let err = SplitError::SliceWriteFailed {
                    filename: range.filename.clone(),
                    reason,
                };
                warn!("{}", err);
                report.failed.push(err);
            }
        }
    }

    report
}

fn extract_one(doc: &PdfDocument, range: &Range, dest: &Path) -> Result<(), String> {
    let mut sliced = doc
        .extract_slice(range.start, range.end)
        .map_err(|e| format!("{:#}", e))?;
    PdfDocument::save_atomic(&mut sliced, dest).map_err(|e| format!("{:#}", e))
}
