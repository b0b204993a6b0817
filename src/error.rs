use std::path::PathBuf;
use thiserror::Error;

/// Failure taxonomy for the split pipeline.
///
/// The two recoverable variants are sentinels the caller is expected to
/// branch on: `NoBookmarksFound` means "offer a manual page list instead",
/// `InvalidPageList` means "re-prompt for one". Everything else is either
/// fatal to the run or scoped to a single output file.
#[derive(Error, Debug)]
pub enum SplitError {
    /// The outline is absent, or no bookmark at the requested depth resolved
    /// to a page.
    #[error("no bookmarks found at depth {depth}")]
    NoBookmarksFound { depth: u32 },

    /// The manual page list contained no usable page numbers.
    #[error("invalid page list {0:?}: expected comma-separated page numbers")]
    InvalidPageList(String),

    /// The external converter is missing or exited non-zero.
    #[error("conversion to PDF failed: {0}")]
    ConversionFailed(String),

    /// The source document could not be opened or parsed.
    #[error("cannot read {}: {source}", .path.display())]
    UnreadableSource {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },

    /// Writing one output slice failed. Scoped to that slice; the run
    /// continues with the remaining ranges.
    #[error("failed to write {filename}: {reason}")]
    SliceWriteFailed { filename: String, reason: String },
}

impl SplitError {
    /// Stable machine-readable tag, used on the MCP boundary.
    pub fn kind(&self) -> &'static str {
        match self {
            SplitError::NoBookmarksFound { .. } => "no_bookmarks_found",
            SplitError::InvalidPageList(_) => "invalid_page_list",
            SplitError::ConversionFailed(_) => "conversion_failed",
            SplitError::UnreadableSource { .. } => "unreadable_source",
            SplitError::SliceWriteFailed { .. } => "slice_write_failed",
        }
    }

    /// True for the sentinels where the caller has a fallback path.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SplitError::NoBookmarksFound { .. } | SplitError::InvalidPageList(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recoverable_sentinels() {
        assert!(SplitError::NoBookmarksFound { depth: 1 }.is_recoverable());
        assert!(SplitError::InvalidPageList("abc".into()).is_recoverable());
        assert!(!SplitError::ConversionFailed("no converter".into()).is_recoverable());
    }

    #[test]
    fn kinds_are_distinct() {
        let errors = [
            SplitError::NoBookmarksFound { depth: 2 },
            SplitError::InvalidPageList(String::new()),
            SplitError::ConversionFailed(String::new()),
            SplitError::SliceWriteFailed {
                filename: "01 - Intro.pdf".into(),
                reason: "disk full".into(),
            },
        ];
        let mut kinds: Vec<_> = errors.iter().map(|e| e.kind()).collect();
        kinds.dedup();
        assert_eq!(kinds.len(), errors.len());
    }
}
