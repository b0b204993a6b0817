use log::warn;
use regex::Regex;
use std::sync::OnceLock;

use crate::chapters::Chapter;
use crate::error::SplitError;

/// One output slice: pages `[start, end)` (0-based, half-open), its 1-based
/// position among the emitted slices, and the file it will be written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Range {
    pub start: u32,
    pub end: u32,
    pub index: usize,
    pub filename: String,
}

/// Build one range per chapter: each chapter runs from its own page to the
/// next chapter's page, the last to the end of the document. Ranges that
/// collapse to nothing (residual duplicate-page artifacts) are dropped and
/// do not reserve an index.
pub fn from_chapters(chapters: &[Chapter], total_pages: u32) -> Vec<Range> {
    let mut ranges = Vec::with_capacity(chapters.len());
    for (i, chapter) in chapters.iter().enumerate() {
        let start = chapter.page;
        let end = chapters
            .get(i + 1)
            .map(|next| next.page)
            .unwrap_or(total_pages);
        if start >= end {
            warn!("skipping empty range for chapter {:?}", chapter.title);
            continue;
        }
        let index = ranges.len() + 1;
        let filename = format!("{:02} - {}.pdf", index, sanitize_title(&chapter.title));
        ranges.push(Range {
            start,
            end,
            index,
            filename,
        });
    }
    ranges
}

/// Build ranges from a comma-separated list of 1-based page numbers, each
/// marking where a new output file starts.
///
/// Tokens that are not non-negative integers are discarded with a warning;
/// if nothing survives, the whole list is rejected as `InvalidPageList`.
/// A split at page 1 is implied (and absorbed when listed explicitly), page
/// numbers outside the document are discarded, and whatever remains becomes
/// the ordered, deduplicated set of split points.
pub fn from_page_list(input: &str, total_pages: u32) -> Result<Vec<Range>, SplitError> {
    let mut pages: Vec<u32> = Vec::new();
    for token in input.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        match token.parse::<u32>() {
            Ok(n) => pages.push(n),
            Err(_) => warn!("ignoring page token {:?}: not a page number", token),
        }
    }
    if pages.is_empty() {
        return Err(SplitError::InvalidPageList(input.to_string()));
    }
    pages.sort_unstable();

    let mut splits: Vec<u32> = Vec::new();
    // The first file always starts at the first page; only synthesize the
    // leading split when the user did not list page 1 themselves.
    if !pages.contains(&1) {
        splits.push(0);
    }
    for &page in &pages {
        match page {
            0 => warn!("ignoring page 0: pages are numbered from 1"),
            p if p > total_pages => {
                warn!("ignoring page {}: document ends at page {}", p, total_pages)
            }
            p => splits.push(p - 1),
        }
    }
    splits.sort_unstable();
    splits.dedup();

    let mut ranges = Vec::with_capacity(splits.len());
    for (i, &start) in splits.iter().enumerate() {
        let end = splits.get(i + 1).copied().unwrap_or(total_pages);
        if start >= end {
            continue;
        }
        let index = ranges.len() + 1;
        let filename = format!(
            "{:02} - Section (Page {}-{}).pdf",
            index,
            start + 1,
            end
        );
        ranges.push(Range {
            start,
            end,
            index,
            filename,
        });
    }
    Ok(ranges)
}

/// Make a chapter title safe as a filename stem: drop the characters Windows
/// refuses, trim surrounding whitespace, cap at 50 characters.
pub fn sanitize_title(raw: &str) -> String {
    static ILLEGAL: OnceLock<Regex> = OnceLock::new();
    let illegal = ILLEGAL.get_or_init(|| Regex::new(r#"[<>:"/\\|?*]"#).unwrap());

    let stripped = illegal.replace_all(raw, "");
    stripped.trim().chars().take(50).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chapter(title: &str, page: u32) -> Chapter {
        Chapter {
            page,
            title: title.to_string(),
        }
    }

    fn spans(ranges: &[Range]) -> Vec<(u32, u32)> {
        ranges.iter().map(|r| (r.start, r.end)).collect()
    }

    #[test]
    fn chapters_become_contiguous_ranges() {
        let chapters = vec![
            chapter("Intro", 0),
            chapter("Core", 20),
            chapter("Appendix", 55),
        ];
        let ranges = from_chapters(&chapters, 100);

        assert_eq!(spans(&ranges), vec![(0, 20), (20, 55), (55, 100)]);
        assert_eq!(ranges[0].filename, "01 - Intro.pdf");
        assert_eq!(ranges[1].filename, "02 - Core.pdf");
        assert_eq!(ranges[2].filename, "03 - Appendix.pdf");
    }

    #[test]
    fn ranges_are_exhaustive_and_non_overlapping() {
        let chapters = vec![chapter("A", 3), chapter("B", 10), chapter("C", 42)];
        let ranges = from_chapters(&chapters, 80);

        for pair in ranges.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert_eq!(ranges.last().unwrap().end, 80);
    }

    #[test]
    fn empty_ranges_are_dropped_and_indices_recompact() {
        // Duplicate-page artifact: the middle chapter collapses to nothing.
        let chapters = vec![chapter("A", 0), chapter("B", 10), chapter("C", 10)];
        // resolve() would have deduplicated this, but the builder must cope
        // with malformed input on its own.
        let mut ranges = from_chapters(&chapters, 10);
        assert_eq!(spans(&ranges), vec![(0, 10)]);
        assert_eq!(ranges[0].index, 1);

        let chapters = vec![chapter("A", 0), chapter("B", 5), chapter("B dup", 5), chapter("C", 8)];
        ranges = from_chapters(&chapters, 12);
        assert_eq!(spans(&ranges), vec![(0, 5), (5, 8), (8, 12)]);
        assert_eq!(
            ranges.iter().map(|r| r.index).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert!(ranges[2].filename.starts_with("03 - "));
    }

    #[test]
    fn manual_list_splits_at_each_page() {
        let ranges = from_page_list("13, 50, 88", 100).unwrap();
        assert_eq!(spans(&ranges), vec![(0, 12), (12, 49), (49, 87), (87, 100)]);
        assert_eq!(ranges[0].filename, "01 - Section (Page 1-12).pdf");
        assert_eq!(ranges[1].filename, "02 - Section (Page 13-49).pdf");
        assert_eq!(ranges[2].filename, "03 - Section (Page 50-87).pdf");
        assert_eq!(ranges[3].filename, "04 - Section (Page 88-100).pdf");
    }

    #[test]
    fn explicit_page_one_does_not_create_an_empty_lead() {
        let ranges = from_page_list("1, 30", 60).unwrap();
        assert_eq!(spans(&ranges), vec![(0, 29), (29, 60)]);
    }

    #[test]
    fn out_of_range_pages_are_discarded() {
        let ranges = from_page_list("0, 30, 500", 100).unwrap();
        assert_eq!(spans(&ranges), vec![(0, 29), (29, 100)]);
    }

    #[test]
    fn only_out_of_range_pages_still_covers_the_document() {
        let ranges = from_page_list("500", 100).unwrap();
        assert_eq!(spans(&ranges), vec![(0, 100)]);
    }

    #[test]
    fn non_numeric_list_is_invalid() {
        let err = from_page_list("abc", 100).unwrap_err();
        assert!(matches!(err, SplitError::InvalidPageList(_)));
        assert!(from_page_list("", 100).is_err());
        assert!(from_page_list("-3, 2.5", 100).is_err());
    }

    #[test]
    fn mixed_list_keeps_the_numeric_tokens() {
        let ranges = from_page_list("13, abc, 50", 100).unwrap();
        assert_eq!(spans(&ranges), vec![(0, 12), (12, 49), (49, 100)]);
    }

    #[test]
    fn duplicate_pages_collapse() {
        let ranges = from_page_list("20, 20, 20", 40).unwrap();
        assert_eq!(spans(&ranges), vec![(0, 19), (19, 40)]);
    }

    #[test]
    fn sanitizer_strips_illegal_characters() {
        assert_eq!(sanitize_title(r#"What <is> "life"?"#), "What is life");
        assert_eq!(sanitize_title("a/b\\c|d*e"), "abcde");
        assert_eq!(sanitize_title("  padded  "), "padded");

        let long = "x".repeat(80);
        assert_eq!(sanitize_title(&long).chars().count(), 50);

        let sanitized = sanitize_title(r#"<>:"/\|?*"#);
        assert!(sanitized.is_empty());
    }

    #[test]
    fn sanitized_filenames_survive_hostile_titles() {
        let chapters = vec![chapter(r#"Ch: 1 "Why?""#, 0)];
        let ranges = from_chapters(&chapters, 5);
        assert_eq!(ranges[0].filename, "01 - Ch 1 Why.pdf");
    }
}
