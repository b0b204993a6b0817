use crate::error::SplitError;
use crate::pdf::outline::OutlineNode;

const UNTITLED: &str = "Untitled";

/// A chapter boundary: the 0-based page it starts on and its display title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub page: u32,
    pub title: String,
}

/// Select the bookmarks sitting at exactly `target_depth` (the outline
/// root's direct children are depth 1) and turn them into an ordered,
/// page-deduplicated chapter list.
///
/// Nodes shallower or deeper than the target are skipped, never promoted or
/// demoted; nodes whose destination did not resolve are dropped silently.
/// When several bookmarks land on the same page, the first in page order
/// wins. An absent outline, or one with no usable node at the target depth,
/// is the `NoBookmarksFound` sentinel.
pub fn resolve(outline: &[OutlineNode], target_depth: u32) -> Result<Vec<Chapter>, SplitError> {
    let mut chapters = collect_at_depth(outline, 1, target_depth);

    // Stable sort, then keep the first chapter per page.
    chapters.sort_by_key(|c| c.page);
    chapters.dedup_by_key(|c| c.page);

    if chapters.is_empty() {
        return Err(SplitError::NoBookmarksFound {
            depth: target_depth,
        });
    }
    Ok(chapters)
}

fn collect_at_depth(nodes: &[OutlineNode], depth: u32, target: u32) -> Vec<Chapter> {
    let mut found = Vec::new();
    for node in nodes {
        if depth == target {
            if let Some(page) = node.page {
                found.push(Chapter {
                    page,
                    title: display_title(&node.title),
                });
            }
        } else if depth < target {
            // Children sit one level deeper; anything below the target can
            // be pruned outright.
            found.extend(collect_at_depth(&node.children, depth + 1, target));
        }
    }
    found
}

fn display_title(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        UNTITLED.to_string()
    } else {
        trimmed.to_string()
    }
}
