use anyhow::Result;
use std::path::Path;

use crate::pdf::outline::{outline_tree, OutlineNode};
use crate::pdf::PdfDocument;

pub fn run(path: &Path) -> Result<()> {
    let doc = PdfDocument::open(path)?;
    let outline = outline_tree(&doc.doc);

    if outline.is_empty() {
        println!("No bookmarks in {}", path.display());
        return Ok(());
    }

    print_level(&outline, 1);
    Ok(())
}

fn print_level(nodes: &[OutlineNode], depth: u32) {
    let indent = "  ".repeat((depth - 1) as usize);
    for node in nodes {
        match node.page {
            // Pages are shown 1-based, matching what a PDF viewer displays.
            Some(page) => println!("{}{} .. p{}", indent, node.title, page + 1),
            None => println!("{}{} .. (unresolved)", indent, node.title),
        }
        print_level(&node.children, depth + 1);
    }
}
