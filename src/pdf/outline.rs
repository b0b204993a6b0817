use lopdf::{Document, Object, ObjectId};
use std::collections::{HashMap, HashSet};

/// One bookmark in the document outline. `page` is the resolved 0-based
/// destination index; `None` means the destination was broken or dangling.
#[derive(Debug, Clone)]
pub struct OutlineNode {
    pub title: String,
    pub page: Option<u32>,
    pub children: Vec<OutlineNode>,
}

const UNTITLED: &str = "Untitled";

/// Read the bookmark tree from the document catalog.
///
/// Returns an empty vector when the document carries no outline at all;
/// broken destinations surface as `page: None` on the affected node rather
/// than failing the walk.
pub fn outline_tree(doc: &Document) -> Vec<OutlineNode> {
    let Ok(catalog) = doc.catalog() else {
        return Vec::new();
    };

    let outlines = match catalog.get(b"Outlines") {
        Ok(Object::Reference(r)) => match doc.get_dictionary(*r) {
            Ok(d) => d,
            Err(_) => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    let Ok(Object::Reference(first)) = outlines.get(b"First") else {
        return Vec::new();
    };

    let pages = page_index_map(doc);
    let mut seen = HashSet::new();
    walk_siblings(doc, *first, &pages, &mut seen)
}

/// Map page object ids to 0-based page indices.
fn page_index_map(doc: &Document) -> HashMap<ObjectId, u32> {
    doc.get_pages()
        .into_iter()
        .map(|(num, id)| (id, num - 1))
        .collect()
}

fn walk_siblings(
    doc: &Document,
    first: ObjectId,
    pages: &HashMap<ObjectId, u32>,
    seen: &mut HashSet<ObjectId>,
) -> Vec<OutlineNode> {
    let mut nodes = Vec::new();
    let mut current = Some(first);

    while let Some(id) = current {
        // Guard against malformed sibling chains that loop back on themselves.
        if !seen.insert(id) {
            break;
        }
        let Ok(dict) = doc.get_dictionary(id) else {
            break;
        };

        let title = match dict.get(b"Title") {
            Ok(Object::String(bytes, _)) => decode_text(bytes),
            _ => UNTITLED.to_string(),
        };

        let page = destination_page(doc, dict, pages);

        let children = match dict.get(b"First") {
            Ok(Object::Reference(child)) => walk_siblings(doc, *child, pages, seen),
            _ => Vec::new(),
        };

        nodes.push(OutlineNode {
            title,
            page,
            children,
        });

        current = match dict.get(b"Next") {
            Ok(Object::Reference(r)) => Some(*r),
            _ => None,
        };
    }

    nodes
}

/// Resolve a bookmark's jump target to a page index, trying the direct
/// `/Dest` entry first and falling back to a GoTo action's `/D`.
fn destination_page(
    doc: &Document,
    item: &lopdf::Dictionary,
    pages: &HashMap<ObjectId, u32>,
) -> Option<u32> {
    if let Ok(dest) = item.get(b"Dest") {
        return page_for_dest(doc, dest, pages);
    }
    if let Ok(action) = item.get(b"A") {
        if let Some(dest) = goto_target(doc, action) {
            return page_for_dest(doc, dest, pages);
        }
    }
    None
}

/// The `/D` destination of a GoTo action, whether the action is inline or
/// referenced. Other action types carry no page target.
fn goto_target<'a>(doc: &'a Document, action: &'a Object) -> Option<&'a Object> {
    let dict = match action {
        Object::Dictionary(d) => d,
        Object::Reference(r) => doc.get_object(*r).ok()?.as_dict().ok()?,
        _ => return None,
    };
    match dict.get(b"S") {
        Ok(Object::Name(s)) if s == b"GoTo" => dict.get(b"D").ok(),
        _ => None,
    }
}

fn page_for_dest(doc: &Document, dest: &Object, pages: &HashMap<ObjectId, u32>) -> Option<u32> {
    match dest {
        // Explicit destination array: [page_ref /XYZ left top zoom] etc.
        Object::Array(arr) => match arr.first() {
            Some(Object::Reference(page_ref)) => pages.get(page_ref).copied(),
            _ => None,
        },
        // Named destination, resolved through the catalog.
        Object::String(name, _) | Object::Name(name) => lookup_named(doc, name, pages),
        Object::Reference(r) => {
            let obj = doc.get_object(*r).ok()?;
            page_for_dest(doc, obj, pages)
        }
        _ => None,
    }
}

fn lookup_named(doc: &Document, name: &[u8], pages: &HashMap<ObjectId, u32>) -> Option<u32> {
    let catalog = doc.catalog().ok()?;

    // PDF 1.2+ name tree under Names/Dests.
    if let Ok(Object::Reference(names_ref)) = catalog.get(b"Names") {
        if let Ok(names) = doc.get_dictionary(*names_ref) {
            if let Ok(Object::Reference(dests_ref)) = names.get(b"Dests") {
                if let Some(page) = walk_name_tree(doc, *dests_ref, name, pages) {
                    return Some(page);
                }
            }
        }
    }

    // Legacy catalog-level Dests dictionary.
    if let Ok(Object::Reference(dests_ref)) = catalog.get(b"Dests") {
        if let Ok(dests) = doc.get_dictionary(*dests_ref) {
            if let Ok(dest) = dests.get(name) {
                return page_for_dest(doc, dest, pages);
            }
        }
    }

    None
}

fn walk_name_tree(
    doc: &Document,
    node_id: ObjectId,
    name: &[u8],
    pages: &HashMap<ObjectId, u32>,
) -> Option<u32> {
    let node = doc.get_dictionary(node_id).ok()?;

    // Leaf: [key1 value1 key2 value2 ...]
    if let Ok(Object::Array(entries)) = node.get(b"Names") {
        for pair in entries.chunks_exact(2) {
            if let Object::String(key, _) = &pair[0] {
                if key == name {
                    return page_for_dest(doc, &pair[1], pages);
                }
            }
        }
    }

    // Interior node: descend into each kid.
    if let Ok(Object::Array(kids)) = node.get(b"Kids") {
        for kid in kids {
            if let Object::Reference(kid_ref) = kid {
                if let Some(page) = walk_name_tree(doc, *kid_ref, name, pages) {
                    return Some(page);
                }
            }
        }
    }

    None
}

/// Decode a PDF text string: UTF-16BE when it leads with a BOM, otherwise
/// one byte per character (PDFDocEncoding, approximated as Latin-1).
fn decode_text(bytes: &[u8]) -> String {
    if let [0xFE, 0xFF, rest @ ..] = bytes {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        bytes.iter().map(|&b| b as char).collect()
    }
}
