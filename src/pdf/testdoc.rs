//! Builders for small in-memory PDFs used across the test modules: a page
//! tree whose content streams carry a recognizable per-page marker, plus an
//! optional bookmark tree wired up with Dest arrays.

use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;
use tempfile::NamedTempFile;

/// A document with `n` pages whose content stream is `Page {i}` (1-based).
pub(crate) fn doc_with_pages(n: u32) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids: Vec<Object> = Vec::new();
    for i in 1..=n {
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            format!("Page {}", i).into_bytes(),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

/// The per-page markers of `doc`, in page order.
pub(crate) fn page_markers(doc: &Document) -> Vec<String> {
    doc.get_pages()
        .into_iter()
        .map(|(_, id)| {
            String::from_utf8_lossy(&doc.get_page_content(id).expect("page content"))
                .into_owned()
        })
        .collect()
}

pub(crate) fn save_to_temp(mut doc: Document) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    doc.save_to(file.as_file_mut()).expect("save test PDF");
    file
}

pub(crate) struct Bookmark {
    pub title: &'static str,
    /// 0-based destination page; `None` wires up a dangling reference.
    pub page: Option<u32>,
    pub children: Vec<Bookmark>,
}

impl Bookmark {
    pub(crate) fn new(title: &'static str, page: Option<u32>) -> Self {
        Bookmark {
            title,
            page,
            children: Vec::new(),
        }
    }

    pub(crate) fn with_children(mut self, children: Vec<Bookmark>) -> Self {
        self.children = children;
        self
    }
}

/// Attach a bookmark tree to an already-built document.
pub(crate) fn attach_outline(doc: &mut Document, items: &[Bookmark]) {
    let page_ids: HashMap<u32, ObjectId> = doc
        .get_pages()
        .into_iter()
        .map(|(num, id)| (num - 1, id))
        .collect();

    let outlines_id = doc.new_object_id();
    let (first, last) = insert_items(doc, items, outlines_id, &page_ids);
    doc.objects.insert(
        outlines_id,
        Object::Dictionary(dictionary! {
            "Type" => "Outlines",
            "First" => first,
            "Last" => last,
        }),
    );

    let root_id = doc
        .trailer
        .get(b"Root")
        .expect("trailer Root")
        .as_reference()
        .expect("Root reference");
    doc.get_object_mut(root_id)
        .expect("catalog")
        .as_dict_mut()
        .expect("catalog dictionary")
        .set("Outlines", outlines_id);
}

fn insert_items(
    doc: &mut Document,
    items: &[Bookmark],
    parent: ObjectId,
    page_ids: &HashMap<u32, ObjectId>,
) -> (ObjectId, ObjectId) {
    assert!(!items.is_empty(), "outline level must have at least one item");

    let mut ids = Vec::new();
    for bm in items {
        let id = doc.new_object_id();
        let mut dict = dictionary! {
            "Title" => Object::string_literal(bm.title),
            "Parent" => parent,
        };

        let target: ObjectId = match bm.page {
            Some(p) => page_ids[&p],
            None => (9999, 0),
        };
        dict.set("Dest", Object::Array(vec![target.into(), "Fit".into()]));

        if !bm.children.is_empty() {
            let (first, last) = insert_items(doc, &bm.children, id, page_ids);
            dict.set("First", first);
            dict.set("Last", last);
        }

        doc.objects.insert(id, Object::Dictionary(dict));
        ids.push(id);
    }

    for pair in ids.windows(2) {
        set_key(doc, pair[0], "Next", pair[1]);
        set_key(doc, pair[1], "Prev", pair[0]);
    }

    (ids[0], *ids.last().expect("non-empty level"))
}

fn set_key(doc: &mut Document, id: ObjectId, key: &str, value: ObjectId) {
    doc.get_object_mut(id)
        .expect("outline item")
        .as_dict_mut()
        .expect("outline dictionary")
        .set(key, value);
}
