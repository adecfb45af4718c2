use lopdf::{Document as LopdfDocument, Object, ObjectId};
use std::collections::BTreeMap;

/// Information about a link annotation
#[derive(Debug, Clone, PartialEq)]
pub struct LinkAnnotation {
    /// 0-based page the annotation sits on
    pub page: usize,
    pub rect: Option<[f32; 4]>,
    pub is_internal: bool,
    /// 0-based page the link jumps to
    pub target_page: Option<usize>,
}

/// 0-based page index keyed by page object id.
pub fn page_indexes(doc: &LopdfDocument) -> BTreeMap<ObjectId, usize> {
    doc.get_pages()
        .into_iter()
        .map(|(number, id)| (id, number as usize - 1))
        .collect()
}

fn resolve<'a>(doc: &'a LopdfDocument, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

/// Extract link annotations from PDF pages
pub fn extract_link_annotations(doc: &LopdfDocument) -> Vec<LinkAnnotation> {
    let indexes = page_indexes(doc);
    let mut annotations = Vec::new();

    for (page_id, page) in &indexes {
        let Ok(page_dict) = doc.get_dictionary(*page_id) else {
            continue;
        };
        let Some(annots) = page_dict
            .get(b"Annots")
            .ok()
            .and_then(|a| resolve(doc, a))
            .and_then(|a| a.as_array().ok())
        else {
            continue;
        };

        for annot in annots {
            let Some(annot_dict) = resolve(doc, annot).and_then(|a| a.as_dict().ok()) else {
                continue;
            };
            if annot_dict.get(b"Subtype").and_then(Object::as_name).ok() != Some(b"Link".as_slice()) {
                continue;
            }

            let action = annot_dict
                .get(b"A")
                .ok()
                .and_then(|a| resolve(doc, a))
                .and_then(|a| a.as_dict().ok());
            let is_internal = action
                .and_then(|a| a.get(b"S").and_then(Object::as_name).ok())
                .is_some_and(|s| s == b"GoTo");
            let target_page = action
                .and_then(|a| a.get(b"D").and_then(Object::as_array).ok())
                .and_then(|dest| dest.first())
                .and_then(|first| first.as_reference().ok())
                .and_then(|id| indexes.get(&id).copied());

            let rect = annot_dict
                .get(b"Rect")
                .and_then(Object::as_array)
                .ok()
                .filter(|arr| arr.len() >= 4)
                .map(|arr| {
                    [
                        arr[0].as_float().unwrap_or(0.0),
                        arr[1].as_float().unwrap_or(0.0),
                        arr[2].as_float().unwrap_or(0.0),
                        arr[3].as_float().unwrap_or(0.0),
                    ]
                });

            annotations.push(LinkAnnotation { page: *page, rect, is_internal, target_page });
        }
    }

    annotations
}

/// Count internal links (GoTo actions)
pub fn count_internal_links(doc: &LopdfDocument) -> usize {
    extract_link_annotations(doc)
        .iter()
        .filter(|link| link.is_internal)
        .count()
}

/// Number of top-level bookmarks the catalog's outline declares.
pub fn outline_count(doc: &LopdfDocument) -> usize {
    doc.catalog()
        .ok()
        .and_then(|catalog| catalog.get(b"Outlines").ok())
        .and_then(|o| o.as_reference().ok())
        .and_then(|id| doc.get_dictionary(id).ok())
        .and_then(|outlines| outlines.get(b"Count").ok())
        .and_then(|count| count.as_i64().ok())
        .map_or(0, |count| count as usize)
}

/// Asserts two floats are equal within PDF number precision.
pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 0.01,
        "expected {expected}, got {actual}"
    );
}
