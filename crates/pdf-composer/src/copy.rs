//! Deep copy of pages between documents.

use crate::error::ComposerError;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::HashMap;

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"MediaBox", b"Resources", b"CropBox", b"Rotate"];

/// Guards the parent walk against malformed, cyclic page trees.
const MAX_TREE_DEPTH: usize = 64;

/// A helper struct to manage the state of copying objects between documents.
struct ObjectCopier<'a> {
    source_doc: &'a Document,
    target_doc: &'a mut Document,
    id_map: HashMap<ObjectId, ObjectId>,
}

impl<'a> ObjectCopier<'a> {
    fn new(source_doc: &'a Document, target_doc: &'a mut Document) -> Self {
        Self { source_doc, target_doc, id_map: HashMap::new() }
    }

    /// Allocates a target id for `source_id` without copying anything yet.
    /// References to a reserved object resolve to the reserved id.
    fn reserve(&mut self, source_id: ObjectId) -> ObjectId {
        if let Some(target_id) = self.id_map.get(&source_id) {
            return *target_id;
        }
        let new_id = self.target_doc.add_object(Object::Null);
        self.id_map.insert(source_id, new_id);
        new_id
    }

    /// Deep copies an object from the source document, copying everything it
    /// references exactly once.
    fn copy_object(&mut self, source_id: ObjectId) -> Result<ObjectId, lopdf::Error> {
        if let Some(target_id) = self.id_map.get(&source_id) {
            return Ok(*target_id);
        }

        // Registered before recursing so cyclic references terminate.
        let new_id = self.reserve(source_id);
        let obj = self.source_doc.get_object(source_id)?.clone();
        self.fill(new_id, obj)?;
        Ok(new_id)
    }

    /// Remaps `obj` and stores it under the already reserved `target_id`.
    fn fill(&mut self, target_id: ObjectId, obj: Object) -> Result<(), lopdf::Error> {
        let new_obj = self.remap_references(obj)?;
        match self.target_doc.objects.get_mut(&target_id) {
            Some(slot) => {
                *slot = new_obj;
                Ok(())
            }
            None => Err(lopdf::Error::ObjectNotFound(target_id)),
        }
    }

    /// Replaces every `Object::Reference` with the id of its copy.
    fn remap_references(&mut self, obj: Object) -> Result<Object, lopdf::Error> {
        match obj {
            Object::Reference(id) => Ok(Object::Reference(self.copy_object(id)?)),
            Object::Array(arr) => {
                let new_arr = arr
                    .into_iter()
                    .map(|o| self.remap_references(o))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Object::Array(new_arr))
            }
            Object::Dictionary(mut dict) => {
                for (_, value) in dict.iter_mut() {
                    *value = self.remap_references(value.clone())?;
                }
                Ok(Object::Dictionary(dict))
            }
            Object::Stream(mut stream) => {
                for (_, value) in stream.dict.iter_mut() {
                    *value = self.remap_references(value.clone())?;
                }
                Ok(Object::Stream(stream))
            }
            _ => Ok(obj),
        }
    }
}

/// Copies inherited attributes from the page's ancestors onto the page itself.
fn materialize_inherited(source: &Document, page: &mut Dictionary) -> Result<(), lopdf::Error> {
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;
    while let Some(parent_id) = parent {
        if depth == MAX_TREE_DEPTH {
            break;
        }
        let node = source.get_dictionary(parent_id)?;
        for key in INHERITABLE {
            if !page.has(key) {
                if let Ok(value) = node.get(key) {
                    page.set(key, value.clone());
                }
            }
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
    }
    Ok(())
}

/// Copies every page of `source` into `target`, in page order, and returns
/// the new page ids. Each copied page is self-contained: inherited attributes
/// are materialized and `Parent` points at `parent_id`. The source page tree
/// itself is never copied.
pub fn append_pages(
    target: &mut Document,
    parent_id: ObjectId,
    source: &Document,
) -> Result<Vec<ObjectId>, ComposerError> {
    let source_pages: Vec<ObjectId> = source.get_pages().into_values().collect();
    if source_pages.is_empty() {
        return Ok(Vec::new());
    }

    let mut copier = ObjectCopier::new(source, target);
    // Reserve all pages first so links between them stay inside the copy.
    let new_ids: Vec<ObjectId> = source_pages.iter().map(|id| copier.reserve(*id)).collect();

    for (source_id, new_id) in source_pages.iter().zip(&new_ids) {
        let mut page = source.get_dictionary(*source_id)?.clone();
        materialize_inherited(source, &mut page)?;
        page.remove(b"Parent");
        copier.fill(*new_id, Object::Dictionary(page))?;
    }

    for page_id in &new_ids {
        if let Ok(Object::Dictionary(page_dict)) = target.get_object_mut(*page_id) {
            page_dict.set("Parent", Object::Reference(parent_id));
        }
    }

    Ok(new_ids)
}
