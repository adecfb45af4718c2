//! Document bookmarks for labelled TOC entries.

use crate::error::ComposerError;
use crate::merge::MergedDocument;
use genreport_types::TocEntry;
use log::info;
use lopdf::{Object, ObjectId, StringFormat, dictionary};

/// Encodes a PDF text string: ASCII as a literal, anything else as UTF-16BE
/// with a byte-order mark.
pub fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::String(text.as_bytes().to_vec(), StringFormat::Literal);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// Adds a flat outline with one bookmark per labelled entry whose target
/// resolved to a page. Returns the number of bookmarks.
pub fn add_outline<'a, I>(merged: &mut MergedDocument, entries: I) -> Result<usize, ComposerError>
where
    I: IntoIterator<Item = &'a TocEntry>,
{
    let resolved: Vec<(&str, ObjectId)> = entries
        .into_iter()
        .filter_map(|entry| {
            let label = entry.label.as_deref().map(str::trim).filter(|l| !l.is_empty())?;
            let page_id = merged
                .resolve_target(&entry.target)
                .and_then(|index| merged.page_id(index))?;
            Some((label, page_id))
        })
        .collect();
    let items: Vec<(ObjectId, &str, ObjectId)> = resolved
        .into_iter()
        .map(|(label, page_id)| (merged.document.new_object_id(), label, page_id))
        .collect();

    let (Some(first), Some(last)) = (items.first(), items.last()) else {
        return Ok(0);
    };

    let outline_root_id = merged.document.add_object(dictionary! {
        "Type" => "Outlines",
        "First" => Object::Reference(first.0),
        "Last" => Object::Reference(last.0),
        "Count" => items.len() as i64,
    });

    for (i, (id, label, page_id)) in items.iter().enumerate() {
        let mut dict = dictionary! {
            "Title" => text_string(label),
            "Parent" => Object::Reference(outline_root_id),
            "Dest" => vec![Object::Reference(*page_id), "Fit".into()],
        };
        if i > 0 {
            dict.set("Prev", Object::Reference(items[i - 1].0));
        }
        if i + 1 < items.len() {
            dict.set("Next", Object::Reference(items[i + 1].0));
        }
        merged.document.objects.insert(*id, dict.into());
    }

    let root_id = merged.catalog_id()?;
    if let Ok(Object::Dictionary(root_dict)) = merged.document.get_object_mut(root_id) {
        root_dict.set("Outlines", outline_root_id);
        root_dict.set("PageMode", "UseOutlines");
    }
    info!("[OUTLINE] Added {} bookmarks.", items.len());
    Ok(items.len())
}
