//! Clickable table-of-contents rows.

use crate::merge::MergedDocument;
use genreport_types::{Rect, TocEntry};
use log::{debug, info, warn};
use lopdf::{Object, ObjectId, dictionary};
use serde::{Deserialize, Serialize};

/// Points per millimetre.
pub const MM_TO_PT: f32 = 72.0 / 25.4;

/// Row geometry of the renderer's TOC page, in millimetres from the top-left
/// corner of an A4 page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TocLayout {
    pub page_width: f32,
    pub page_height: f32,
    pub top: f32,
    pub row_height: f32,
    pub row_gap: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    /// Layout units to PDF points.
    pub scale: f32,
}

impl Default for TocLayout {
    fn default() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            top: 60.0,
            row_height: 10.0,
            row_gap: 2.0,
            margin_left: 18.0,
            margin_right: 18.0,
            scale: MM_TO_PT,
        }
    }
}

impl TocLayout {
    /// The band row `row` occupies, in layout units with a top-left origin.
    pub fn row_band(&self, row: usize) -> Rect {
        let top = self.top + row as f32 * (self.row_height + self.row_gap);
        Rect::new(
            self.margin_left,
            top,
            self.page_width - self.margin_left - self.margin_right,
            self.row_height,
        )
    }

    /// The row band as a PDF `Rect` array `[llx lly urx ury]` in points,
    /// with the vertical axis flipped to a bottom-left origin.
    pub fn pdf_rect(&self, row: usize) -> [f32; 4] {
        let band = self.row_band(row);
        [
            band.x * self.scale,
            (self.page_height - band.bottom()) * self.scale,
            band.right() * self.scale,
            (self.page_height - band.y) * self.scale,
        ]
    }
}

/// Existing annotations of a page, whether inline or behind a reference.
fn existing_annots(merged: &MergedDocument, page_id: ObjectId) -> Vec<Object> {
    let Ok(page) = merged.document.get_dictionary(page_id) else {
        return Vec::new();
    };
    match page.get(b"Annots") {
        Ok(Object::Array(items)) => items.clone(),
        Ok(Object::Reference(id)) => merged
            .document
            .get_object(*id)
            .and_then(Object::as_array)
            .cloned()
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// Adds one invisible link per TOC row whose target resolved to a page.
///
/// Rows are `(row index, entry)` pairs. Unresolved targets are skipped, and
/// nothing is added when the document has no TOC page. Returns the number of
/// annotations added.
pub fn annotate_toc<'a, I>(merged: &mut MergedDocument, rows: I, layout: &TocLayout) -> usize
where
    I: IntoIterator<Item = (usize, &'a TocEntry)>,
{
    let Some(toc_index) = merged.toc_page() else {
        info!("[TOC] No table-of-contents page in document, links skipped.");
        return 0;
    };
    let Some(toc_page_id) = merged.page_id(toc_index) else {
        warn!("[TOC] Table-of-contents page {} is out of range.", toc_index);
        return 0;
    };

    let mut new_annots = Vec::new();
    for (row, entry) in rows {
        let Some(target_page_id) = merged
            .resolve_target(&entry.target)
            .and_then(|index| merged.page_id(index))
        else {
            debug!("[TOC] Target '{}' has no page, row {} left unlinked.", entry.target, row);
            continue;
        };

        let [llx, lly, urx, ury] = layout.pdf_rect(row);
        let action = dictionary! {
            "Type" => "Action",
            "S" => "GoTo",
            "D" => vec![Object::Reference(target_page_id), "Fit".into()],
        };
        let action_id = merged.document.add_object(action);
        let annot = dictionary! {
            "Type" => "Annot",
            "Subtype" => "Link",
            "Rect" => vec![llx.into(), lly.into(), urx.into(), ury.into()],
            "Border" => vec![0.into(), 0.into(), 0.into()],
            "A" => action_id,
        };
        new_annots.push(Object::Reference(merged.document.add_object(annot)));
    }

    let added = new_annots.len();
    if added == 0 {
        return 0;
    }

    let mut annots = existing_annots(merged, toc_page_id);
    annots.extend(new_annots);
    if let Ok(Object::Dictionary(page_dict)) = merged.document.get_object_mut(toc_page_id) {
        page_dict.set("Annots", Object::Array(annots));
    }
    info!("[TOC] Added {} links to table-of-contents page {}.", added, toc_index);
    added
}
