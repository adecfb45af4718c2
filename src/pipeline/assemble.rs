use genreport_pdf_composer::{
    ComposerError, TocLayout, add_outline, annotate_toc, merge_manifest,
};
use genreport_types::{ManifestReport, Role};
use log::info;
use std::collections::BTreeMap;

/// A finished document and how it was put together.
#[derive(Debug, Clone)]
pub struct AssembledReport {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub role_pages: BTreeMap<Role, usize>,
    pub links: usize,
    pub bookmarks: usize,
}

/// Merges the manifest's files, links the TOC rows, adds bookmarks and
/// serializes the result. Blocking; run it off the async runtime.
pub fn assemble(report: &ManifestReport, layout: &TocLayout) -> Result<AssembledReport, ComposerError> {
    let mut merged = merge_manifest(report)?;
    let links = annotate_toc(&mut merged, report.toc_rows(), layout);
    let bookmarks = add_outline(&mut merged, &report.toc_entries)?;
    let bytes = merged.to_bytes()?;
    info!(
        "[PIPELINE] Assembled {} pages, {} TOC links, {} bookmarks ({} bytes)",
        merged.page_count(),
        links,
        bookmarks,
        bytes.len()
    );
    Ok(AssembledReport {
        bytes,
        page_count: merged.page_count(),
        role_pages: merged.role_pages,
        links,
        bookmarks,
    })
}
