//! Concatenates the renderer's section files into one document.

use crate::copy::append_pages;
use crate::error::ComposerError;
use genreport_types::{ManifestFile, ManifestReport, Role};
use log::{debug, info};
use lopdf::{Document, Object, ObjectId, dictionary};
use std::collections::BTreeMap;
use std::path::Path;

/// The merged report plus where each link target starts.
///
/// Page indexes are 0-based positions in the merged page sequence.
#[derive(Debug)]
pub struct MergedDocument {
    pub document: Document,
    pub role_pages: BTreeMap<Role, usize>,
    page_ids: Vec<ObjectId>,
}

impl MergedDocument {
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    pub fn page_id(&self, index: usize) -> Option<ObjectId> {
        self.page_ids.get(index).copied()
    }

    pub fn page_of(&self, role: &Role) -> Option<usize> {
        self.role_pages.get(role).copied()
    }

    /// Resolves a TOC target name (any accepted spelling) to its start page.
    pub fn resolve_target(&self, target: &str) -> Option<usize> {
        Role::from_target(target).and_then(|role| self.page_of(&role))
    }

    /// The table-of-contents page, if the manifest had one.
    pub fn toc_page(&self) -> Option<usize> {
        self.page_of(&Role::TableOfContents)
    }

    pub fn catalog_id(&self) -> Result<ObjectId, ComposerError> {
        Ok(self.document.trailer.get(b"Root")?.as_reference()?)
    }

    pub fn to_bytes(&mut self) -> Result<Vec<u8>, ComposerError> {
        let mut buffer = Vec::new();
        self.document.save_to(&mut buffer)?;
        Ok(buffer)
    }
}

fn load_section(path: &Path) -> Result<Document, ComposerError> {
    if !path.is_file() {
        return Err(ComposerError::MissingFile { path: path.to_path_buf() });
    }
    Document::load(path).map_err(|source| ComposerError::Load {
        path: path.to_path_buf(),
        source,
    })
}

/// Merges section files strictly in the given order.
///
/// The first file seen for a role fixes that role's start page; later files
/// with the same role only contribute pages. Any unreadable file aborts the
/// whole merge.
pub fn merge_files<'a, I>(files: I) -> Result<MergedDocument, ComposerError>
where
    I: IntoIterator<Item = &'a ManifestFile>,
{
    let mut document = Document::with_version("1.7");
    let pages_id = document.new_object_id();
    let mut page_ids: Vec<ObjectId> = Vec::new();
    let mut role_pages = BTreeMap::new();
    let mut file_count = 0usize;

    for file in files {
        let section = load_section(&file.path)?;
        let start = page_ids.len();
        let copied = append_pages(&mut document, pages_id, &section)?;
        debug!(
            "[MERGE] '{}' contributed {} pages at index {}",
            file.path.display(),
            copied.len(),
            start
        );
        if let Some(role) = file.resolved_role() {
            role_pages.entry(role).or_insert(start);
        }
        page_ids.extend(copied);
        file_count += 1;
    }

    let kids: Vec<Object> = page_ids.iter().copied().map(Object::Reference).collect();
    document.objects.insert(
        pages_id,
        dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_ids.len() as i64,
        }
        .into(),
    );
    let catalog_id = document.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    document.trailer.set("Root", catalog_id);

    info!(
        "[MERGE] Merged {} files into {} pages ({} link targets)",
        file_count,
        page_ids.len(),
        role_pages.len()
    );

    Ok(MergedDocument { document, role_pages, page_ids })
}

/// Merges every file a manifest report lists. An empty file list is an error.
pub fn merge_manifest(report: &ManifestReport) -> Result<MergedDocument, ComposerError> {
    if report.files.is_empty() {
        return Err(ComposerError::EmptyManifest);
    }
    merge_files(&report.files)
}
