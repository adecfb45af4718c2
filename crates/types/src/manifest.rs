//! The renderer's manifest: which section files were produced, in what
//! order, and which table-of-contents rows point where.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// The logical identity of a generated section file.
///
/// Roles are inferred from the file name suffix (`_intro`, `_reporte`,
/// `_ancestria`, `_cierre`, `_indice`, `_section_<tag>`) unless the manifest
/// names one explicitly.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    TableOfContents,
    Intro,
    Report,
    Ancestry,
    Section(String),
    Closing,
}

impl Role {
    /// Infers the role of a section file from its name. Returns `None` for
    /// files that are not link targets (cover, summary pages, detail pages).
    pub fn infer_from_path(path: &Path) -> Option<Role> {
        let stem = path.file_stem()?.to_string_lossy();
        if let Some(idx) = stem.rfind("_section_") {
            let key = &stem[idx + "_section_".len()..];
            return (!key.is_empty()).then(|| Role::Section(key.to_ascii_lowercase()));
        }
        const SUFFIXES: [(&str, Role); 5] = [
            ("_intro", Role::Intro),
            ("_reporte", Role::Report),
            ("_ancestria", Role::Ancestry),
            ("_cierre", Role::Closing),
            ("_indice", Role::TableOfContents),
        ];
        SUFFIXES
            .into_iter()
            .find(|(suffix, _)| stem.ends_with(suffix))
            .map(|(_, role)| role)
    }

    /// Parses a TOC target name. Accepts the canonical names, their Spanish
    /// file-suffix spellings, and `section-<tag>` / `section_<tag>`.
    pub fn from_target(target: &str) -> Option<Role> {
        let target = target.trim().to_ascii_lowercase();
        if let Some(key) = target
            .strip_prefix("section-")
            .or_else(|| target.strip_prefix("section_"))
        {
            return (!key.is_empty()).then(|| Role::Section(key.to_string()));
        }
        match target.as_str() {
            "intro" => Some(Role::Intro),
            "report" | "reporte" => Some(Role::Report),
            "ancestry" | "ancestria" => Some(Role::Ancestry),
            "closing" | "cierre" => Some(Role::Closing),
            "indice" | "index" | "toc" => Some(Role::TableOfContents),
            _ => None,
        }
    }

    /// Canonical target name, as the renderer writes it in `tocEntries`.
    pub fn target_name(&self) -> String {
        match self {
            Role::TableOfContents => "indice".to_string(),
            Role::Intro => "intro".to_string(),
            Role::Report => "report".to_string(),
            Role::Ancestry => "ancestry".to_string(),
            Role::Section(key) => format!("section-{key}"),
            Role::Closing => "closing".to_string(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.target_name())
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Role::from_target(&value).ok_or_else(|| format!("unknown section role '{value}'"))
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.target_name()
    }
}

/// One generated section file. The role is explicit when the renderer
/// provides it and inferred from the file name otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawManifestFile")]
pub struct ManifestFile {
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl ManifestFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), role: None }
    }

    pub fn with_role(path: impl Into<PathBuf>, role: Role) -> Self {
        Self { path: path.into(), role: Some(role) }
    }

    pub fn resolved_role(&self) -> Option<Role> {
        self.role
            .clone()
            .or_else(|| Role::infer_from_path(&self.path))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawManifestFile {
    Path(PathBuf),
    Entry {
        path: PathBuf,
        #[serde(default)]
        role: Option<Role>,
    },
}

impl From<RawManifestFile> for ManifestFile {
    fn from(raw: RawManifestFile) -> Self {
        match raw {
            RawManifestFile::Path(path) => ManifestFile { path, role: None },
            RawManifestFile::Entry { path, role } => ManifestFile { path, role },
        }
    }
}

/// One row of the table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TocEntry {
    /// Row position on the TOC page. When the renderer omits it, the entry's
    /// position in the list is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_index: Option<usize>,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl TocEntry {
    pub fn new(row_index: usize, target: impl Into<String>) -> Self {
        Self {
            row_index: Some(row_index),
            target: target.into(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_id: Option<String>,
    pub files: Vec<ManifestFile>,
    #[serde(default)]
    pub toc_entries: Vec<TocEntry>,
}

impl ManifestReport {
    /// TOC entries paired with their effective row index.
    pub fn toc_rows(&self) -> impl Iterator<Item = (usize, &TocEntry)> {
        self.toc_entries
            .iter()
            .enumerate()
            .map(|(position, entry)| (entry.row_index.unwrap_or(position), entry))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub reports: Vec<ManifestReport>,
}

impl Manifest {
    /// The report this pipeline compiles. Renderer runs are single-subject.
    pub fn primary(&self) -> Option<&ManifestReport> {
        self.reports.first()
    }

    pub fn into_primary(self) -> Option<ManifestReport> {
        self.reports.into_iter().next()
    }

    /// Makes relative file paths relative to `base` (the manifest's directory).
    pub fn resolve_relative(&mut self, base: &Path) {
        for file in self.reports.iter_mut().flat_map(|r| r.files.iter_mut()) {
            if file.path.is_relative() {
                file.path = base.join(&file.path);
            }
        }
    }
}
