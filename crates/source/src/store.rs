use crate::VecFindingSource;
use crate::error::SourceError;
use genreport_types::FindingRecord;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Who a report is about. Carries no findings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub report_id: Option<String>,
    /// Link printed on the closing page.
    #[serde(default)]
    pub link: Option<String>,
}

impl Subject {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self { user_id: user_id.into(), ..Default::default() }
    }
}

/// A subject and all of its findings, as one store read returns them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubjectRecord {
    #[serde(flatten)]
    pub subject: Subject,
    #[serde(default)]
    pub findings: Vec<FindingRecord>,
}

impl SubjectRecord {
    /// Reads a subject file from disk.
    pub fn from_file(path: &Path) -> Result<Self, SourceError> {
        let text = fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| SourceError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn into_parts(self) -> (Subject, VecFindingSource) {
        (self.subject, VecFindingSource::new(self.findings))
    }
}

/// Per-user access to the external finding store.
pub trait FindingStore: Send + Sync {
    /// Loads the subject and its findings. `Ok(None)` means the user is unknown.
    fn load_subject(&self, user_id: &str) -> Result<Option<SubjectRecord>, SourceError>;
}

/// A store that keeps subjects in memory. Useful for tests and the CLI.
#[derive(Debug, Default)]
pub struct InMemoryFindingStore {
    subjects: HashMap<String, SubjectRecord>,
}

impl InMemoryFindingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: SubjectRecord) {
        self.subjects.insert(record.subject.user_id.clone(), record);
    }

    pub fn with_subject(mut self, record: SubjectRecord) -> Self {
        self.insert(record);
        self
    }
}

impl FindingStore for InMemoryFindingStore {
    fn load_subject(&self, user_id: &str) -> Result<Option<SubjectRecord>, SourceError> {
        Ok(self.subjects.get(user_id).cloned())
    }
}

/// A store reading `<root>/<user_id>.json` subject files.
#[derive(Debug, Clone)]
pub struct JsonDirectoryStore {
    root: PathBuf,
}

impl JsonDirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn subject_path(&self, user_id: &str) -> Result<PathBuf, SourceError> {
        let valid = !user_id.is_empty()
            && !user_id.starts_with('.')
            && user_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '@'));
        if !valid {
            return Err(SourceError::InvalidSubject(user_id.to_string()));
        }
        Ok(self.root.join(format!("{user_id}.json")))
    }
}

impl FindingStore for JsonDirectoryStore {
    fn load_subject(&self, user_id: &str) -> Result<Option<SubjectRecord>, SourceError> {
        let path = self.subject_path(user_id)?;
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No subject file at '{}'", path.display());
                return Ok(None);
            }
            Err(source) => return Err(SourceError::Io { path, source }),
        };
        let mut record: SubjectRecord = serde_json::from_str(&text)
            .map_err(|source| SourceError::Json { path: path.clone(), source })?;
        if record.subject.user_id.is_empty() {
            record.subject.user_id = user_id.to_string();
        }
        debug!(
            "Loaded {} findings for '{}' from '{}'",
            record.findings.len(),
            user_id,
            path.display()
        );
        Ok(Some(record))
    }
}
