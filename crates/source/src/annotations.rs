use crate::error::SourceError;
use genreport_types::FindingRecord;
use genreport_types::finding::lenient_f64;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Placeholder phenotype used when a record has none.
pub const MISSING_PHENOTYPE: &str = "N/D";

/// Lookup key of the annotation store: (rsID, genotype, phenotype label).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnnotationKey {
    pub rsid: String,
    pub genotype: String,
    pub phenotype: String,
}

impl AnnotationKey {
    pub fn new(rsid: &str, genotype: &str, phenotype: &str) -> Self {
        let phenotype = phenotype.trim();
        Self {
            rsid: rsid.trim().to_string(),
            genotype: genotype.trim().to_string(),
            phenotype: if phenotype.is_empty() {
                MISSING_PHENOTYPE.to_string()
            } else {
                phenotype.to_string()
            },
        }
    }

    pub fn for_record(record: &FindingRecord) -> Self {
        Self::new(&record.rsid, &record.genotype, &record.phenotype)
    }
}

/// Auxiliary per-variant text and national frequency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub frequency_percent: Option<f64>,
}

pub trait AnnotationStore: Send + Sync {
    fn lookup(&self, key: &AnnotationKey) -> Option<Annotation>;
}

/// An annotation store with no entries.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAnnotations;

impl AnnotationStore for NoAnnotations {
    fn lookup(&self, _key: &AnnotationKey) -> Option<Annotation> {
        None
    }
}

#[derive(Deserialize)]
struct AnnotationRow {
    rsid: String,
    genotype: String,
    #[serde(default)]
    phenotype: String,
    #[serde(flatten)]
    annotation: Annotation,
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryAnnotations {
    entries: HashMap<AnnotationKey, Annotation>,
}

impl InMemoryAnnotations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: AnnotationKey, annotation: Annotation) {
        self.entries.insert(key, annotation);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Loads a JSON array of `{rsid, genotype, phenotype, description, frequency_percent}` rows.
    pub fn from_file(path: &Path) -> Result<Self, SourceError> {
        let text = fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let rows: Vec<AnnotationRow> = serde_json::from_str(&text).map_err(|source| {
            SourceError::Json { path: path.to_path_buf(), source }
        })?;
        let mut store = Self::new();
        for row in rows {
            let key = AnnotationKey::new(&row.rsid, &row.genotype, &row.phenotype);
            store.insert(key, row.annotation);
        }
        log::info!("Loaded {} annotations from '{}'", store.len(), path.display());
        Ok(store)
    }
}

impl AnnotationStore for InMemoryAnnotations {
    fn lookup(&self, key: &AnnotationKey) -> Option<Annotation> {
        self.entries.get(key).cloned()
    }
}
