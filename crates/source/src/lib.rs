//! Store abstractions for the report pipeline.
//!
//! The finding store and the annotation store live outside this system; the
//! pipeline only sees them through the traits defined here.
//!
//! ## Available Sources
//!
//! - `VecFindingSource`: In-memory list of records
//! - `JsonDirectoryStore`: One JSON subject file per user
//! - `InMemoryAnnotations`: Annotation table keyed by (rsID, genotype, phenotype)
//!
//! ## Example
//!
//! ```ignore
//! use genreport_source::{FindingSource, VecFindingSource};
//!
//! let mut source = VecFindingSource::new(records);
//! while let Some(record) = source.next_record() {
//!     println!("Processing: {}", record.rsid);
//! }
//! ```

mod annotations;
mod error;
mod store;

pub use annotations::{Annotation, AnnotationKey, AnnotationStore, InMemoryAnnotations, NoAnnotations};
pub use error::SourceError;
pub use store::{FindingStore, InMemoryFindingStore, JsonDirectoryStore, Subject, SubjectRecord};

use genreport_types::FindingRecord;

/// A trait for sources that feed finding records into the aggregator.
///
/// Records arrive in no particular order; consumers must not depend on it.
pub trait FindingSource: Send {
    /// Get the next record, if available.
    ///
    /// Returns `None` when the source is exhausted.
    fn next_record(&mut self) -> Option<FindingRecord>;

    /// Hint about the total number of records (for logging and allocation).
    ///
    /// Returns `None` if the size is unknown.
    fn size_hint(&self) -> Option<usize> {
        None
    }
}

/// A source backed by an in-memory vector of records.
pub struct VecFindingSource {
    records: std::vec::IntoIter<FindingRecord>,
    len: usize,
}

impl VecFindingSource {
    pub fn new(records: Vec<FindingRecord>) -> Self {
        let len = records.len();
        Self { records: records.into_iter(), len }
    }

    /// Get the total number of records.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl FindingSource for VecFindingSource {
    fn next_record(&mut self) -> Option<FindingRecord> {
        self.records.next()
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.len)
    }
}
