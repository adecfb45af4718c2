//! Newtype wrapper for the report identifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// The stable identifier printed on the report and used to name its files.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportId(Arc<str>);

impl ReportId {
    /// Creates a new ReportId from a string
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation of this report ID
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The identifier reduced to `[A-Za-z0-9_-]`, safe for file names.
    /// Falls back to `report` when nothing survives.
    pub fn file_segment(&self) -> String {
        let cleaned: String = self
            .0
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
            .collect();
        if cleaned.is_empty() {
            "report".to_string()
        } else {
            cleaned
        }
    }
}

impl From<String> for ReportId {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl From<&str> for ReportId {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl AsRef<str> for ReportId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
