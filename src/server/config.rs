use crate::pipeline::environment;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings of the HTTP surface.
///
/// Loaded from `GENREPORT_BIND`, `GENREPORT_DATA_DIR`, `GENREPORT_ANNOTATIONS`
/// and `GENREPORT_IDENTITY_HEADER`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    /// Directory of `<user_id>.json` subject files.
    pub data_dir: PathBuf,
    /// Optional JSON annotation table.
    pub annotations: Option<PathBuf>,
    /// Header carrying the authenticated user id, set by the fronting gateway.
    pub identity_header: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
            data_dir: PathBuf::from("data/subjects"),
            annotations: None,
            identity_header: "x-user-id".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_environment(environment(None))
    }

    pub(crate) fn from_environment(env: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(env)
            .build()?
            .try_deserialize()
    }
}
