use crate::renderer::SubprocessRenderer;
use genreport_aggregate::AggregatorConfig;
use genreport_pdf_composer::TocLayout;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Prefix of every environment variable the compiler and server read.
pub const ENV_PREFIX: &str = "GENREPORT";

/// Settings of one report compiler.
///
/// Loaded from `GENREPORT_*` variables: `GENREPORT_RENDERER_PROGRAM`,
/// `GENREPORT_RENDERER_ARGS` (space separated), `GENREPORT_RENDERER_TIMEOUT_SECS`,
/// `GENREPORT_WORK_DIR`, `GENREPORT_INDIGENOUS_COUNTRY`, `GENREPORT_ANCESTRY_TOP_N`
/// and `GENREPORT_TOC_LAYOUT__<FIELD>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub renderer_program: PathBuf,
    pub renderer_args: Vec<String>,
    pub renderer_timeout_secs: u64,
    /// Parent of the per-request temp directories. System temp dir when unset.
    pub work_dir: Option<PathBuf>,
    pub indigenous_country: String,
    pub ancestry_top_n: usize,
    pub toc_layout: TocLayout,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        let aggregator = AggregatorConfig::default();
        Self {
            renderer_program: PathBuf::from("node"),
            renderer_args: vec!["report-generator/generate.js".to_string()],
            renderer_timeout_secs: 300,
            work_dir: None,
            indigenous_country: aggregator.indigenous_country,
            ancestry_top_n: aggregator.ancestry_top_n,
            toc_layout: TocLayout::default(),
        }
    }
}

impl CompilerConfig {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_environment(environment(None))
    }

    pub(crate) fn from_environment(env: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(env)
            .build()?
            .try_deserialize()
    }

    pub fn renderer_timeout(&self) -> Duration {
        Duration::from_secs(self.renderer_timeout_secs)
    }

    pub fn aggregator_config(&self) -> AggregatorConfig {
        AggregatorConfig {
            indigenous_country: self.indigenous_country.clone(),
            ancestry_top_n: self.ancestry_top_n,
        }
    }

    pub fn subprocess_renderer(&self) -> SubprocessRenderer {
        SubprocessRenderer::new(&self.renderer_program)
            .with_args(self.renderer_args.iter().cloned())
            .with_timeout(self.renderer_timeout())
    }
}

/// The `GENREPORT_*` environment source. `source` replaces the process
/// environment when given.
pub(crate) fn environment(source: Option<config::Map<String, String>>) -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(" ")
        .with_list_parse_key("renderer_args")
        .source(source)
}

#[cfg(test)]
pub(crate) fn env_map(pairs: &[(&str, &str)]) -> config::Map<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
