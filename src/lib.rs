//! # genreport
//!
//! Genetic report compilation: aggregate a user's findings, have an external
//! renderer draw the sections, merge them into one PDF and link its table of
//! contents.
//!
//! - **pipeline**: Orchestration, configuration and per-request workspaces
//! - **renderer**: The section renderer seam and its subprocess implementation
//! - **server**: The authenticated download endpoint
//! - **error**: Error types for the pipeline
//!
//! The foundation crates are re-exported: `genreport_types` (data model),
//! `genreport_source` (stores), `genreport_aggregate` (payload building) and
//! `genreport_pdf_composer` (merge and annotation).

pub use genreport_aggregate as aggregate;
pub use genreport_pdf_composer as composer;
pub use genreport_source as source;
pub use genreport_types as types;

pub mod error;
pub mod pipeline;
pub mod renderer;
pub mod server;

pub use error::{PipelineError, RenderError};
pub use pipeline::{
    AssembledReport, CompiledReport, CompilerConfig, ReportCompiler, ReportCompilerBuilder,
    assemble,
};
pub use renderer::{RenderJob, SectionRenderer, SubprocessRenderer};
pub use server::{AppState, ServerConfig, router, serve};

pub use genreport_aggregate::{Aggregator, AggregatorConfig};
pub use genreport_pdf_composer::TocLayout;
pub use genreport_source::{
    FindingSource, FindingStore, InMemoryAnnotations, JsonDirectoryStore, Subject, SubjectRecord,
};
pub use genreport_types::{Manifest, ManifestReport, ReportPayload, Role, TocEntry};
