//! Shared data model for report compilation.
//!
//! The types here describe the three artifacts that flow through the
//! pipeline: raw finding records read from storage, the normalized
//! [`ReportPayload`] handed to the section renderer, and the [`Manifest`]
//! the renderer writes back.

pub mod finding;
pub mod geometry;
pub mod ids;
pub mod manifest;
pub mod payload;

pub use finding::{Category, FindingRecord, GeneticFinding, RiskLevel};
pub use geometry::Rect;
pub use ids::ReportId;
pub use manifest::{Manifest, ManifestFile, ManifestReport, Role, TocEntry};
pub use payload::{
    AncestryComponent, CategoryAggregate, IndigenousComponent, RendererInput, ReportPayload,
    ReportSummary, RiskCounts,
};
