use super::config::CompilerConfig;
use super::orchestrator::ReportCompiler;
use crate::renderer::SectionRenderer;
use genreport_aggregate::Aggregator;
use genreport_pdf_composer::TocLayout;
use genreport_source::{AnnotationStore, NoAnnotations};
use std::path::PathBuf;
use std::sync::Arc;

/// A builder for creating a `ReportCompiler`.
pub struct ReportCompilerBuilder<R> {
    renderer: R,
    config: CompilerConfig,
    annotations: Arc<dyn AnnotationStore>,
}

impl<R: SectionRenderer> ReportCompilerBuilder<R> {
    /// Starts from default settings and an empty annotation store.
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            config: CompilerConfig::default(),
            annotations: Arc::new(NoAnnotations),
        }
    }

    /// Replaces all settings. Renderer settings in `config` only matter for
    /// compilers built with `ReportCompiler::from_config`.
    pub fn with_config(mut self, config: CompilerConfig) -> Self { self.config = config; self }

    /// Sets the store used to resolve finding descriptions and national frequencies.
    pub fn with_annotations(mut self, annotations: Arc<dyn AnnotationStore>) -> Self { self.annotations = annotations; self }

    pub fn with_indigenous_country(mut self, country: impl Into<String>) -> Self { self.config.indigenous_country = country.into(); self }

    pub fn with_ancestry_top_n(mut self, top_n: usize) -> Self { self.config.ancestry_top_n = top_n; self }

    pub fn with_toc_layout(mut self, layout: TocLayout) -> Self { self.config.toc_layout = layout; self }

    /// Creates per-request workspaces under `dir` instead of the system temp dir.
    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self { self.config.work_dir = Some(dir.into()); self }

    pub fn build(self) -> ReportCompiler<R> {
        let aggregator = Aggregator::new(self.config.aggregator_config(), self.annotations);
        ReportCompiler::new(self.renderer, aggregator, self.config.toc_layout, self.config.work_dir)
    }
}
