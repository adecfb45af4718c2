use super::assemble::assemble;
use super::builder::ReportCompilerBuilder;
use super::config::CompilerConfig;
use super::workspace::Workspace;
use crate::error::PipelineError;
use crate::renderer::{SectionRenderer, SubprocessRenderer};
use chrono::{DateTime, Utc};
use genreport_aggregate::Aggregator;
use genreport_pdf_composer::TocLayout;
use genreport_source::{AnnotationStore, FindingSource, FindingStore, Subject};
use genreport_types::{ReportId, ReportPayload, Role};
use log::info;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// The compiled report returned to the caller.
#[derive(Debug, Clone)]
pub struct CompiledReport {
    pub report_id: ReportId,
    pub bytes: Vec<u8>,
    pub page_count: usize,
    /// 0-based start page of every link target found in the manifest.
    pub role_pages: BTreeMap<Role, usize>,
    pub links: usize,
    pub bookmarks: usize,
}

impl CompiledReport {
    /// Download file name derived from the report identifier.
    pub fn filename(&self) -> String {
        format!("Reporte_Genetico_{}.pdf", self.report_id.file_segment())
    }
}

/// Runs aggregation, rendering, merge and annotation for one report at a time.
///
/// Each call is independent: it gets its own workspace and shares no mutable
/// state with concurrent calls.
pub struct ReportCompiler<R> {
    renderer: R,
    aggregator: Aggregator,
    toc_layout: TocLayout,
    work_dir: Option<PathBuf>,
}

impl ReportCompiler<SubprocessRenderer> {
    /// A compiler running the renderer program named in `config`.
    pub fn from_config(config: CompilerConfig, annotations: Arc<dyn AnnotationStore>) -> Self {
        ReportCompilerBuilder::new(config.subprocess_renderer())
            .with_config(config)
            .with_annotations(annotations)
            .build()
    }
}

impl<R: SectionRenderer> ReportCompiler<R> {
    pub(crate) fn new(
        renderer: R,
        aggregator: Aggregator,
        toc_layout: TocLayout,
        work_dir: Option<PathBuf>,
    ) -> Self {
        Self { renderer, aggregator, toc_layout, work_dir }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    pub fn aggregate<S: FindingSource>(
        &self,
        subject: &Subject,
        source: S,
        generated_at: DateTime<Utc>,
    ) -> ReportPayload {
        self.aggregator.aggregate(subject, source, generated_at)
    }

    /// Renders and assembles an already aggregated payload.
    pub async fn compile_payload(
        &self,
        payload: &ReportPayload,
    ) -> Result<CompiledReport, PipelineError> {
        let start = Instant::now();
        let workspace = Workspace::create(self.work_dir.clone()).await?;
        workspace.write_payload(payload).await?;

        info!("[PIPELINE] Rendering sections for report '{}'", payload.report_id);
        self.renderer.render(workspace.job()).await?;
        let report = workspace.read_manifest().await?;
        info!(
            "[PIPELINE] Manifest lists {} files and {} TOC entries",
            report.files.len(),
            report.toc_entries.len()
        );

        let layout = self.toc_layout;
        let assembled = tokio::task::spawn_blocking(move || assemble(&report, &layout)).await??;
        drop(workspace);

        info!(
            "[PIPELINE] Report '{}' compiled in {} ms",
            payload.report_id,
            start.elapsed().as_millis()
        );
        Ok(CompiledReport {
            report_id: payload.report_id.clone(),
            bytes: assembled.bytes,
            page_count: assembled.page_count,
            role_pages: assembled.role_pages,
            links: assembled.links,
            bookmarks: assembled.bookmarks,
        })
    }

    pub async fn compile<S: FindingSource>(
        &self,
        subject: &Subject,
        source: S,
        generated_at: DateTime<Utc>,
    ) -> Result<CompiledReport, PipelineError> {
        let payload = self.aggregate(subject, source, generated_at);
        self.compile_payload(&payload).await
    }

    /// Loads the user's findings from `store` and compiles their report.
    pub async fn compile_for_user(
        &self,
        store: Arc<dyn FindingStore>,
        user_id: &str,
    ) -> Result<CompiledReport, PipelineError> {
        let lookup = user_id.to_string();
        let record = tokio::task::spawn_blocking(move || store.load_subject(&lookup))
            .await??
            .ok_or_else(|| PipelineError::UnknownSubject(user_id.to_string()))?;
        let (subject, source) = record.into_parts();
        info!(
            "[PIPELINE] Compiling report for '{}' from {} findings",
            subject.user_id,
            source.len()
        );
        self.compile(&subject, source, Utc::now()).await
    }
}
