use crate::error::{PipelineError, RenderError};
use crate::renderer::RenderJob;
use genreport_types::{Manifest, ManifestReport, RendererInput, ReportPayload};
use log::debug;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// The private scratch directory of one compilation request.
///
/// Holds the payload file, the renderer's output directory and the manifest.
/// Everything is removed when the workspace is dropped, on every exit path.
pub struct Workspace {
    dir: TempDir,
    job: RenderJob,
}

impl Workspace {
    /// Creates the directory under `root`, or under the system temp dir.
    ///
    /// The filesystem calls run on the blocking pool.
    pub async fn create(root: Option<PathBuf>) -> io::Result<Self> {
        tokio::task::spawn_blocking(move || Self::create_blocking(root.as_deref()))
            .await
            .map_err(io::Error::other)?
    }

    fn create_blocking(root: Option<&Path>) -> io::Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("genreport-");
        let dir = match root {
            Some(root) => {
                std::fs::create_dir_all(root)?;
                builder.tempdir_in(root)?
            }
            None => builder.tempdir()?,
        };
        let out_dir = dir.path().join("sections");
        std::fs::create_dir(&out_dir)?;
        let job = RenderJob {
            input: dir.path().join("payload.json"),
            out_dir,
            manifest: dir.path().join("manifest.json"),
        };
        debug!("[PIPELINE] Workspace created at '{}'", dir.path().display());
        Ok(Self { dir, job })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn job(&self) -> &RenderJob {
        &self.job
    }

    /// Writes the renderer envelope `{"people": [payload]}`.
    pub async fn write_payload(&self, payload: &ReportPayload) -> Result<(), PipelineError> {
        let bytes = serde_json::to_vec(&RendererInput::from(payload))?;
        tokio::fs::write(&self.job.input, bytes).await?;
        Ok(())
    }

    /// Reads the manifest the renderer left behind and returns its report.
    /// Relative file paths are taken relative to the output directory.
    pub async fn read_manifest(&self) -> Result<ManifestReport, RenderError> {
        let path = &self.job.manifest;
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(RenderError::MissingManifest(path.clone()));
            }
            Err(e) => return Err(e.into()),
        };
        let mut manifest: Manifest = serde_json::from_slice(&bytes)
            .map_err(|source| RenderError::InvalidManifest { path: path.clone(), source })?;
        manifest.resolve_relative(&self.job.out_dir);
        manifest
            .into_primary()
            .filter(|report| !report.files.is_empty())
            .ok_or(RenderError::EmptyManifest)
    }
}
