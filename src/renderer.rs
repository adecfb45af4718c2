//! Invocation of the external section renderer.

use crate::error::RenderError;
use log::{debug, info};
use std::future::Future;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tokio::time::timeout;

/// Captured renderer output is cut to this many bytes.
const MAX_CAPTURED_OUTPUT: usize = 8 * 1024;

/// The three paths a renderer run works with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderJob {
    /// JSON payload envelope to read.
    pub input: PathBuf,
    /// Existing, writable directory for section files.
    pub out_dir: PathBuf,
    /// Where the manifest must be written.
    pub manifest: PathBuf,
}

/// Produces section files and a manifest for one payload.
///
/// Success means the manifest has been written; the caller validates it.
pub trait SectionRenderer: Send + Sync {
    fn render(&self, job: &RenderJob) -> impl Future<Output = Result<(), RenderError>> + Send;
}

/// Runs the renderer as a child process:
/// `<program> [args...] --input <file> --out-dir <dir> --manifest <file>`.
#[derive(Debug, Clone)]
pub struct SubprocessRenderer {
    program: PathBuf,
    args: Vec<String>,
    timeout: Duration,
}

impl SubprocessRenderer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: Duration::from_secs(300),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl SectionRenderer for SubprocessRenderer {
    async fn render(&self, job: &RenderJob) -> Result<(), RenderError> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg("--input")
            .arg(&job.input)
            .arg("--out-dir")
            .arg(&job.out_dir)
            .arg("--manifest")
            .arg(&job.manifest)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let program = self.program.display().to_string();
        debug!("[RENDERER] Spawning '{}' with {} leading args", program, self.args.len());
        let child = command
            .spawn()
            .map_err(|source| RenderError::Spawn { program: program.clone(), source })?;

        let start = Instant::now();
        // Dropping the child on timeout kills it.
        let output = match timeout(self.timeout, child.wait_with_output()).await {
            Ok(output) => output?,
            Err(_) => return Err(RenderError::Timeout(self.timeout)),
        };

        if !output.status.success() {
            return Err(RenderError::Failed {
                status: output.status.to_string(),
                stdout: captured(&output.stdout),
                stderr: captured(&output.stderr),
            });
        }
        info!(
            "[RENDERER] '{}' finished in {} ms",
            program,
            start.elapsed().as_millis()
        );
        Ok(())
    }
}

fn captured(bytes: &[u8]) -> String {
    let mut text = String::from_utf8_lossy(bytes).into_owned();
    if text.len() > MAX_CAPTURED_OUTPUT {
        let mut cut = MAX_CAPTURED_OUTPUT;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
        text.push_str("\n...[truncated]");
    }
    text
}
