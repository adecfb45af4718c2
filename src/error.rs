use genreport_pdf_composer::ComposerError;
use genreport_source::SourceError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Failures of the external section renderer or of what it left behind.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Renderer '{program}' could not be started: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Renderer exited with {status}: {}", diagnostic(.stderr, .stdout))]
    Failed {
        status: String,
        stdout: String,
        stderr: String,
    },

    #[error("Renderer did not finish within {0:?}")]
    Timeout(Duration),

    #[error("Renderer wrote no manifest at '{}'", .0.display())]
    MissingManifest(PathBuf),

    #[error("Manifest '{}' is not valid: {source}", path.display())]
    InvalidManifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Manifest lists no section files")]
    EmptyManifest,

    #[error("Renderer I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

fn diagnostic<'a>(stderr: &'a str, stdout: &'a str) -> &'a str {
    match (stderr.trim(), stdout.trim()) {
        ("", "") => "no output",
        ("", out) => out,
        (err, _) => err,
    }
}

/// A comprehensive error type for the report compilation pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Finding store error: {0}")]
    Store(#[from] SourceError),

    #[error("No findings on record for '{0}'")]
    UnknownSubject(String),

    #[error("Section renderer failed: {0}")]
    Renderer(#[from] RenderError),

    #[error("Report assembly failed: {0}")]
    Compose(#[from] ComposerError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_render_surfaces_stderr_first() {
        let err = RenderError::Failed {
            status: "exit status: 2".into(),
            stdout: "progress...".into(),
            stderr: "TypeError: people is not iterable\n".into(),
        };
        assert_eq!(
            err.to_string(),
            "Renderer exited with exit status: 2: TypeError: people is not iterable"
        );
    }

    #[test]
    fn test_failed_render_falls_back_to_stdout() {
        let err = RenderError::Failed {
            status: "exit status: 1".into(),
            stdout: "chromium missing".into(),
            stderr: "  ".into(),
        };
        assert!(err.to_string().ends_with("chromium missing"));
    }
}
