use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposerError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Section file '{}' does not exist", path.display())]
    MissingFile { path: PathBuf },

    #[error("Section file '{}' could not be opened as a PDF: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },

    #[error("Manifest lists no section files")]
    EmptyManifest,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
