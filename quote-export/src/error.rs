use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not serialize quote: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("PDF rendering failed: {0}")]
    Pdf(String),

    #[error("Unknown language {0:?}, expected \"it\" or \"en\"")]
    UnknownLanguage(String),
}
