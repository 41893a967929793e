// Error types

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid event: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown host format '{0}' (expected 'pytest' or 'libtest')")]
    UnknownFormat(String),

    #[error("failed to write report to {}: {source}", path.display())]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ReportError>;
