/// Error types for the tracker
///
/// Every fallible operation in the catalog, checklist, persistence and
/// signal layers returns `Result<T, TrackerError>`. The UI turns these into
/// status messages or dialogs; nothing here is fatal to the process.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Catalog file not found: {}", .0.display())]
    CatalogNotFound(PathBuf),

    #[error("Catalog is malformed: {0}")]
    CatalogMalformed(String),

    #[error("Unknown move id: {0}")]
    UnknownItem(u32),

    #[error("Not a move selection: {0:?}")]
    InvalidSelection(String),

    #[error("{name} (#{id}) has already been used")]
    AlreadyConsumed { id: u32, name: String },

    #[error("Save file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Save file is invalid: {0}")]
    FormatInvalid(String),

    #[error("Failed to write signal file {}: {source}", .path.display())]
    SignalWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TrackerError {
    /// True for conditions the user caused and can simply be warned about
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            TrackerError::AlreadyConsumed { .. }
                | TrackerError::UnknownItem(_)
                | TrackerError::InvalidSelection(_)
        )
    }
}

impl From<TrackerError> for String {
    fn from(err: TrackerError) -> Self {
        err.to_string()
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
