use lrsweep_db::CatalogueError;
use thiserror::Error;

/// Errors surfaced by the [`Library`](crate::Library) facade.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// Catalogue query or deletion failed
    #[error(transparent)]
    Catalogue(#[from] CatalogueError),

    /// Filesystem error while moving or deleting files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file could not be read or no catalogue was configured
    #[error("Settings error: {0}")]
    Settings(String),
}

impl LibraryError {
    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }
}
