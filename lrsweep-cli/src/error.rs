use lrsweep_lib::LibraryError;
use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Catalogue query or deletion failed
    #[error("Database error: {0}")]
    Database(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}

impl CliError {
    pub(crate) fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }
}

impl From<LibraryError> for CliError {
    fn from(e: LibraryError) -> Self {
        match e {
            LibraryError::Catalogue(e) => Self::database(e.to_string()),
            LibraryError::Io(e) => Self::Io(e),
            LibraryError::Settings(msg) => Self::Config(msg),
        }
    }
}
