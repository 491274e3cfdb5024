pub(crate) mod browse;
pub(crate) mod config;
pub(crate) mod missing;
pub(crate) mod orphans;
pub(crate) mod tables;

use std::path::PathBuf;

use lrsweep_lib::Library;
use lrsweep_lib::settings::{self, Settings};

use crate::CliError;

/// An open catalogue plus the settings it was opened with.
pub(crate) struct Session {
    pub library: Library,
    pub settings: Settings,
}

/// Load settings, resolve the catalogue path, and open it read-only.
pub(crate) fn open_session(catalogue: Option<PathBuf>) -> Result<Session, CliError> {
    let settings = settings::load_settings()?;
    let path = settings::resolve_catalogue_path(catalogue, &settings)?;
    let library = Library::open_with_slots(&path, settings.selection.slots()).map_err(|e| {
        CliError::database(format!("Failed to open {}: {}", path.display(), e))
    })?;
    log::debug!("Using catalogue {}", path.display());
    Ok(Session { library, settings })
}

/// Run `f` against an open session and close the catalogue afterwards.
pub(crate) fn with_session(
    catalogue: Option<PathBuf>,
    f: impl FnOnce(&Session) -> Result<(), CliError>,
) -> Result<(), CliError> {
    let session = open_session(catalogue)?;
    let result = f(&session);
    if let Err(e) = session.library.close() {
        log::warn!("Failed to close catalogue: {}", e);
    }
    result
}

/// Print one path per line.
pub(crate) fn log_paths(paths: &[String]) {
    for path in paths {
        log::info!("{}", path);
    }
}
