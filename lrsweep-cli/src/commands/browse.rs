use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use super::{log_paths, Session};
use crate::CliError;

/// Show the catalogue path and summary counts.
pub(crate) fn run_info(session: &Session) -> Result<(), CliError> {
    let info = session.library.info()?;

    log::info!(
        "{}",
        info.catalogue.if_supports_color(Stdout, |t| t.bold())
    );
    log::info!("  Images:      {}", info.images);
    log::info!("  Keywords:    {}", info.keywords);
    log::info!("  Collections: {}", info.collections);
    Ok(())
}

/// List keywords with their image counts.
pub(crate) fn run_keywords(session: &Session) -> Result<(), CliError> {
    let keywords = session.library.keywords()?;
    if keywords.is_empty() {
        log::info!("No keywords in catalogue.");
        return Ok(());
    }

    let width = keywords.keys().map(|k| k.chars().count()).max().unwrap_or(0);
    for (name, count) in &keywords {
        log::info!(
            "{:<width$}  {}",
            name,
            count.if_supports_color(Stdout, |t| t.dimmed()),
            width = width
        );
    }
    Ok(())
}

pub(crate) fn run_tagged(session: &Session, keyword: &str) -> Result<(), CliError> {
    let paths = session.library.tagged_by(keyword)?;
    if paths.is_empty() {
        log::warn!("No images tagged '{}'", keyword);
    }
    log_paths(&paths);
    Ok(())
}

pub(crate) fn run_untagged(session: &Session) -> Result<(), CliError> {
    log_paths(&session.library.untagged()?);
    Ok(())
}

pub(crate) fn run_collections(session: &Session) -> Result<(), CliError> {
    let collections = session.library.collections()?;
    if collections.is_empty() {
        log::info!("No collections with images.");
    }
    log_paths(&collections);
    Ok(())
}

pub(crate) fn run_collection(session: &Session, name: &str) -> Result<(), CliError> {
    let paths = session.library.collection(name)?;
    if paths.is_empty() {
        log::warn!("Collection '{}' is empty or does not exist", name);
    }
    log_paths(&paths);
    Ok(())
}

/// List every file the catalogue references.
pub(crate) fn run_files(session: &Session) -> Result<(), CliError> {
    log_paths(&session.library.all_files()?);
    Ok(())
}
