use lrsweep_lib::{archive_orphans, delete_orphans, MaintenanceStats};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use super::{log_paths, Session};
use crate::CliError;

/// List orphans, or archive/delete them.
pub(crate) fn run_orphans(
    session: &Session,
    archive: bool,
    delete: bool,
    dry_run: bool,
) -> Result<(), CliError> {
    let library = &session.library;

    if archive {
        let dir_name = &session.settings.archive.dir_name;
        let stats = archive_orphans(library, dir_name, dry_run)?;
        report(&stats, if dry_run { "would be moved" } else { "moved" });
        return Ok(());
    }
    if delete {
        let stats = delete_orphans(library, dry_run)?;
        report(&stats, if dry_run { "would be deleted" } else { "deleted" });
        return Ok(());
    }

    let result = library.reconcile()?;
    if !result.unreachable.is_empty() {
        log::warn!(
            "{} directories could not be listed:",
            result.unreachable.len()
        );
        for dir in &result.unreachable {
            log::warn!("  {}", dir);
        }
    }
    if result.orphans.is_empty() {
        log::info!(
            "{}",
            "No orphaned files.".if_supports_color(Stdout, |t| t.green())
        );
        return Ok(());
    }
    log_paths(&result.orphans);
    crate::log_blank();
    log::info!(
        "{} orphaned files. Re-run with --archive or --delete to clean up.",
        result.orphans.len().if_supports_color(Stdout, |t| t.bold())
    );
    Ok(())
}

fn report(stats: &MaintenanceStats, verb: &str) {
    crate::log_blank();
    log::info!(
        "{} files {}",
        stats.processed.if_supports_color(Stdout, |t| t.bold()),
        verb
    );
    if !stats.failed.is_empty() {
        log::warn!(
            "{} files failed:",
            stats.failed.len().if_supports_color(Stdout, |t| t.red())
        );
        for (path, reason) in &stats.failed {
            log::warn!("  {}: {}", path, reason);
        }
    }
}
