//! Filesystem clean-up of orphaned files.
//!
//! Orphans are either moved into an archive folder next to them or deleted.
//! A failure on one file is recorded and the batch continues. The disk
//! cache is invalidated once the batch is done, whatever the outcome.

use std::path::PathBuf;

use crate::error::LibraryError;
use crate::library::Library;

/// Folder name orphans are archived into, created beside each orphan.
pub const DEFAULT_ARCHIVE_DIR: &str = "out-of-catalog";

/// Outcome of an archive or delete pass.
#[derive(Debug, Default)]
pub struct MaintenanceStats {
    /// Files moved or deleted (or that would be, in a dry run).
    pub processed: usize,
    /// Files that failed, with the reason.
    pub failed: Vec<(String, String)>,
}

/// Where `orphan` goes when archived: `<dir>/<archive_dir>/<name>`.
///
/// Returns `None` for paths without a `/`.
pub fn archive_target(orphan: &str, archive_dir: &str) -> Option<PathBuf> {
    let idx = orphan.rfind('/')?;
    let (dir, name) = orphan.split_at(idx);
    Some(PathBuf::from(format!("{}/{}{}", dir, archive_dir, name)))
}

/// Move every orphan into an archive folder beside it.
pub fn archive_orphans(
    library: &Library,
    archive_dir: &str,
    dry_run: bool,
) -> Result<MaintenanceStats, LibraryError> {
    let orphans = library.orphans()?;
    let mut stats = MaintenanceStats::default();

    for orphan in &orphans {
        let Some(target) = archive_target(orphan, archive_dir) else {
            stats.failed.push((orphan.clone(), "no parent directory".to_string()));
            continue;
        };
        if dry_run {
            log::info!("Would move: {} => {}", orphan, target.display());
            stats.processed += 1;
            continue;
        }
        match move_file(orphan, &target) {
            Ok(()) => {
                log::info!("Moving: {} => {}", orphan, target.display());
                stats.processed += 1;
            }
            Err(e) => {
                log::warn!("Failed to move {}: {}", orphan, e);
                stats.failed.push((orphan.clone(), e.to_string()));
            }
        }
    }

    if !dry_run {
        library.invalidate_disk_cache();
    }
    Ok(stats)
}

fn move_file(from: &str, to: &std::path::Path) -> std::io::Result<()> {
    if to.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("{} already exists", to.display()),
        ));
    }
    if let Some(parent) = to.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::rename(from, to)
}

/// Delete every orphan from disk.
pub fn delete_orphans(library: &Library, dry_run: bool) -> Result<MaintenanceStats, LibraryError> {
    let orphans = library.orphans()?;
    let mut stats = MaintenanceStats::default();

    for orphan in &orphans {
        if dry_run {
            log::info!("Would delete: {}", orphan);
            stats.processed += 1;
            continue;
        }
        match std::fs::remove_file(orphan) {
            Ok(()) => {
                log::debug!("Deleted: {}", orphan);
                stats.processed += 1;
            }
            Err(e) => {
                log::warn!("Failed to delete {}: {}", orphan, e);
                stats.failed.push((orphan.clone(), e.to_string()));
            }
        }
    }

    if !dry_run {
        library.invalidate_disk_cache();
    }
    Ok(stats)
}
