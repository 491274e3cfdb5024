//! Catalogue-versus-disk reconciliation.
//!
//! Both directions are computed from one snapshot, a single catalogue read
//! plus a single disk scan, so a file can never be an orphan and missing at
//! the same time.

use std::collections::HashSet;

use crate::disk::DiskScan;

/// Differences between the catalogue and the disk.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// On disk, not in the catalogue. Sorted.
    pub orphans: Vec<String>,
    /// In the catalogue, not on disk. Catalogue order, duplicates removed.
    pub missing: Vec<String>,
    /// Directories the scan could not list.
    pub unreachable: Vec<String>,
}

/// Compute orphans and missing files from one snapshot.
pub fn reconcile(catalogue: &[String], disk: &DiskScan) -> Reconciliation {
    let known: HashSet<&str> = catalogue.iter().map(String::as_str).collect();

    let mut orphans: Vec<String> = disk
        .files
        .iter()
        .filter(|path| !known.contains(path.as_str()))
        .cloned()
        .collect();
    orphans.sort_unstable();

    // Virtual copies share a file, so the same path can appear twice.
    let mut seen = HashSet::new();
    let missing: Vec<String> = catalogue
        .iter()
        .filter(|path| !disk.contains(path) && seen.insert(path.as_str()))
        .cloned()
        .collect();

    Reconciliation {
        orphans,
        missing,
        unreachable: disk.unreachable.clone(),
    }
}
