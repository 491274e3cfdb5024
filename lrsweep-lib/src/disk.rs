//! Index of the files that actually exist in the catalogue's folders.
//!
//! Only the directories that hold catalogued images are listed, one level
//! deep. The result is cached until [`DiskIndex::invalidate`] is called;
//! anything that moves or deletes files must invalidate afterwards.

use std::collections::{BTreeSet, HashSet};
use std::sync::{Arc, Mutex, PoisonError};

/// Result of listing the catalogue's directories.
#[derive(Debug, Default)]
pub struct DiskScan {
    /// `dir + name` for every qualifying entry.
    pub files: HashSet<String>,
    /// Directories that could not be listed.
    pub unreachable: Vec<String>,
}

impl DiskScan {
    pub fn contains(&self, path: &str) -> bool {
        self.files.contains(path)
    }

    /// Files in lexicographic order.
    pub fn sorted(&self) -> Vec<&str> {
        let mut files: Vec<&str> = self.files.iter().map(String::as_str).collect();
        files.sort_unstable();
        files
    }
}

/// Cached view of what is on disk.
///
/// The cache is not keyed by the paths passed in: the first scan's directory
/// set answers every call until the cache is invalidated.
#[derive(Debug, Default)]
pub struct DiskIndex {
    cache: Mutex<Option<Arc<DiskScan>>>,
}

impl DiskIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached scan, or scan the parents of `known_paths`.
    pub fn files_on_disk<S: AsRef<str>>(&self, known_paths: &[S]) -> Arc<DiskScan> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(scan) = cache.as_ref() {
            return Arc::clone(scan);
        }
        let scan = Arc::new(scan_directories(parent_directories(known_paths)));
        log::debug!(
            "Disk scan: {} files, {} unreachable directories",
            scan.files.len(),
            scan.unreachable.len()
        );
        *cache = Some(Arc::clone(&scan));
        scan
    }

    pub fn is_cached(&self) -> bool {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Drop the cached scan. Safe to call repeatedly.
    pub fn invalidate(&self) {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if cache.take().is_some() {
            log::debug!("Disk cache invalidated");
        }
    }
}

/// Distinct parent directories of `paths`, each keeping its trailing `/`.
///
/// Paths without a `/` have no directory to list and are skipped.
pub fn parent_directories<S: AsRef<str>>(paths: &[S]) -> BTreeSet<String> {
    paths
        .iter()
        .filter_map(|p| {
            let p = p.as_ref();
            p.rfind('/').map(|idx| p[..=idx].to_string())
        })
        .collect()
}

/// Whether a directory entry counts as a file.
///
/// The test is only "the name contains a dot": hidden dot-files pass and
/// extensionless files do not.
pub fn is_candidate_file(name: &str) -> bool {
    name.contains('.')
}

/// List every directory and collect qualifying entries.
///
/// Unlistable directories are logged and recorded, never fatal.
pub fn scan_directories(dirs: impl IntoIterator<Item = String>) -> DiskScan {
    let mut scan = DiskScan::default();
    for dir in dirs {
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Directory unreachable: {} ({})", dir, e);
                scan.unreachable.push(dir);
                continue;
            }
        };
        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                log::debug!("Skipping non-UTF-8 name in {}: {:?}", dir, name);
                continue;
            };
            if is_candidate_file(name) {
                scan.files.insert(format!("{}{}", dir, name));
            }
        }
    }
    scan
}
