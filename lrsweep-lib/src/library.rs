//! The engine facade handed to front ends.
//!
//! [`Library`] pairs one [`Catalogue`] with one [`DiskIndex`]. Catalogue
//! reads take the catalogue lock; disk scans never do.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

use lrsweep_db::{Catalogue, DeletionPlan, DeletionReport, SelectionSlots};

use crate::disk::{DiskIndex, DiskScan};
use crate::error::LibraryError;
use crate::reconcile::{reconcile, Reconciliation};

/// Summary counts for a catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryInfo {
    pub catalogue: String,
    pub images: i64,
    pub keywords: usize,
    pub collections: usize,
}

pub struct Library {
    catalogue: Catalogue,
    disk: DiskIndex,
}

impl Library {
    /// Open the catalogue at `path` read-only with default selection slots.
    pub fn open(path: &Path) -> Result<Self, LibraryError> {
        Self::open_with_slots(path, SelectionSlots::default())
    }

    pub fn open_with_slots(path: &Path, slots: SelectionSlots) -> Result<Self, LibraryError> {
        let catalogue = Catalogue::open(path)?.with_slots(slots);
        Ok(Self {
            catalogue,
            disk: DiskIndex::new(),
        })
    }

    pub fn catalogue_name(&self) -> &Path {
        self.catalogue.path()
    }

    pub fn info(&self) -> Result<LibraryInfo, LibraryError> {
        Ok(LibraryInfo {
            catalogue: self.catalogue_name().display().to_string(),
            images: self.catalogue.image_count()?,
            keywords: self.catalogue.keywords()?.len(),
            collections: self.catalogue.collections()?.len(),
        })
    }

    pub fn keywords(&self) -> Result<BTreeMap<String, i64>, LibraryError> {
        Ok(self.catalogue.keywords()?)
    }

    pub fn tagged_by(&self, keyword: &str) -> Result<Vec<String>, LibraryError> {
        Ok(self.catalogue.tagged_by(keyword)?)
    }

    pub fn untagged(&self) -> Result<Vec<String>, LibraryError> {
        Ok(self.catalogue.untagged()?)
    }

    pub fn collections(&self) -> Result<Vec<String>, LibraryError> {
        Ok(self.catalogue.collections()?)
    }

    pub fn collection(&self, name: &str) -> Result<Vec<String>, LibraryError> {
        Ok(self.catalogue.collection(name)?)
    }

    pub fn all_files(&self) -> Result<Vec<String>, LibraryError> {
        Ok(self.catalogue.all_files()?)
    }

    /// Tables that have a column named `column`.
    pub fn tables_with_column(&self, column: &str) -> Result<BTreeSet<String>, LibraryError> {
        Ok(self.catalogue.tables_with_column(column)?)
    }

    /// The disk view for the catalogue's directories (cached).
    pub fn files_on_disk(&self) -> Result<Arc<DiskScan>, LibraryError> {
        let known = self.catalogue.all_files()?;
        Ok(self.disk.files_on_disk(&known))
    }

    /// Orphans and missing files from a single snapshot.
    pub fn reconcile(&self) -> Result<Reconciliation, LibraryError> {
        let known = self.catalogue.all_files()?;
        let disk = self.disk.files_on_disk(&known);
        Ok(reconcile(&known, &disk))
    }

    pub fn orphans(&self) -> Result<Vec<String>, LibraryError> {
        Ok(self.reconcile()?.orphans)
    }

    pub fn missing(&self) -> Result<Vec<String>, LibraryError> {
        Ok(self.reconcile()?.missing)
    }

    /// Dry run of [`remove_files`](Self::remove_files).
    pub fn plan_deletion(&self, paths: &[String]) -> Result<DeletionPlan, LibraryError> {
        Ok(self.catalogue.plan_deletion(paths)?)
    }

    /// Purge catalogue records for files that are gone, then drop the disk cache.
    pub fn remove_files(&self, paths: &[String]) -> Result<DeletionReport, LibraryError> {
        let report = self.catalogue.remove_files(paths)?;
        self.disk.invalidate();
        Ok(report)
    }

    /// Must be called by anything that changes the catalogue's folders on disk.
    pub fn invalidate_disk_cache(&self) {
        self.disk.invalidate();
    }

    pub fn close(&self) -> Result<(), LibraryError> {
        Ok(self.catalogue.close()?)
    }
}
