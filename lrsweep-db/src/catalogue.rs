//! Ownership of the single catalogue connection.
//!
//! A [`Catalogue`] holds exactly one SQLite connection behind a mutex. It is
//! opened read-only and only ever reopened read-write inside a
//! [`WriteWindow`], which puts the read-only connection back on every exit
//! path, including failures.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use rusqlite::{Connection, OpenFlags, Transaction, TransactionBehavior};
use thiserror::Error;

use crate::operations::{self, DeletionPlan, DeletionReport, SelectionSlots};
use crate::queries::{self, ImageRecord};
use crate::schema;

#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error("Catalogue not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Catalogue is closed")]
    Closed,
    #[error("Query failed: {0}")]
    Query(#[from] rusqlite::Error),
    #[error("Deletion rolled back: {0}")]
    Transaction(#[source] rusqlite::Error),
    #[error("Failed to restore read-only mode: {0}")]
    Restore(#[source] rusqlite::Error),
}

/// Connection mode. Exactly one is open at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    ReadOnly,
    ReadWrite,
}

impl Mode {
    fn flags(self) -> OpenFlags {
        // The engine never creates a catalogue, so SQLITE_OPEN_CREATE is never set.
        let base = OpenFlags::SQLITE_OPEN_NO_MUTEX;
        match self {
            Mode::ReadOnly => base | OpenFlags::SQLITE_OPEN_READ_ONLY,
            Mode::ReadWrite => base | OpenFlags::SQLITE_OPEN_READ_WRITE,
        }
    }
}

pub(crate) struct Handle {
    conn: Option<Connection>,
    mode: Mode,
}

impl Handle {
    pub(crate) fn conn(&self) -> Result<&Connection, CatalogueError> {
        self.conn.as_ref().ok_or(CatalogueError::Closed)
    }

    /// Close the current connection, then open a fresh one in `mode`.
    fn switch(&mut self, path: &Path, mode: Mode) -> Result<(), rusqlite::Error> {
        if let Some(conn) = self.conn.take() {
            if let Err((conn, e)) = conn.close() {
                self.conn = Some(conn);
                return Err(e);
            }
        }
        let conn = Connection::open_with_flags(path, mode.flags())?;
        self.conn = Some(conn);
        self.mode = mode;
        Ok(())
    }
}

/// A Lightroom catalogue opened for reconciliation.
pub struct Catalogue {
    path: PathBuf,
    slots: SelectionSlots,
    handle: Mutex<Handle>,
}

impl Catalogue {
    /// Open an existing catalogue read-only.
    ///
    /// Fails with [`CatalogueError::NotFound`] when the file does not exist and
    /// with [`CatalogueError::Query`] when it is not a readable SQLite store.
    pub fn open(path: &Path) -> Result<Self, CatalogueError> {
        if !path.is_file() {
            return Err(CatalogueError::NotFound(path.to_path_buf()));
        }
        let conn = Connection::open_with_flags(path, Mode::ReadOnly.flags())?;
        // Opening is lazy; touch the schema so a corrupt file fails here.
        conn.query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| {
            row.get::<_, i64>(0)
        })?;
        log::debug!("Opened catalogue {} read-only", path.display());

        Ok(Self {
            path: path.to_path_buf(),
            slots: SelectionSlots::default(),
            handle: Mutex::new(Handle {
                conn: Some(conn),
                mode: Mode::ReadOnly,
            }),
        })
    }

    /// Use different `Adobe_variablesTable` rows as selection pointers.
    pub fn with_slots(mut self, slots: SelectionSlots) -> Self {
        self.slots = slots;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn slots(&self) -> SelectionSlots {
        self.slots
    }

    /// The current connection mode, or `None` once closed.
    pub fn mode(&self) -> Option<Mode> {
        let handle = self.lock();
        handle.conn.as_ref().map(|_| handle.mode)
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, Handle> {
        self.handle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run a read against the connection while holding the catalogue lock.
    pub fn read<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, CatalogueError>,
    ) -> Result<T, CatalogueError> {
        let handle = self.lock();
        f(handle.conn()?)
    }

    /// Release the connection. Later calls fail with [`CatalogueError::Closed`].
    pub fn close(&self) -> Result<(), CatalogueError> {
        let mut handle = self.lock();
        if let Some(conn) = handle.conn.take() {
            conn.close().map_err(|(_, e)| CatalogueError::Query(e))?;
            log::debug!("Closed catalogue {}", self.path.display());
        }
        Ok(())
    }

    // ── Reads ───────────────────────────────────────────────────────────────

    pub fn tables_with_column(&self, column: &str) -> Result<BTreeSet<String>, CatalogueError> {
        self.read(|conn| schema::tables_with_column(conn, column))
    }

    pub fn keywords(&self) -> Result<BTreeMap<String, i64>, CatalogueError> {
        self.read(queries::keywords)
    }

    pub fn tagged_by(&self, keyword: &str) -> Result<Vec<String>, CatalogueError> {
        self.read(|conn| queries::tagged_by(conn, keyword))
    }

    pub fn untagged(&self) -> Result<Vec<String>, CatalogueError> {
        self.read(queries::untagged)
    }

    pub fn collections(&self) -> Result<Vec<String>, CatalogueError> {
        self.read(queries::collections)
    }

    pub fn collection(&self, name: &str) -> Result<Vec<String>, CatalogueError> {
        self.read(|conn| queries::collection(conn, name))
    }

    pub fn all_files(&self) -> Result<Vec<String>, CatalogueError> {
        self.read(queries::all_files)
    }

    pub fn all_records(&self) -> Result<Vec<ImageRecord>, CatalogueError> {
        self.read(queries::all_records)
    }

    pub fn image_count(&self) -> Result<i64, CatalogueError> {
        self.read(queries::image_count)
    }

    // ── Deletion ────────────────────────────────────────────────────────────

    /// Build the deletion plan for `missing` without touching anything.
    pub fn plan_deletion(&self, missing: &[String]) -> Result<DeletionPlan, CatalogueError> {
        self.read(|conn| operations::plan_deletion(conn, missing, self.slots))
    }

    /// Purge the catalogue rows behind `missing`.
    ///
    /// The lock is held from planning through commit so no read can observe
    /// the connection while it is being switched.
    pub fn remove_files(&self, missing: &[String]) -> Result<DeletionReport, CatalogueError> {
        let handle = self.lock();
        let plan = operations::plan_deletion(handle.conn()?, missing, self.slots)?;
        self.apply_locked(handle, &plan)
    }

    /// Execute a previously built plan.
    ///
    /// The plan is applied as-is; build it immediately beforehand.
    pub fn apply_plan(&self, plan: &DeletionPlan) -> Result<DeletionReport, CatalogueError> {
        let handle = self.lock();
        self.apply_locked(handle, plan)
    }

    fn apply_locked(
        &self,
        handle: MutexGuard<'_, Handle>,
        plan: &DeletionPlan,
    ) -> Result<DeletionReport, CatalogueError> {
        if plan.is_empty() {
            log::debug!("Deletion plan is empty; catalogue left untouched");
            return Ok(DeletionReport::default());
        }

        log::info!(
            "Removing {} images ({} file records) across {} dependent tables",
            plan.image_ids.len(),
            plan.file_ids.len(),
            plan.tables.len(),
        );

        let mut window = WriteWindow::open(handle, &self.path)?;
        let outcome = {
            let tx = window.transaction()?;
            operations::execute_plan(&tx, plan, self.slots)
                .and_then(|report| tx.commit().map(|()| report))
        };

        match outcome {
            Ok(report) => Ok(committed(report, window.restore())),
            Err(e) => {
                log::error!("Deletion failed, rolled back: {}", e);
                if let Err(restore) = window.restore() {
                    log::error!("{}", restore);
                }
                Err(CatalogueError::Transaction(e))
            }
        }
    }
}

/// Attach a failed read-only reopen to the report of a committed deletion.
///
/// The rows are already gone, so the report is kept and the caller still
/// learns what was removed.
fn committed(mut report: DeletionReport, restored: Result<(), CatalogueError>) -> DeletionReport {
    if let Err(e) = restored {
        log::error!("Deletion committed, but {}", e);
        report.restore_error = Some(e.to_string());
    }
    report
}

/// Exclusive read-write access to the catalogue.
///
/// Created from the held lock, so nothing else can use the connection while
/// it is writable. Dropping the window reopens the connection read-only.
pub(crate) struct WriteWindow<'a> {
    handle: MutexGuard<'a, Handle>,
    path: &'a Path,
}

impl<'a> WriteWindow<'a> {
    pub(crate) fn open(
        mut handle: MutexGuard<'a, Handle>,
        path: &'a Path,
    ) -> Result<Self, CatalogueError> {
        if handle.conn.is_none() {
            return Err(CatalogueError::Closed);
        }
        if let Err(e) = handle.switch(path, Mode::ReadWrite) {
            if handle.conn.is_none() {
                if let Err(restore) = handle.switch(path, Mode::ReadOnly) {
                    log::error!("Failed to reopen catalogue read-only: {}", restore);
                }
            }
            return Err(CatalogueError::Transaction(e));
        }
        log::debug!("Catalogue {} switched to read-write", path.display());
        Ok(Self { handle, path })
    }

    pub(crate) fn transaction(&mut self) -> Result<Transaction<'_>, CatalogueError> {
        let conn = self.handle.conn.as_mut().ok_or(CatalogueError::Closed)?;
        conn.transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(CatalogueError::Transaction)
    }

    /// Reopen read-only now and report failure to the caller.
    pub(crate) fn restore(mut self) -> Result<(), CatalogueError> {
        self.handle
            .switch(self.path, Mode::ReadOnly)
            .map_err(CatalogueError::Restore)?;
        log::debug!("Catalogue {} back to read-only", self.path.display());
        Ok(())
    }
}

impl Drop for WriteWindow<'_> {
    fn drop(&mut self) {
        if self.handle.mode == Mode::ReadOnly && self.handle.conn.is_some() {
            return;
        }
        if let Err(e) = self.handle.switch(self.path, Mode::ReadOnly) {
            log::error!(
                "Catalogue {} could not be reopened read-only: {}",
                self.path.display(),
                e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn committed_report_survives_a_failed_reopen() {
        let report = DeletionReport {
            images_removed: 2,
            files_removed: 2,
            ..DeletionReport::default()
        };

        let kept = committed(report, Err(CatalogueError::Restore(rusqlite::Error::InvalidQuery)));
        assert_eq!(kept.images_removed, 2);
        assert_eq!(kept.files_removed, 2);
        assert!(kept.restore_error.is_some());

        let clean = committed(DeletionReport::default(), Ok(()));
        assert_eq!(clean.restore_error, None);
    }
}
