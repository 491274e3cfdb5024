//! Catalogue reconciliation engine.
//!
//! Compares a Lightroom catalogue with the folders it references, reports
//! orphans (on disk only) and missing files (catalogue only), and purges
//! catalogue records for missing files.

pub mod disk;
pub mod error;
pub mod library;
pub mod maintenance;
pub mod reconcile;
pub mod settings;

pub use disk::{DiskIndex, DiskScan};
pub use error::LibraryError;
pub use library::{Library, LibraryInfo};
pub use lrsweep_db::{DeletionPlan, DeletionReport, SelectionSlots};
pub use maintenance::{archive_orphans, delete_orphans, MaintenanceStats, DEFAULT_ARCHIVE_DIR};
pub use reconcile::{reconcile, Reconciliation};
