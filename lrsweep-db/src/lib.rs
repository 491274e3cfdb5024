//! SQLite access layer for Lightroom catalogues.
//!
//! Owns the single catalogue connection and provides schema introspection,
//! read queries, and the transactional cascade delete used to purge records
//! of files that are gone from disk.

pub mod catalogue;
pub mod operations;
pub mod queries;
pub mod schema;

pub use catalogue::{Catalogue, CatalogueError, Mode};
pub use operations::{
    execute_plan, plan_deletion, read_selection, DeletionPlan, DeletionReport, SelectionPointers,
    SelectionSlots,
};
pub use queries::{
    all_files, all_records, collection, collections, image_count, keywords,
    records_by_base_name, tagged_by, untagged, ImageRecord,
};
pub use rusqlite::Connection;
pub use schema::{create_schema, describe_table, list_tables, tables_with_column, TableDescriptor};
