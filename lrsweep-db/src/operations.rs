//! Cascading removal of catalogue rows for files that no longer exist.
//!
//! Removal happens in two steps. [`plan_deletion`] resolves paths to row ids,
//! discovers every table with an `image` column, and snapshots the selection
//! pointers, all read-only. [`execute_plan`] then issues the deletes inside a
//! caller-supplied transaction, one checked statement at a time.

use std::collections::{BTreeSet, HashSet};
use std::ffi::OsStr;
use std::path::Path;

use rusqlite::types::Value;
use rusqlite::{params, Connection, OptionalExtension, Transaction};

use crate::catalogue::CatalogueError;
use crate::queries::{self, ImageRecord};
use crate::schema::{self, quote_ident, FILES_TABLE, IMAGES_TABLE, IMAGE_COLUMN, VARIABLES_TABLE};

/// `Adobe_variablesTable` rows that hold the selection pointers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionSlots {
    /// Row holding the active image id.
    pub active: i64,
    /// Row holding the selected image id(s).
    pub selected: i64,
}

impl Default for SelectionSlots {
    fn default() -> Self {
        Self {
            active: 1,
            selected: 2,
        }
    }
}

/// Raw values of the two selection pointer rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionPointers {
    pub active: Option<String>,
    pub selected: Option<String>,
}

impl SelectionPointers {
    /// True when either pointer names one of `ids`.
    ///
    /// Values may hold a single id or a list; every run of digits counts.
    pub fn references_any(&self, ids: &BTreeSet<i64>) -> bool {
        [&self.active, &self.selected]
            .into_iter()
            .flatten()
            .flat_map(|value| referenced_ids(value))
            .any(|id| ids.contains(&id))
    }
}

fn referenced_ids(value: &str) -> impl Iterator<Item = i64> + '_ {
    value
        .split(|c: char| !c.is_ascii_digit())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
}

/// Everything needed to remove a set of images, computed before any mutation.
#[derive(Debug, Clone, Default)]
pub struct DeletionPlan {
    /// Records whose full path was requested.
    pub records: Vec<ImageRecord>,
    /// `Adobe_images.id_local` values to remove.
    pub image_ids: BTreeSet<i64>,
    /// `AgLibraryFile.id_local` values to remove.
    pub file_ids: BTreeSet<i64>,
    /// Tables with an `image` column, cleared of rows pointing at `image_ids`.
    pub tables: Vec<String>,
    /// Pointer values as read before the plan was built.
    pub selection: SelectionPointers,
    /// Requested paths that matched no catalogue record.
    pub unresolved: Vec<String>,
}

impl DeletionPlan {
    pub fn is_empty(&self) -> bool {
        self.image_ids.is_empty() && self.file_ids.is_empty()
    }

    /// Whether executing the plan will rewrite the selection pointers.
    pub fn repairs_selection(&self) -> bool {
        self.selection.references_any(&self.image_ids)
    }
}

/// What an executed plan removed.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DeletionReport {
    pub images_removed: usize,
    pub files_removed: usize,
    /// Rows removed per dependent table, in plan order.
    pub dependent_rows: Vec<(String, usize)>,
    pub selection_repaired: bool,
    /// Image id the pointers were moved to, `None` if the catalogue is now empty.
    pub selection_target: Option<i64>,
    /// Set when the deletion committed but the read-only reopen failed.
    pub restore_error: Option<String>,
}

/// Filename without its final extension, as Lightroom stores in `baseName`.
fn base_name(path: &str) -> Option<&str> {
    Path::new(path).file_stem().and_then(OsStr::to_str)
}

/// Resolve `missing` paths to catalogue rows and collect what must go.
///
/// Candidates are found by `baseName`, which collides across folders, so each
/// candidate is kept only if its reconstructed full path was requested.
pub fn plan_deletion(
    conn: &Connection,
    missing: &[String],
    slots: SelectionSlots,
) -> Result<DeletionPlan, CatalogueError> {
    let wanted: HashSet<&str> = missing.iter().map(String::as_str).collect();
    let mut plan = DeletionPlan {
        tables: schema::tables_with_column(conn, IMAGE_COLUMN)?
            .into_iter()
            .collect(),
        ..DeletionPlan::default()
    };

    let stems: BTreeSet<&str> = wanted.iter().copied().filter_map(base_name).collect();
    let mut matched: HashSet<String> = HashSet::new();
    for stem in stems {
        for record in queries::records_by_base_name(conn, stem)? {
            let full_path = record.full_path();
            if !wanted.contains(full_path.as_str()) {
                continue;
            }
            plan.image_ids.insert(record.image_id);
            plan.file_ids.insert(record.file_id);
            matched.insert(full_path);
            plan.records.push(record);
        }
    }

    let mut unresolved: Vec<String> = wanted
        .iter()
        .copied()
        .filter(|p| !matched.contains(*p))
        .map(str::to_string)
        .collect();
    unresolved.sort();
    plan.unresolved = unresolved;

    plan.selection = read_selection(conn, slots)?;

    log::debug!(
        "Deletion plan: {} images, {} files, tables [{}], {} unresolved",
        plan.image_ids.len(),
        plan.file_ids.len(),
        plan.tables.join(", "),
        plan.unresolved.len(),
    );

    Ok(plan)
}

/// Read both selection pointer rows. Missing rows read as `None`.
pub fn read_selection(
    conn: &Connection,
    slots: SelectionSlots,
) -> Result<SelectionPointers, CatalogueError> {
    let sql = format!(
        "SELECT value FROM {} WHERE id_local = ?1",
        quote_ident(VARIABLES_TABLE)
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let mut read = |slot: i64| -> rusqlite::Result<Option<String>> {
        let value = stmt
            .query_row(params![slot], |row| row.get::<_, Value>(0))
            .optional()?;
        Ok(value.and_then(value_to_text))
    };
    Ok(SelectionPointers {
        active: read(slots.active)?,
        selected: read(slots.selected)?,
    })
}

fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::Integer(i) => Some(i.to_string()),
        Value::Real(f) => Some(f.to_string()),
        Value::Text(s) => Some(s),
        Value::Null | Value::Blob(_) => None,
    }
}

/// Issue every delete in `plan` against `tx`, then repair the selection.
///
/// Statements run in order and each result is checked, so the first failure
/// returns before the caller gets a chance to commit.
pub fn execute_plan(
    tx: &Transaction,
    plan: &DeletionPlan,
    slots: SelectionSlots,
) -> rusqlite::Result<DeletionReport> {
    let mut report = DeletionReport::default();

    for table in &plan.tables {
        let sql = format!(
            "DELETE FROM {} WHERE {} = ?1",
            quote_ident(table),
            quote_ident(IMAGE_COLUMN)
        );
        let mut stmt = tx.prepare(&sql)?;
        let mut removed = 0;
        for id in &plan.image_ids {
            removed += stmt.execute(params![id])?;
        }
        log::debug!("{}: removed {} rows", table, removed);
        report.dependent_rows.push((table.clone(), removed));
    }

    report.images_removed = delete_by_id(tx, IMAGES_TABLE, &plan.image_ids)?;
    report.files_removed = delete_by_id(tx, FILES_TABLE, &plan.file_ids)?;

    if plan.repairs_selection() {
        let lowest: Option<i64> = tx.query_row(
            &format!("SELECT MIN(id_local) FROM {}", quote_ident(IMAGES_TABLE)),
            [],
            |row| row.get(0),
        )?;
        let value = lowest.map(|id| id.to_string());
        let mut stmt = tx.prepare(&format!(
            "UPDATE {} SET value = ?1 WHERE id_local = ?2",
            quote_ident(VARIABLES_TABLE)
        ))?;
        for slot in [slots.active, slots.selected] {
            stmt.execute(params![value, slot])?;
        }
        log::info!(
            "Selection pointed at a removed image; reset to {}",
            value.as_deref().unwrap_or("nothing")
        );
        report.selection_repaired = true;
        report.selection_target = lowest;
    }

    Ok(report)
}

fn delete_by_id(tx: &Transaction, table: &str, ids: &BTreeSet<i64>) -> rusqlite::Result<usize> {
    let mut stmt = tx.prepare(&format!(
        "DELETE FROM {} WHERE id_local = ?1",
        quote_ident(table)
    ))?;
    let mut removed = 0;
    for id in ids {
        removed += stmt.execute(params![id])?;
    }
    Ok(removed)
}
