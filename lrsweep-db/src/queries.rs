//! Read queries over the catalogue.
//!
//! Every path-producing query walks the same join
//! `Adobe_images -> AgLibraryFile -> AgLibraryFolder -> AgLibraryRootFolder`
//! and orders by `(root, path, filename)`.

use std::collections::BTreeMap;

use rusqlite::{params, Connection, Row};

use crate::catalogue::CatalogueError;
use crate::schema::{quote_ident, IMAGES_TABLE};

/// One image as the catalogue sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub image_id: i64,
    pub file_id: i64,
    pub root: String,
    pub path: String,
    pub filename: String,
}

impl ImageRecord {
    /// `root + path + filename`, concatenated verbatim.
    ///
    /// Lightroom stores the separators inside the parts already
    /// (`/photos/` + `2019/` + `a.jpg`), and on-disk paths are compared
    /// against exactly this string.
    pub fn full_path(&self) -> String {
        format!("{}{}{}", self.root, self.path, self.filename)
    }
}

fn row_to_record(row: &Row) -> rusqlite::Result<ImageRecord> {
    Ok(ImageRecord {
        image_id: row.get(0)?,
        file_id: row.get(1)?,
        root: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        path: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        filename: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
    })
}

fn into_paths(records: Vec<ImageRecord>) -> Vec<String> {
    records.iter().map(ImageRecord::full_path).collect()
}

// ── Keywords ────────────────────────────────────────────────────────────────

/// Keyword name to number of tagged images, ordered by name.
///
/// Keywords are grouped by their lowercased name the way Lightroom indexes
/// them; lookups by name elsewhere stay case-sensitive.
pub fn keywords(conn: &Connection) -> Result<BTreeMap<String, i64>, CatalogueError> {
    let mut stmt = conn.prepare(
        "SELECT k.name, COUNT(t.id_local)
         FROM AgLibraryKeyword AS k
         JOIN AgLibraryKeywordImage AS t ON k.id_local = t.tag
         WHERE k.name IS NOT NULL
         GROUP BY k.lc_name
         ORDER BY k.name",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
    })?;

    let mut counts = BTreeMap::new();
    for row in rows {
        let (name, count) = row?;
        *counts.entry(name).or_insert(0) += count;
    }
    Ok(counts)
}

/// Full paths of images carrying exactly `keyword`.
pub fn tagged_by(conn: &Connection, keyword: &str) -> Result<Vec<String>, CatalogueError> {
    let mut stmt = conn.prepare(
        "SELECT i.id_local, f.id_local, r.absolutePath, d.pathFromRoot, f.originalFilename
         FROM Adobe_images AS i
         JOIN AgLibraryFile AS f ON i.rootFile = f.id_local
         JOIN AgLibraryFolder AS d ON f.folder = d.id_local
         JOIN AgLibraryRootFolder AS r ON d.rootFolder = r.id_local
         JOIN AgLibraryKeywordImage AS t ON t.image = i.id_local
         JOIN AgLibraryKeyword AS k ON k.id_local = t.tag
         WHERE k.name = ?1
         ORDER BY r.absolutePath, d.pathFromRoot, f.originalFilename",
    )?;
    let rows = stmt.query_map(params![keyword], row_to_record)?;
    Ok(into_paths(rows.collect::<Result<Vec<_>, _>>()?))
}

/// Full paths of images with no keyword at all.
pub fn untagged(conn: &Connection) -> Result<Vec<String>, CatalogueError> {
    let mut stmt = conn.prepare(
        "SELECT i.id_local, f.id_local, r.absolutePath, d.pathFromRoot, f.originalFilename
         FROM Adobe_images AS i
         JOIN AgLibraryFile AS f ON i.rootFile = f.id_local
         JOIN AgLibraryFolder AS d ON f.folder = d.id_local
         JOIN AgLibraryRootFolder AS r ON d.rootFolder = r.id_local
         WHERE i.id_local NOT IN (
             SELECT DISTINCT image FROM AgLibraryKeywordImage WHERE image IS NOT NULL
         )
         ORDER BY r.absolutePath, d.pathFromRoot, f.originalFilename",
    )?;
    let rows = stmt.query_map([], row_to_record)?;
    Ok(into_paths(rows.collect::<Result<Vec<_>, _>>()?))
}

// ── Collections ─────────────────────────────────────────────────────────────

/// Distinct names of collections that hold at least one image.
pub fn collections(conn: &Connection) -> Result<Vec<String>, CatalogueError> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT c.name
         FROM AgLibraryCollection AS c
         JOIN AgLibraryCollectionImage AS t ON c.id_local = t.collection
         WHERE c.name IS NOT NULL
         ORDER BY c.name",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Full paths of images in the collection named exactly `name`.
pub fn collection(conn: &Connection, name: &str) -> Result<Vec<String>, CatalogueError> {
    let mut stmt = conn.prepare(
        "SELECT i.id_local, f.id_local, r.absolutePath, d.pathFromRoot, f.originalFilename
         FROM Adobe_images AS i
         JOIN AgLibraryFile AS f ON i.rootFile = f.id_local
         JOIN AgLibraryFolder AS d ON f.folder = d.id_local
         JOIN AgLibraryRootFolder AS r ON d.rootFolder = r.id_local
         JOIN AgLibraryCollectionImage AS t ON t.image = i.id_local
         JOIN AgLibraryCollection AS c ON c.id_local = t.collection
         WHERE c.name = ?1
         ORDER BY r.absolutePath, d.pathFromRoot, f.originalFilename",
    )?;
    let rows = stmt.query_map(params![name], row_to_record)?;
    Ok(into_paths(rows.collect::<Result<Vec<_>, _>>()?))
}

// ── Inventory ───────────────────────────────────────────────────────────────

/// Every image record, ordered by `(root, path, filename)`.
///
/// Only the folder an image sits in is considered; images in nested folders
/// under a root are listed by their own folder row, not discovered by walking.
pub fn all_records(conn: &Connection) -> Result<Vec<ImageRecord>, CatalogueError> {
    let mut stmt = conn.prepare(
        "SELECT i.id_local, f.id_local, r.absolutePath, d.pathFromRoot, f.originalFilename
         FROM Adobe_images AS i
         JOIN AgLibraryFile AS f ON i.rootFile = f.id_local
         JOIN AgLibraryFolder AS d ON f.folder = d.id_local
         JOIN AgLibraryRootFolder AS r ON d.rootFolder = r.id_local
         ORDER BY r.absolutePath, d.pathFromRoot, f.originalFilename",
    )?;
    let rows = stmt.query_map([], row_to_record)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Full paths of every image in the catalogue.
pub fn all_files(conn: &Connection) -> Result<Vec<String>, CatalogueError> {
    Ok(into_paths(all_records(conn)?))
}

/// Image records whose file row has the given `baseName` (filename stem).
pub fn records_by_base_name(
    conn: &Connection,
    base_name: &str,
) -> Result<Vec<ImageRecord>, CatalogueError> {
    let mut stmt = conn.prepare_cached(
        "SELECT i.id_local, f.id_local, r.absolutePath, d.pathFromRoot, f.originalFilename
         FROM Adobe_images AS i
         JOIN AgLibraryFile AS f ON i.rootFile = f.id_local
         JOIN AgLibraryFolder AS d ON f.folder = d.id_local
         JOIN AgLibraryRootFolder AS r ON d.rootFolder = r.id_local
         WHERE f.baseName = ?1
         ORDER BY i.id_local",
    )?;
    let rows = stmt.query_map(params![base_name], row_to_record)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Number of rows in `Adobe_images`.
pub fn image_count(conn: &Connection) -> Result<i64, CatalogueError> {
    let sql = format!("SELECT COUNT(*) FROM {}", quote_ident(IMAGES_TABLE));
    let count = conn.query_row(&sql, [], |row| row.get(0))?;
    Ok(count)
}
