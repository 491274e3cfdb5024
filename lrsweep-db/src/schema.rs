//! Runtime schema introspection.
//!
//! Lightroom catalogues add and rename tables between versions, so nothing
//! outside the fixed join path is hardcoded: tables that reference images are
//! discovered by looking for an `image` column.

use std::collections::BTreeSet;

use rusqlite::{params, Connection};

use crate::catalogue::CatalogueError;

/// Tables the cascade deletes from by primary key.
pub const IMAGES_TABLE: &str = "Adobe_images";
pub const FILES_TABLE: &str = "AgLibraryFile";
/// Holds the selection pointer rows.
pub const VARIABLES_TABLE: &str = "Adobe_variablesTable";

/// Column that dependent tables use to point at `Adobe_images.id_local`.
pub const IMAGE_COLUMN: &str = "image";

/// A table name and its columns in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescriptor {
    pub name: String,
    pub columns: Vec<String>,
}

impl TableDescriptor {
    /// Exact, case-sensitive column membership.
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}

/// List every table registered in `sqlite_master`, sorted by name.
pub fn list_tables(conn: &Connection) -> Result<Vec<String>, CatalogueError> {
    let mut stmt =
        conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Read the column descriptor of a single table.
///
/// An unknown table yields an empty column list rather than an error.
pub fn describe_table(conn: &Connection, table: &str) -> Result<TableDescriptor, CatalogueError> {
    let mut stmt = conn.prepare_cached("SELECT name FROM pragma_table_info(?1) ORDER BY cid")?;
    let rows = stmt.query_map(params![table], |row| row.get::<_, String>(0))?;
    let columns = rows.collect::<Result<Vec<_>, _>>()?;
    Ok(TableDescriptor {
        name: table.to_string(),
        columns,
    })
}

/// Find every table that has a column named `column`.
///
/// Every table is checked; the first failing descriptor query fails the
/// whole call so callers never see a partial answer.
pub fn tables_with_column(
    conn: &Connection,
    column: &str,
) -> Result<BTreeSet<String>, CatalogueError> {
    let mut found = BTreeSet::new();
    for table in list_tables(conn)? {
        let descriptor = describe_table(conn, &table)?;
        if descriptor.has_column(column) {
            found.insert(descriptor.name);
        }
    }
    Ok(found)
}

/// Quote an identifier for interpolation into SQL text.
///
/// Only used for names that came out of `sqlite_master`; values always go
/// through bound parameters.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Create the subset of the Lightroom schema that the engine reads and writes.
///
/// The engine never creates catalogues itself; this exists so tests and
/// tooling can build small fixture catalogues with the same shape.
pub fn create_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS AgLibraryRootFolder (
    id_local INTEGER PRIMARY KEY,
    id_global TEXT,
    absolutePath TEXT NOT NULL DEFAULT '',
    name TEXT NOT NULL DEFAULT '',
    relativePathFromCatalog TEXT
);

CREATE TABLE IF NOT EXISTS AgLibraryFolder (
    id_local INTEGER PRIMARY KEY,
    id_global TEXT,
    pathFromRoot TEXT NOT NULL DEFAULT '',
    rootFolder INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS AgLibraryFile (
    id_local INTEGER PRIMARY KEY,
    id_global TEXT,
    baseName TEXT NOT NULL DEFAULT '',
    extension TEXT NOT NULL DEFAULT '',
    folder INTEGER NOT NULL DEFAULT 0,
    idx_filename TEXT NOT NULL DEFAULT '',
    lc_idx_filename TEXT NOT NULL DEFAULT '',
    originalFilename TEXT NOT NULL DEFAULT ''
);
CREATE INDEX IF NOT EXISTS index_AgLibraryFile_nameAndFolder ON AgLibraryFile(lc_idx_filename, folder);

CREATE TABLE IF NOT EXISTS Adobe_images (
    id_local INTEGER PRIMARY KEY,
    id_global TEXT,
    captureTime TEXT,
    fileFormat TEXT,
    masterImage INTEGER,
    pick REAL NOT NULL DEFAULT 0,
    rating REAL,
    rootFile INTEGER NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS index_Adobe_images_rootFile ON Adobe_images(rootFile);

CREATE TABLE IF NOT EXISTS AgLibraryKeyword (
    id_local INTEGER PRIMARY KEY,
    id_global TEXT,
    lc_name TEXT,
    name TEXT,
    parent INTEGER
);

CREATE TABLE IF NOT EXISTS AgLibraryKeywordImage (
    id_local INTEGER PRIMARY KEY,
    image INTEGER NOT NULL DEFAULT 0,
    tag INTEGER NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS index_AgLibraryKeywordImage_image ON AgLibraryKeywordImage(image);

CREATE TABLE IF NOT EXISTS AgLibraryCollection (
    id_local INTEGER PRIMARY KEY,
    creationId TEXT NOT NULL DEFAULT '',
    name TEXT,
    parent INTEGER
);

CREATE TABLE IF NOT EXISTS AgLibraryCollectionImage (
    id_local INTEGER PRIMARY KEY,
    collection INTEGER NOT NULL DEFAULT 0,
    image INTEGER NOT NULL DEFAULT 0,
    pick REAL NOT NULL DEFAULT 0,
    positionInCollection TEXT
);

CREATE TABLE IF NOT EXISTS Adobe_imageDevelopSettings (
    id_local INTEGER PRIMARY KEY,
    image INTEGER,
    text TEXT
);

CREATE TABLE IF NOT EXISTS AgHarvestedExifMetadata (
    id_local INTEGER PRIMARY KEY,
    image INTEGER,
    cameraModelRef INTEGER,
    isoSpeedRating REAL
);

CREATE TABLE IF NOT EXISTS Adobe_variablesTable (
    id_local INTEGER PRIMARY KEY,
    id_global TEXT,
    name TEXT,
    type TEXT,
    value TEXT
);
"#;
