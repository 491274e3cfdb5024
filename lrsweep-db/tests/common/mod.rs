//! Fixture helpers shared by the integration tests.

use rusqlite::{params, Connection};

/// Insert an image at `root + path + filename`, creating folder rows as needed.
/// The file record id is `image_id + 1000`.
pub fn add_image(conn: &Connection, image_id: i64, root: &str, path: &str, filename: &str) {
    conn.execute(
        "INSERT INTO AgLibraryRootFolder (absolutePath, name)
         SELECT ?1, ?1 WHERE NOT EXISTS (SELECT 1 FROM AgLibraryRootFolder WHERE absolutePath = ?1)",
        params![root],
    )
    .unwrap();
    let root_id: i64 = conn
        .query_row(
            "SELECT id_local FROM AgLibraryRootFolder WHERE absolutePath = ?1",
            params![root],
            |row| row.get(0),
        )
        .unwrap();
    conn.execute(
        "INSERT INTO AgLibraryFolder (pathFromRoot, rootFolder)
         SELECT ?1, ?2 WHERE NOT EXISTS
             (SELECT 1 FROM AgLibraryFolder WHERE pathFromRoot = ?1 AND rootFolder = ?2)",
        params![path, root_id],
    )
    .unwrap();
    let folder_id: i64 = conn
        .query_row(
            "SELECT id_local FROM AgLibraryFolder WHERE pathFromRoot = ?1 AND rootFolder = ?2",
            params![path, root_id],
            |row| row.get(0),
        )
        .unwrap();
    let (stem, ext) = filename.rsplit_once('.').unwrap_or((filename, ""));
    conn.execute(
        "INSERT INTO AgLibraryFile (id_local, baseName, extension, folder, originalFilename)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![image_id + 1000, stem, ext, folder_id, filename],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO Adobe_images (id_local, rootFile) VALUES (?1, ?2)",
        params![image_id, image_id + 1000],
    )
    .unwrap();
}
