use std::path::PathBuf;

use lrsweep_db::*;
use rusqlite::params;
use tempfile::TempDir;

mod common;

use common::add_image;

fn count(conn: &Connection, sql: &str) -> i64 {
    conn.query_row(sql, [], |row| row.get(0)).unwrap()
}

fn pointers(catalogue: &Catalogue) -> SelectionPointers {
    catalogue
        .read(|conn| read_selection(conn, SelectionSlots::default()))
        .unwrap()
}

fn paths(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Images 3, 7 and 9 in `/a/`, image 7 tagged, in a collection, with develop
/// settings and EXIF rows, and set as the active image.
fn setup(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("operations.lrcat");
    let conn = Connection::open(&path).unwrap();
    create_schema(&conn).unwrap();

    add_image(&conn, 3, "/a/", "", "1.jpg");
    add_image(&conn, 7, "/a/", "", "2.jpg");
    add_image(&conn, 9, "/a/", "", "5.jpg");

    conn.execute_batch(
        "INSERT INTO AgLibraryKeyword (id_local, name, lc_name) VALUES (1, 'Beach', 'beach');
         INSERT INTO AgLibraryKeywordImage (image, tag) VALUES (7, 1), (3, 1);
         INSERT INTO AgLibraryCollection (id_local, name) VALUES (1, 'Prints');
         INSERT INTO AgLibraryCollectionImage (image, collection) VALUES (7, 1), (9, 1);
         INSERT INTO Adobe_imageDevelopSettings (image, text) VALUES (7, 's'), (9, 's');
         INSERT INTO AgHarvestedExifMetadata (image) VALUES (7), (3);
         INSERT INTO Adobe_variablesTable (id_local, name, value) VALUES
             (1, 'active', '7'),
             (2, 'selected', '9');",
    )
    .unwrap();

    path
}

#[test]
fn removes_image_and_dependents_and_repairs_active_pointer() {
    let dir = TempDir::new().unwrap();
    let path = setup(&dir);
    let catalogue = Catalogue::open(&path).unwrap();

    let report = catalogue.remove_files(&paths(&["/a/2.jpg"])).unwrap();
    assert_eq!(report.images_removed, 1);
    assert_eq!(report.files_removed, 1);
    assert!(report.selection_repaired);
    assert_eq!(report.selection_target, Some(3));
    let dependent: usize = report.dependent_rows.iter().map(|(_, n)| n).sum();
    assert_eq!(dependent, 4);

    assert_eq!(catalogue.mode(), Some(Mode::ReadOnly));
    assert_eq!(catalogue.all_files().unwrap(), vec!["/a/1.jpg", "/a/5.jpg"]);
    assert_eq!(
        pointers(&catalogue),
        SelectionPointers {
            active: Some("3".to_string()),
            selected: Some("3".to_string()),
        }
    );
    catalogue.close().unwrap();

    let conn = Connection::open(&path).unwrap();
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM AgLibraryKeywordImage WHERE image = 7"), 0);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM AgLibraryKeywordImage"), 1);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM Adobe_images WHERE id_local = 7"), 0);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM AgLibraryFile WHERE id_local = 1007"), 0);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM AgLibraryFile"), 2);
}

#[test]
fn no_dependent_row_survives_for_removed_images() {
    let dir = TempDir::new().unwrap();
    let path = setup(&dir);
    let catalogue = Catalogue::open(&path).unwrap();

    catalogue
        .remove_files(&paths(&["/a/2.jpg", "/a/5.jpg"]))
        .unwrap();
    let tables = catalogue.tables_with_column("image").unwrap();
    catalogue.close().unwrap();

    let conn = Connection::open(&path).unwrap();
    for table in &tables {
        let remaining = count(
            &conn,
            &format!("SELECT COUNT(*) FROM \"{}\" WHERE image IN (7, 9)", table),
        );
        assert_eq!(remaining, 0, "{} still references a removed image", table);
    }
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM AgHarvestedExifMetadata"), 1);
}

#[test]
fn pointers_to_surviving_images_are_left_alone() {
    let dir = TempDir::new().unwrap();
    let path = setup(&dir);
    let catalogue = Catalogue::open(&path).unwrap();
    let before = pointers(&catalogue);

    let report = catalogue.remove_files(&paths(&["/a/1.jpg"])).unwrap();
    assert_eq!(report.images_removed, 1);
    assert!(!report.selection_repaired);
    assert_eq!(pointers(&catalogue), before);
}

#[test]
fn selected_list_pointer_triggers_repair() {
    let dir = TempDir::new().unwrap();
    let path = setup(&dir);
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute(
            "UPDATE Adobe_variablesTable SET value = ?1 WHERE id_local = ?2",
            params!["3,9", 2],
        )
        .unwrap();
        conn.execute(
            "UPDATE Adobe_variablesTable SET value = ?1 WHERE id_local = ?2",
            params!["3", 1],
        )
        .unwrap();
    }
    let catalogue = Catalogue::open(&path).unwrap();

    let report = catalogue.remove_files(&paths(&["/a/5.jpg"])).unwrap();
    assert!(report.selection_repaired);
    assert_eq!(pointers(&catalogue).selected.as_deref(), Some("3"));
}

#[test]
fn shared_base_name_only_removes_the_requested_path() {
    let dir = TempDir::new().unwrap();
    let path = setup(&dir);
    {
        let conn = Connection::open(&path).unwrap();
        add_image(&conn, 8, "/b/", "", "2.jpg");
        add_image(&conn, 10, "/a/", "", "2.CR2");
    }
    let catalogue = Catalogue::open(&path).unwrap();

    let plan = catalogue.plan_deletion(&paths(&["/a/2.jpg"])).unwrap();
    assert_eq!(plan.image_ids.into_iter().collect::<Vec<_>>(), vec![7]);
    assert_eq!(plan.file_ids.into_iter().collect::<Vec<_>>(), vec![1007]);

    catalogue.remove_files(&paths(&["/a/2.jpg"])).unwrap();
    let files = catalogue.all_files().unwrap();
    assert!(files.contains(&"/b/2.jpg".to_string()));
    assert!(files.contains(&"/a/2.CR2".to_string()));
    assert!(!files.contains(&"/a/2.jpg".to_string()));
}

#[test]
fn plan_is_inspectable_and_does_not_mutate() {
    let dir = TempDir::new().unwrap();
    let catalogue = Catalogue::open(&setup(&dir)).unwrap();

    let plan = catalogue
        .plan_deletion(&paths(&["/a/2.jpg", "/nowhere/x.jpg"]))
        .unwrap();
    assert_eq!(plan.records.len(), 1);
    assert_eq!(plan.records[0].full_path(), "/a/2.jpg");
    assert_eq!(plan.unresolved, vec!["/nowhere/x.jpg"]);
    assert!(plan.tables.contains(&"AgLibraryKeywordImage".to_string()));
    assert!(plan.repairs_selection());
    assert_eq!(catalogue.image_count().unwrap(), 3);

    let report = catalogue.apply_plan(&plan).unwrap();
    assert_eq!(report.images_removed, 1);
    assert_eq!(catalogue.image_count().unwrap(), 2);
}

#[test]
fn unknown_paths_leave_catalogue_untouched() {
    let dir = TempDir::new().unwrap();
    let catalogue = Catalogue::open(&setup(&dir)).unwrap();

    let report = catalogue.remove_files(&paths(&["/a/404.jpg"])).unwrap();
    assert_eq!(report, DeletionReport::default());
    assert_eq!(catalogue.image_count().unwrap(), 3);
    assert_eq!(catalogue.mode(), Some(Mode::ReadOnly));
}

#[test]
fn failure_mid_cascade_rolls_back_and_restores_read_only() {
    let dir = TempDir::new().unwrap();
    let path = setup(&dir);
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TRIGGER refuse_file_delete BEFORE DELETE ON AgLibraryFile
             BEGIN SELECT RAISE(ABORT, 'file rows are locked'); END;",
        )
        .unwrap();
    }
    let catalogue = Catalogue::open(&path).unwrap();

    let result = catalogue.remove_files(&paths(&["/a/2.jpg"]));
    assert!(matches!(result, Err(CatalogueError::Transaction(_))));
    assert_eq!(catalogue.mode(), Some(Mode::ReadOnly));

    // Nothing from the partial cascade survived.
    assert_eq!(catalogue.image_count().unwrap(), 3);
    assert_eq!(catalogue.tagged_by("Beach").unwrap(), vec!["/a/1.jpg", "/a/2.jpg"]);
    assert_eq!(pointers(&catalogue).active.as_deref(), Some("7"));

    // Still usable once the obstacle is gone.
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch("DROP TRIGGER refuse_file_delete;").unwrap();
    }
    catalogue.remove_files(&paths(&["/a/2.jpg"])).unwrap();
    assert_eq!(catalogue.image_count().unwrap(), 2);
}

#[test]
fn removing_every_image_clears_the_pointers() {
    let dir = TempDir::new().unwrap();
    let catalogue = Catalogue::open(&setup(&dir)).unwrap();

    let report = catalogue
        .remove_files(&paths(&["/a/1.jpg", "/a/2.jpg", "/a/5.jpg"]))
        .unwrap();
    assert_eq!(report.images_removed, 3);
    assert!(report.selection_repaired);
    assert_eq!(report.selection_target, None);
    assert_eq!(pointers(&catalogue), SelectionPointers::default());
    assert!(catalogue.all_files().unwrap().is_empty());
}

#[test]
fn custom_slots_are_honoured() {
    let dir = TempDir::new().unwrap();
    let path = setup(&dir);
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "INSERT INTO Adobe_variablesTable (id_local, name, value) VALUES
                 (40, 'custom_active', '9'),
                 (41, 'custom_selected', '9');",
        )
        .unwrap();
    }
    let slots = SelectionSlots {
        active: 40,
        selected: 41,
    };
    let catalogue = Catalogue::open(&path).unwrap().with_slots(slots);

    let report = catalogue.remove_files(&paths(&["/a/5.jpg"])).unwrap();
    assert!(report.selection_repaired);
    let custom = catalogue.read(|conn| read_selection(conn, slots)).unwrap();
    assert_eq!(custom.active.as_deref(), Some("3"));
    // Default slots pointed at 7 and 9; they are not this catalogue's pointers.
    assert_eq!(pointers(&catalogue).active.as_deref(), Some("7"));
}
