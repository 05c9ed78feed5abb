use albums_core::db::migrations::latest_version;
use albums_core::db::{open_db_in_memory, seed_sample_albums};
use albums_core::{
    AlbumRepository, NewAlbum, RepoError, SqliteAlbumRepository, StoreKey, StoreOp,
};
use rusqlite::{Connection, ErrorCode};
use std::error::Error;

fn seeded_conn() -> Connection {
    let mut conn = open_db_in_memory().unwrap();
    assert_eq!(seed_sample_albums(&mut conn).unwrap(), 4);
    conn
}

fn album_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM album;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn find_by_artist_returns_every_exact_match() {
    let conn = seeded_conn();
    let repo = SqliteAlbumRepository::try_new(&conn).unwrap();

    let mut titles: Vec<_> = repo
        .find_by_artist("John Coltrane")
        .unwrap()
        .into_iter()
        .map(|album| album.title)
        .collect();
    titles.sort();

    assert_eq!(titles, vec!["Blue Train", "Giant Steps"]);
}

#[test]
fn find_by_artist_is_exact_not_pattern_match() {
    let conn = seeded_conn();
    let repo = SqliteAlbumRepository::try_new(&conn).unwrap();

    assert!(repo.find_by_artist("John%").unwrap().is_empty());
    assert!(repo.find_by_artist("john coltrane").unwrap().is_empty());
}

#[test]
fn find_by_artist_without_matches_returns_empty() {
    let conn = seeded_conn();
    let repo = SqliteAlbumRepository::try_new(&conn).unwrap();

    let albums = repo.find_by_artist("Nobody At All").unwrap();
    assert!(albums.is_empty());
}

#[test]
fn find_by_id_returns_the_row() {
    let conn = seeded_conn();
    let repo = SqliteAlbumRepository::try_new(&conn).unwrap();

    let album = repo.find_by_id(4).unwrap();
    assert_eq!(album.id, 4);
    assert_eq!(album.title, "Sarah Vaughan");
    assert_eq!(album.artist, "Sarah Vaughan");
    assert_eq!(album.price, 34.98);
}

#[test]
fn find_by_id_missing_returns_not_found() {
    let conn = seeded_conn();
    let repo = SqliteAlbumRepository::try_new(&conn).unwrap();

    let err = repo.find_by_id(999).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(999)));
    assert!(err.is_not_found());
    assert_eq!(err.store_op(), None);
    assert!(err.to_string().contains("999"));
}

#[test]
fn insert_then_find_by_id_roundtrips_fields() {
    let conn = seeded_conn();
    let repo = SqliteAlbumRepository::try_new(&conn).unwrap();

    let draft = NewAlbum::new("Cinta Kasih New", "Firman New", 43.33);
    let id = repo.insert(&draft).unwrap();
    assert!(id > 0);

    let loaded = repo.find_by_id(id).unwrap();
    assert_eq!(loaded, draft.with_id(id));
}

#[test]
fn insert_assigns_fresh_ids_and_never_reuses_deleted_ones() {
    let conn = seeded_conn();
    let repo = SqliteAlbumRepository::try_new(&conn).unwrap();

    assert_eq!(repo.delete(4).unwrap(), 1);
    let first = repo.insert(&NewAlbum::new("A", "B", 1.0)).unwrap();
    let second = repo.insert(&NewAlbum::new("C", "D", 2.0)).unwrap();

    assert_eq!(first, 5);
    assert_eq!(second, 6);
}

#[test]
fn update_existing_row_reports_one_and_persists() {
    let conn = seeded_conn();
    let repo = SqliteAlbumRepository::try_new(&conn).unwrap();

    let replacement = NewAlbum::new("New New Album", "New New Firman", 99.33);
    assert_eq!(repo.update(2, &replacement).unwrap(), 1);

    let loaded = repo.find_by_id(2).unwrap();
    assert_eq!(loaded, replacement.with_id(2));
}

#[test]
fn update_missing_row_reports_zero_without_error() {
    let conn = seeded_conn();
    let repo = SqliteAlbumRepository::try_new(&conn).unwrap();

    let replacement = NewAlbum::new("Ghost", "Nobody", 1.0);
    assert_eq!(repo.update(999, &replacement).unwrap(), 0);
    assert_eq!(album_count(&conn), 4);
}

#[test]
fn update_with_identical_values_reports_matched_row() {
    let conn = seeded_conn();
    let repo = SqliteAlbumRepository::try_new(&conn).unwrap();

    let unchanged = repo.find_by_id(1).unwrap().fields();
    assert_eq!(repo.update(1, &unchanged).unwrap(), 1);
}

#[test]
fn delete_is_idempotent_in_outcome() {
    let conn = seeded_conn();
    let repo = SqliteAlbumRepository::try_new(&conn).unwrap();

    assert_eq!(repo.delete(3).unwrap(), 1);
    assert_eq!(repo.delete(3).unwrap(), 0);
    assert!(repo.find_by_id(3).unwrap_err().is_not_found());
    assert_eq!(album_count(&conn), 3);
}

#[test]
fn artist_names_with_sql_metacharacters_are_literals() {
    let conn = seeded_conn();
    let repo = SqliteAlbumRepository::try_new(&conn).unwrap();

    let hostile = "x'; DROP TABLE album; --";
    assert!(repo.find_by_artist(hostile).unwrap().is_empty());
    assert_eq!(album_count(&conn), 4);

    let id = repo
        .insert(&NewAlbum::new("Quoted \"Title\"", "Sinéad O'Connor", 12.5))
        .unwrap();
    let found = repo.find_by_artist("Sinéad O'Connor").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, id);
    assert_eq!(found[0].title, "Quoted \"Title\"");
}

#[test]
fn store_failure_on_query_carries_operation_key_and_cause() {
    let conn = seeded_conn();
    let repo = SqliteAlbumRepository::try_new(&conn).unwrap();
    conn.execute_batch("DROP TABLE album;").unwrap();

    let err = repo.find_by_artist("John Coltrane").unwrap_err();
    match &err {
        RepoError::Store { op, key, .. } => {
            assert_eq!(*op, StoreOp::FindByArtist);
            assert_eq!(*key, StoreKey::Artist("John Coltrane".to_string()));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.source().is_some());
    let message = err.to_string();
    assert!(message.starts_with("find_by_artist \"John Coltrane\""));
    assert!(message.contains("no such table"));

    let by_id = repo.find_by_id(1).unwrap_err();
    assert!(!by_id.is_not_found());
    assert_eq!(by_id.store_op(), Some(StoreOp::FindById));
}

#[test]
fn undecodable_rows_surface_as_store_failures_and_release_the_cursor() {
    let conn = seeded_conn();
    let repo = SqliteAlbumRepository::try_new(&conn).unwrap();
    conn.execute(
        "INSERT INTO album (title, artist, price) VALUES ('x', 'John Coltrane', 'abc');",
        [],
    )
    .unwrap();
    let bad_id = conn.last_insert_rowid();

    let by_artist = repo.find_by_artist("John Coltrane").unwrap_err();
    match &by_artist {
        RepoError::Store { op, key, source } => {
            assert_eq!(*op, StoreOp::FindByArtist);
            assert_eq!(*key, StoreKey::Artist("John Coltrane".to_string()));
            assert!(source.to_string().contains("price"));
        }
        other => panic!("unexpected error: {other}"),
    }

    let by_id = repo.find_by_id(bad_id).unwrap_err();
    assert!(!by_id.is_not_found());
    assert!(matches!(
        by_id,
        RepoError::Store {
            op: StoreOp::FindById,
            key: StoreKey::Id(id),
            ..
        } if id == bad_id
    ));

    assert_eq!(repo.delete(bad_id).unwrap(), 1);
    assert_eq!(repo.find_by_artist("John Coltrane").unwrap().len(), 2);
    // Fails with "table is locked" while any reader statement is still open.
    conn.execute_batch("DROP TABLE album;").unwrap();
}

#[test]
fn rejected_insert_leaves_no_row_behind() {
    let conn = seeded_conn();
    let repo = SqliteAlbumRepository::try_new(&conn).unwrap();
    conn.execute_batch(
        "CREATE TRIGGER album_read_only BEFORE INSERT ON album
         BEGIN
            SELECT RAISE(ABORT, 'catalog is read-only');
         END;",
    )
    .unwrap();

    let err = repo
        .insert(&NewAlbum::new("Cinta Kasih New", "Firman New", 43.33))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Store {
            op: StoreOp::Insert,
            key: StoreKey::None,
            ..
        }
    ));
    assert!(err.to_string().contains("catalog is read-only"));
    match &err {
        RepoError::Store { source, .. } => {
            assert_eq!(source.sqlite_code(), Some(ErrorCode::ConstraintViolation));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(album_count(&conn), 4);
}

#[test]
fn write_failures_name_the_target_id() {
    let conn = seeded_conn();
    let repo = SqliteAlbumRepository::try_new(&conn).unwrap();
    conn.execute_batch("DROP TABLE album;").unwrap();

    let update_err = repo
        .update(2, &NewAlbum::new("t", "a", 1.0))
        .unwrap_err();
    assert!(matches!(
        update_err,
        RepoError::Store {
            op: StoreOp::Update,
            key: StoreKey::Id(2),
            ..
        }
    ));

    let delete_err = repo.delete(3).unwrap_err();
    assert!(delete_err.to_string().starts_with("delete 3:"));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteAlbumRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_album_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteAlbumRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("album"))
    ));
}

#[test]
fn repository_rejects_connection_missing_price_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE album (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            artist TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteAlbumRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "album",
            column: "price"
        })
    ));
}
