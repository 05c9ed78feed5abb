//! Album repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `album` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Statements name columns explicitly and bind every input positionally.
//! - Zero affected rows on update/delete is a result, not an error.
//! - Statements and cursors are dropped before each operation returns.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::album::{Album, AlbumId, NewAlbum};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

const ALBUM_TABLE: &str = "album";
const ALBUM_COLUMNS: &[&str] = &["id", "title", "artist", "price"];

macro_rules! album_select_sql {
    () => {
        "SELECT
    id,
    title,
    artist,
    price
FROM album"
    };
}

const ALBUMS_BY_ARTIST_SQL: &str = concat!(album_select_sql!(), " WHERE artist = ?1;");
const ALBUM_BY_ID_SQL: &str = concat!(album_select_sql!(), " WHERE id = ?1;");

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository operation that hit a store failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    FindByArtist,
    FindById,
    Insert,
    Update,
    Delete,
}

impl StoreOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FindByArtist => "find_by_artist",
            Self::FindById => "find_by_id",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl Display for StoreOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input that addressed a failed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreKey {
    Artist(String),
    Id(AlbumId),
    /// Insert has no addressing key.
    None,
}

/// Repository error for album persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// A by-id lookup matched zero rows.
    NotFound(AlbumId),
    /// The store rejected or failed an operation.
    Store {
        op: StoreOp,
        key: StoreKey,
        source: DbError,
    },
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Failure while inspecting the connection during construction.
    Db(DbError),
}

impl RepoError {
    fn store(op: StoreOp, key: StoreKey, source: rusqlite::Error) -> Self {
        Self::Store {
            op,
            key,
            source: DbError::Sqlite(source),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns the failed operation for store failures.
    pub fn store_op(&self) -> Option<StoreOp> {
        match self {
            Self::Store { op, .. } => Some(*op),
            _ => None,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "find_by_id {id}: no such album"),
            Self::Store { op, key, source } => match key {
                StoreKey::Artist(name) => write!(f, "{op} {name:?}: {source}"),
                StoreKey::Id(id) => write!(f, "{op} {id}: {source}"),
                StoreKey::None => write!(f, "{op}: {source}"),
            },
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} is older than required {expected_version}; open it through db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store { source, .. } => Some(source),
            Self::Db(err) => Some(err),
            Self::NotFound(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for album CRUD operations.
pub trait AlbumRepository {
    /// Returns albums whose artist equals `name` exactly, in store order.
    fn find_by_artist(&self, name: &str) -> RepoResult<Vec<Album>>;
    /// Returns the album with `id`, or `RepoError::NotFound`.
    fn find_by_id(&self, id: AlbumId) -> RepoResult<Album>;
    /// Inserts a new row and returns its storage-assigned id.
    fn insert(&self, album: &NewAlbum) -> RepoResult<AlbumId>;
    /// Replaces title/artist/price of row `id`; returns rows affected.
    fn update(&self, id: AlbumId, album: &NewAlbum) -> RepoResult<usize>;
    /// Removes row `id`; returns rows affected.
    fn delete(&self, id: AlbumId) -> RepoResult<usize>;
}

/// SQLite-backed album repository.
pub struct SqliteAlbumRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAlbumRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   does not match the album contract.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl AlbumRepository for SqliteAlbumRepository<'_> {
    fn find_by_artist(&self, name: &str) -> RepoResult<Vec<Album>> {
        let fail = |err: rusqlite::Error| {
            RepoError::store(StoreOp::FindByArtist, StoreKey::Artist(name.to_string()), err)
        };

        let mut stmt = self
            .conn
            .prepare(ALBUMS_BY_ARTIST_SQL)
            .map_err(fail)?;
        let rows = stmt.query_map([name], parse_album_row).map_err(fail)?;

        let mut albums = Vec::new();
        for row in rows {
            albums.push(row.map_err(fail)?);
        }

        Ok(albums)
    }

    fn find_by_id(&self, id: AlbumId) -> RepoResult<Album> {
        self.conn
            .query_row(ALBUM_BY_ID_SQL, [id], parse_album_row)
            .optional()
            .map_err(|err| RepoError::store(StoreOp::FindById, StoreKey::Id(id), err))?
            .ok_or(RepoError::NotFound(id))
    }

    fn insert(&self, album: &NewAlbum) -> RepoResult<AlbumId> {
        self.conn
            .execute(
                "INSERT INTO album (title, artist, price) VALUES (?1, ?2, ?3);",
                params![album.title, album.artist, album.price],
            )
            .map_err(|err| RepoError::store(StoreOp::Insert, StoreKey::None, err))?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update(&self, id: AlbumId, album: &NewAlbum) -> RepoResult<usize> {
        let changed = self
            .conn
            .execute(
                "UPDATE album
                 SET
                    title = ?1,
                    artist = ?2,
                    price = ?3
                 WHERE id = ?4;",
                params![album.title, album.artist, album.price, id],
            )
            .map_err(|err| RepoError::store(StoreOp::Update, StoreKey::Id(id), err))?;

        Ok(changed)
    }

    fn delete(&self, id: AlbumId) -> RepoResult<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM album WHERE id = ?1;", [id])
            .map_err(|err| RepoError::store(StoreOp::Delete, StoreKey::Id(id), err))?;

        Ok(removed)
    }
}

fn parse_album_row(row: &Row<'_>) -> rusqlite::Result<Album> {
    Ok(Album {
        id: row.get("id")?,
        title: row.get("title")?,
        artist: row.get("artist")?,
        price: row.get("price")?,
    })
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: bool = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [ALBUM_TABLE],
        |row| row.get(0),
    )?;
    if !table_exists {
        return Err(RepoError::MissingRequiredTable(ALBUM_TABLE));
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let columns = stmt
        .query_map([ALBUM_TABLE], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<HashSet<_>>>()?;

    for &column in ALBUM_COLUMNS {
        if !columns.contains(column) {
            return Err(RepoError::MissingRequiredColumn {
                table: ALBUM_TABLE,
                column,
            });
        }
    }

    Ok(())
}
