//! Connection provisioning for the album catalog.
//!
//! # Responsibility
//! - Hand out SQLite connections whose `album` table is ready for the
//!   repository, with a bounded busy timeout.
//! - Keep the schema version in step with the binary.
//! - Seed the sample `recordings` catalog on request.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - A database written by a newer binary is refused, never downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;
mod seed;

pub use open::{open_db, open_db_in_memory, open_db_with_config, DEFAULT_BUSY_TIMEOUT};
pub use seed::{sample_albums, seed_sample_albums};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening, migrating or querying the catalog database.
#[derive(Debug)]
pub enum DbError {
    /// Driver-level failure: open, pragma, statement or row decode.
    Sqlite(rusqlite::Error),
    /// The file was migrated by a newer build than this one.
    UnsupportedSchemaVersion { db_version: u32, latest_supported: u32 },
}

impl DbError {
    /// Returns the SQLite result code when the driver reported one.
    pub fn sqlite_code(&self) -> Option<rusqlite::ErrorCode> {
        match self {
            Self::Sqlite(err) => err.sqlite_error_code(),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => Display::fmt(err, f),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "catalog schema version {db_version} is newer than this build supports ({latest_supported})"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
