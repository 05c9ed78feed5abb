//! Demonstration driver for the album catalog.
//!
//! # Responsibility
//! - Run the fixed five-step CRUD walkthrough against any repository.
//! - Render results as human-readable console lines.
//!
//! # Invariants
//! - Steps run strictly in order; the first error stops the walkthrough.

use albums_core::{Album, AlbumId, AlbumRepository, AlbumService, NewAlbum, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, Write};

pub const DEMO_ARTIST: &str = "John Coltrane";
pub const DEMO_LOOKUP_ID: AlbumId = 4;
pub const DEMO_UPDATE_ID: AlbumId = 2;
pub const DEMO_DELETE_ID: AlbumId = 3;

/// Album inserted by the walkthrough.
pub fn demo_insert_album() -> NewAlbum {
    NewAlbum::new("Cinta Kasih New", "Firman New", 43.33)
}

/// Replacement written over `DEMO_UPDATE_ID`.
pub fn demo_update_album() -> NewAlbum {
    NewAlbum::new("New New Album", "New New Firman", 99.33)
}

#[derive(Debug)]
pub enum DemoError {
    Repo(RepoError),
    Output(io::Error),
}

impl Display for DemoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Output(err) => write!(f, "failed to write output: {err}"),
        }
    }
}

impl Error for DemoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Output(err) => Some(err),
        }
    }
}

impl From<RepoError> for DemoError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<io::Error> for DemoError {
    fn from(value: io::Error) -> Self {
        Self::Output(value)
    }
}

/// What the walkthrough observed, for callers that want more than text.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoReport {
    pub albums_by_artist: Vec<Album>,
    pub album_by_id: Album,
    pub inserted_id: AlbumId,
    pub updated_rows: usize,
    pub deleted_rows: usize,
}

/// Runs query-by-artist, query-by-id, insert, update and delete in order.
pub fn run_demo<R, W>(service: &AlbumService<R>, out: &mut W) -> Result<DemoReport, DemoError>
where
    R: AlbumRepository,
    W: Write,
{
    let albums = service.albums_by_artist(DEMO_ARTIST)?;
    writeln!(out, "Albums found: {}", format_albums(&albums))?;

    let album = service.album_by_id(DEMO_LOOKUP_ID)?;
    writeln!(out, "Album found: {album}")?;

    let inserted = demo_insert_album();
    let inserted_id = service.add_album(&inserted)?;
    writeln!(out, "Inserted album id {inserted_id}, data: {inserted}")?;

    let replacement = demo_update_album();
    let updated_rows = service.edit_album(DEMO_UPDATE_ID, &replacement)?;
    writeln!(
        out,
        "Updated album rows affected {updated_rows}, data: {replacement}"
    )?;

    let deleted_rows = service.delete_album(DEMO_DELETE_ID)?;
    writeln!(out, "Album deleted, row affected: {deleted_rows}")?;

    Ok(DemoReport {
        albums_by_artist: albums,
        album_by_id: album,
        inserted_id,
        updated_rows,
        deleted_rows,
    })
}

fn format_albums(albums: &[Album]) -> String {
    let items: Vec<String> = albums.iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(" "))
}
