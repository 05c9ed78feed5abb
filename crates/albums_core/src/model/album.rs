//! Album domain model.
//!
//! # Responsibility
//! - Define the stored `Album` record and the id-less `NewAlbum` payload.
//!
//! # Invariants
//! - `id` is assigned by storage on insert and never chosen by callers.
//! - An `Album` read from storage has all four fields populated.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Storage-assigned surrogate key of an album row.
pub type AlbumId = i64;

/// Album fields without identity, used for insert and update payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAlbum {
    pub title: String,
    pub artist: String,
    pub price: f64,
}

impl NewAlbum {
    pub fn new(title: impl Into<String>, artist: impl Into<String>, price: f64) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            price,
        }
    }

    /// Attaches a storage-assigned id, producing the stored shape.
    pub fn with_id(self, id: AlbumId) -> Album {
        Album {
            id,
            title: self.title,
            artist: self.artist,
            price: self.price,
        }
    }
}

impl Display for NewAlbum {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{} {} {}}}", self.title, self.artist, self.price)
    }
}

/// One persisted album row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    /// Surrogate key. Unique and immutable once assigned.
    pub id: AlbumId,
    pub title: String,
    pub artist: String,
    /// Stored as SQLite `REAL`.
    pub price: f64,
}

impl Album {
    /// Returns the replaceable fields of this album.
    pub fn fields(&self) -> NewAlbum {
        NewAlbum {
            title: self.title.clone(),
            artist: self.artist.clone(),
            price: self.price,
        }
    }
}

impl Display for Album {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{{} {} {} {}}}",
            self.id, self.title, self.artist, self.price
        )
    }
}
