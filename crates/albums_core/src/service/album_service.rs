//! Album use-case service.
//!
//! # Responsibility
//! - Provide stable CRUD entry points for the demonstration driver.
//! - Delegate persistence to repository implementations.
//! - Emit one metadata-only logging event per call.
//!
//! # Invariants
//! - Results and errors from the repository pass through unchanged.
//! - Service layer remains storage-agnostic and never retries.

use crate::model::album::{Album, AlbumId, NewAlbum};
use crate::repo::album_repo::{AlbumRepository, RepoResult};
use log::{debug, warn};
use std::time::Instant;

/// Use-case service wrapper for album CRUD operations.
pub struct AlbumService<R: AlbumRepository> {
    repo: R,
}

impl<R: AlbumRepository> AlbumService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns the wrapped repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Lists albums by exact artist name.
    pub fn albums_by_artist(&self, name: &str) -> RepoResult<Vec<Album>> {
        let started_at = Instant::now();
        let result = self.repo.find_by_artist(name);
        match &result {
            Ok(albums) => debug!(
                "event=albums_by_artist module=album_service status=ok duration_ms={} rows={}",
                started_at.elapsed().as_millis(),
                albums.len()
            ),
            Err(err) => warn!(
                "event=albums_by_artist module=album_service status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    /// Gets one album by id.
    ///
    /// A missing row is logged at debug level; it is an expected outcome.
    pub fn album_by_id(&self, id: AlbumId) -> RepoResult<Album> {
        let started_at = Instant::now();
        let result = self.repo.find_by_id(id);
        match &result {
            Ok(_) => debug!(
                "event=album_by_id module=album_service status=ok duration_ms={} id={id}",
                started_at.elapsed().as_millis()
            ),
            Err(err) if err.is_not_found() => debug!(
                "event=album_by_id module=album_service status=not_found duration_ms={} id={id}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=album_by_id module=album_service status=error duration_ms={} id={id} error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    /// Adds an album and returns its new id.
    pub fn add_album(&self, album: &NewAlbum) -> RepoResult<AlbumId> {
        let started_at = Instant::now();
        let result = self.repo.insert(album);
        match &result {
            Ok(id) => debug!(
                "event=add_album module=album_service status=ok duration_ms={} id={id}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=add_album module=album_service status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    /// Replaces the fields of album `id`; returns rows affected.
    pub fn edit_album(&self, id: AlbumId, album: &NewAlbum) -> RepoResult<usize> {
        let started_at = Instant::now();
        let result = self.repo.update(id, album);
        log_write("edit_album", id, started_at, &result);
        result
    }

    /// Deletes album `id`; returns rows affected.
    pub fn delete_album(&self, id: AlbumId) -> RepoResult<usize> {
        let started_at = Instant::now();
        let result = self.repo.delete(id);
        log_write("delete_album", id, started_at, &result);
        result
    }
}

fn log_write(event: &str, id: AlbumId, started_at: Instant, result: &RepoResult<usize>) {
    match result {
        Ok(rows) => debug!(
            "event={event} module=album_service status=ok duration_ms={} id={id} rows_affected={rows}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => warn!(
            "event={event} module=album_service status=error duration_ms={} id={id} error={}",
            started_at.elapsed().as_millis(),
            err
        ),
    }
}
