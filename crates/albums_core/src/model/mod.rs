//! Domain model for the album catalog.
//!
//! # Responsibility
//! - Define the record shapes shared by repository, service and driver.
//!
//! # Invariants
//! - Every stored album is identified by a storage-assigned `AlbumId`.
//! - Values headed for storage never carry an id.

pub mod album;
