//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Caller-supplied values are always bound as statement parameters.
//! - Repository APIs return semantic errors (`NotFound`) in addition to
//!   store failures, and never log.

pub mod album_repo;
