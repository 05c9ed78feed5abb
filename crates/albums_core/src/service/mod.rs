//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Own diagnostic logging so repositories stay silent.

pub mod album_service;
