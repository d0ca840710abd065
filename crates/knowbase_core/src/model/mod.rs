//! Domain model for knowledge-base projects and records.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep one record shape for the four content kinds.
//!
//! # Invariants
//! - Every record is identified by a stable `RecordId`.
//! - Every record references an owning `ProjectId`.
//! - Deletion is a hard delete; there is no in-place edit.

pub mod project;
pub mod record;
