//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service and view orchestration.
//!
//! # Invariants
//! - Repository writes validate drafts before persistence.
//! - Repository APIs return semantic errors (`RecordNotFound`,
//!   `ProjectNotFound`) in addition to DB transport errors.

pub mod project_repo;
pub mod record_repo;
