//! Core use-case services.
//!
//! # Responsibility
//! - Expose the data-store and project-directory seams consumed by the screen.
//! - Orchestrate repository calls and map their errors to user-facing classes.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod data_store;
pub mod project_service;
pub mod record_service;
