//! Knowledge-base screen logic.
//!
//! # Responsibility
//! - Filter fetched records and dispatch each one to a card variant.
//! - Compute display-only derived fields.
//! - Drive the add form, deletion and list states of the screen.
//!
//! Everything here is synchronous and performs no I/O of its own; the store
//! and project directory are passed in by the caller.

pub mod dispatch;
pub mod display;
pub mod filter;
pub mod form;
pub mod notify;
pub mod screen;
