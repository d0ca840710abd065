//! Authentication gate between the login flow and the protected shell.
//!
//! Session and token handling belong to the auth provider; this module only
//! decides which shell to show.

pub mod gate;
