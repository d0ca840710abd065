//! Flutter-facing bindings over `knowbase_core`.

pub mod api;
