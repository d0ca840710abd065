//! Transient notifications (toasts) queued by screen actions.
//!
//! Notifications are never persisted; the UI drains and displays them.

use serde::Serialize;

/// Shown when a submission fails for a reason the user cannot act on.
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred";
pub const DELETE_SUCCESS_MESSAGE: &str = "Item deleted successfully";
/// Error panel text when loading fails for a reason the user cannot act on.
pub const FETCH_ERROR_MESSAGE: &str = "Failed to load data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Error,
            message: message.into(),
        }
    }
}
