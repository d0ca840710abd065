//! Project model.
//!
//! Every record belongs to exactly one project; the screen is scoped to the
//! selected project.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a project.
pub type ProjectId = Uuid;

/// Named container that scopes knowledge-base records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    /// Display name, non-empty after trim.
    pub name: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}
