use serde::{Deserialize, Serialize};

/// Task lifecycle: Pending → In Progress → Completed.
///
/// Transitions are free in either direction. Entering Completed stamps
/// `completed_at`, leaving it clears the stamp (see `TaskItem::set_status`).
/// Variant order defines the sort order for status-sorted listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaskStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}
