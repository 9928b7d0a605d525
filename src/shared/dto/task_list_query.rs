use serde::Deserialize;
use uuid::Uuid;

use crate::task_priority::TaskPriority;
use crate::task_status::TaskStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskSortKey {
    DueDate,
    Priority,
    Status,
    CreatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Listing filters and sort. Everything optional; the default listing is
/// all visible tasks, newest first.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskListQuery {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assigned_to: Option<Uuid>,
    pub search: Option<String>,
    pub sort_by: Option<TaskSortKey>,
    pub sort_order: Option<SortOrder>,
}
