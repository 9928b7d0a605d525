use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use super::due_date;
use crate::task_priority::TaskPriority;
use crate::task_status::TaskStatus;

/// Partial update: only fields present in the request are applied.
/// A present `assigned_user_ids` replaces the whole assignment set.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub category: Option<String>,
    #[serde(deserialize_with = "due_date::opt::deserialize")]
    pub due_date: Option<DateTime<Utc>>,
    pub estimated_hours: Option<u32>,
    pub actual_hours: Option<u32>,
    pub assigned_user_ids: Option<Vec<Uuid>>,
}
