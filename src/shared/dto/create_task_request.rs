use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use super::due_date;
use crate::task_priority::TaskPriority;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    #[serde(default = "default_priority")]
    pub priority: TaskPriority,
    pub category: Option<String>,
    #[serde(deserialize_with = "due_date::deserialize")]
    pub due_date: DateTime<Utc>,
    pub estimated_hours: Option<u32>,
    #[serde(default)]
    pub assigned_user_ids: Vec<Uuid>,
}

fn default_priority() -> TaskPriority {
    TaskPriority::Medium
}
