use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::task_priority::TaskPriority;
use crate::task_status::TaskStatus;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub category: Option<String>,
    pub assigned_users: Vec<TaskAssignee>,
    pub created_by_id: Uuid,
    pub created_by_name: Option<String>,
    pub due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub estimated_hours: Option<u32>,
    pub actual_hours: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAssignee {
    pub id: Uuid,
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub role: String,
}
