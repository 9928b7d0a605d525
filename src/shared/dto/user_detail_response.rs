use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::user_get_response::UserGetResponse;
use crate::task_priority::TaskPriority;
use crate::task_status::TaskStatus;

/// Profile view: the user plus a summary of their assigned tasks.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetailResponse {
    #[serde(flatten)]
    pub user: UserGetResponse,
    pub tasks: Vec<TaskSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSummary {
    pub id: Uuid,
    pub title: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
