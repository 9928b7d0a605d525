use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatsResponse {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub pending_tasks: usize,
    pub in_progress_tasks: usize,
    pub high_priority_tasks: usize,
    pub medium_priority_tasks: usize,
    pub low_priority_tasks: usize,
    pub overdue_tasks: usize,
    /// completed / total × 100; 0 when there are no visible tasks.
    pub completion_rate: f64,
    /// Top assignees by task count. Only present for callers who can see
    /// every task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_assignees: Option<Vec<AssigneeTaskCount>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssigneeTaskCount {
    pub id: Uuid,
    pub full_name: String,
    pub task_count: usize,
    pub completed_tasks: usize,
}
