use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatsResponse {
    pub total_users: usize,
    pub role_counts: Vec<RoleUserCount>,
    pub top_users: Vec<UserTaskCount>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleUserCount {
    pub role_id: u32,
    pub role_name: String,
    pub user_count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTaskCount {
    pub id: Uuid,
    pub full_name: String,
    pub role: String,
    pub task_count: usize,
    pub completed_tasks: usize,
}
