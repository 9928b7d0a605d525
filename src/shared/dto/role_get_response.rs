use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::authorization::permissions::PermissionSet;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleGetResponse {
    pub id: u32,
    pub name: String,
    pub description: Option<String>,
    #[serde(flatten)]
    pub permissions: PermissionSet,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub user_count: usize,
}
