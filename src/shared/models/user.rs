use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user_get_response::UserGetResponse;

/// An account. The argon2 hash never leaves the store: every outbound
/// shape goes through `to_get_dto`, which does not carry it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(
        full_name: String,
        username: String,
        email: String,
        password_hash: String,
        role_id: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            full_name,
            username,
            email,
            password_hash,
            role_id,
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    pub fn to_get_dto(&self, role_name: &str) -> UserGetResponse {
        UserGetResponse {
            id: self.id,
            full_name: self.full_name.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            role: role_name.to_string(),
            role_id: self.role_id,
            created_at: self.created_at,
            is_active: self.is_active,
        }
    }
}
