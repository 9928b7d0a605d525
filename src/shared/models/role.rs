use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::authorization::permissions::PermissionSet;

/// Roles with an id at or below this are the seeded defaults: they cannot be
/// renamed or deleted, though their permission flags stay adjustable.
pub const DEFAULT_ROLE_COUNT: u32 = 4;

/// Fallback role for newly created accounts when the creator is not allowed
/// to pick one (the seeded "User" role).
pub const DEFAULT_USER_ROLE_ID: u32 = 4;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: u32,
    pub name: String,
    pub description: Option<String>,
    pub permissions: PermissionSet,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Role {
    pub fn is_default(&self) -> bool {
        self.id <= DEFAULT_ROLE_COUNT
    }
}
