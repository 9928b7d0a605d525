use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct IdQuery {
    pub id: Uuid,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RoleIdQuery {
    pub id: u32,
}
