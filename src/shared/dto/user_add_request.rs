use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAddRequest {
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    /// Honored only when the caller may manage roles; defaults to the
    /// regular User role otherwise.
    pub role_id: Option<u32>,
}
