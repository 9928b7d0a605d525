use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserEditRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub role_id: Option<u32>,
}
