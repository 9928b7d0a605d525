use serde::Deserialize;

/// Name/description only; permission flags change through the dedicated
/// bundle endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoleEditRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}
