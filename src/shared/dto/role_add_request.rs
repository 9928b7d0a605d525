use serde::Deserialize;

use crate::authorization::permissions::PermissionSet;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleAddRequest {
    pub name: String,
    pub description: Option<String>,
    /// Initial flags, inline beside name/description; omitted flags are
    /// false (PermissionSet defaults field-wise).
    #[serde(flatten)]
    pub permissions: PermissionSet,
}
