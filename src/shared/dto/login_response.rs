use serde::Serialize;

use super::user_get_response::UserGetResponse;

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserGetResponse,
}
