use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};

use crate::app_state::SharedState;
use crate::authentication::auth::{self, CurrentUser};
use crate::change_password_request::ChangePasswordRequest;
use crate::login_request::LoginRequest;
use crate::login_response::LoginResponse;
use crate::user_get_response::UserGetResponse;

pub struct AuthenticationController {}

impl AuthenticationController {
    pub async fn login(
        State(state): State<SharedState>,
        Json(payload): Json<LoginRequest>,
    ) -> Result<Json<LoginResponse>, (StatusCode, String)> {
        auth::login(&state, payload).map(Json)
    }

    // Tokens are stateless; logout is client-side discard.
    pub async fn logout() -> impl IntoResponse {
        StatusCode::OK
    }

    pub async fn me(
        Extension(caller): Extension<CurrentUser>,
    ) -> Json<UserGetResponse> {
        Json(auth::current_user_response(&caller))
    }

    pub async fn change_password(
        State(state): State<SharedState>,
        Extension(caller): Extension<CurrentUser>,
        Json(payload): Json<ChangePasswordRequest>,
    ) -> Result<(), (StatusCode, String)> {
        auth::change_password(&state, &caller, payload)
    }
}
