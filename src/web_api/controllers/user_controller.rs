use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};

use crate::app_state::SharedState;
use crate::authentication::auth::CurrentUser;
use crate::id_query::IdQuery;
use crate::services::service_error::ServiceError;
use crate::services::{stats_service, user_service};
use crate::user_add_request::UserAddRequest;
use crate::user_detail_response::UserDetailResponse;
use crate::user_edit_request::UserEditRequest;
use crate::user_get_response::UserGetResponse;
use crate::user_list_query::UserListQuery;
use crate::user_stats_response::UserStatsResponse;

pub struct UserController {}

impl UserController {
    pub async fn get(
        State(state): State<SharedState>,
        Extension(caller): Extension<CurrentUser>,
        Query(query): Query<IdQuery>,
    ) -> Result<Json<UserDetailResponse>, (StatusCode, String)> {
        user_service::get_user(&state.data_context, &caller, query.id)
            .map(Json)
            .map_err(ServiceError::into_http)
    }

    pub async fn get_all(
        State(state): State<SharedState>,
        Extension(caller): Extension<CurrentUser>,
        Query(query): Query<UserListQuery>,
    ) -> Result<Json<Vec<UserGetResponse>>, (StatusCode, String)> {
        user_service::list_users(&state.data_context, &caller, &query)
            .map(Json)
            .map_err(ServiceError::into_http)
    }

    pub async fn add(
        State(state): State<SharedState>,
        Extension(caller): Extension<CurrentUser>,
        Json(body): Json<UserAddRequest>,
    ) -> Result<Json<UserGetResponse>, (StatusCode, String)> {
        user_service::create_user(&state.data_context, &caller, body)
            .map(Json)
            .map_err(ServiceError::into_http)
    }

    pub async fn edit(
        State(state): State<SharedState>,
        Extension(caller): Extension<CurrentUser>,
        Query(query): Query<IdQuery>,
        Json(body): Json<UserEditRequest>,
    ) -> Result<Json<UserGetResponse>, (StatusCode, String)> {
        user_service::update_user(&state.data_context, &caller, query.id, body)
            .map(Json)
            .map_err(ServiceError::into_http)
    }

    pub async fn delete(
        State(state): State<SharedState>,
        Extension(caller): Extension<CurrentUser>,
        Query(query): Query<IdQuery>,
    ) -> Result<(), (StatusCode, String)> {
        user_service::deactivate_user(&state.data_context, &caller, query.id)
            .map_err(ServiceError::into_http)
    }

    pub async fn stats(
        State(state): State<SharedState>,
        Extension(caller): Extension<CurrentUser>,
    ) -> Result<Json<UserStatsResponse>, (StatusCode, String)> {
        stats_service::user_stats(&state.data_context, &caller)
            .map(Json)
            .map_err(ServiceError::into_http)
    }
}
