use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};

use crate::app_state::SharedState;
use crate::authentication::auth::CurrentUser;
use crate::authorization::permissions::PermissionSet;
use crate::id_query::RoleIdQuery;
use crate::role_add_request::RoleAddRequest;
use crate::role_edit_request::RoleEditRequest;
use crate::role_get_response::RoleGetResponse;
use crate::services::role_service;
use crate::services::service_error::ServiceError;

pub struct RoleController {}

impl RoleController {
    pub async fn get(
        State(state): State<SharedState>,
        Extension(caller): Extension<CurrentUser>,
        Query(query): Query<RoleIdQuery>,
    ) -> Result<Json<RoleGetResponse>, (StatusCode, String)> {
        role_service::get_role(&state.data_context, &caller, query.id)
            .map(Json)
            .map_err(ServiceError::into_http)
    }

    pub async fn get_all(
        State(state): State<SharedState>,
        Extension(caller): Extension<CurrentUser>,
    ) -> Result<Json<Vec<RoleGetResponse>>, (StatusCode, String)> {
        role_service::list_roles(&state.data_context, &caller)
            .map(Json)
            .map_err(ServiceError::into_http)
    }

    pub async fn add(
        State(state): State<SharedState>,
        Extension(caller): Extension<CurrentUser>,
        Json(body): Json<RoleAddRequest>,
    ) -> Result<Json<RoleGetResponse>, (StatusCode, String)> {
        role_service::create_role(&state.data_context, &caller, body)
            .map(Json)
            .map_err(ServiceError::into_http)
    }

    pub async fn edit(
        State(state): State<SharedState>,
        Extension(caller): Extension<CurrentUser>,
        Query(query): Query<RoleIdQuery>,
        Json(body): Json<RoleEditRequest>,
    ) -> Result<Json<RoleGetResponse>, (StatusCode, String)> {
        role_service::update_role(&state.data_context, &caller, query.id, body)
            .map(Json)
            .map_err(ServiceError::into_http)
    }

    pub async fn delete(
        State(state): State<SharedState>,
        Extension(caller): Extension<CurrentUser>,
        Query(query): Query<RoleIdQuery>,
    ) -> Result<(), (StatusCode, String)> {
        role_service::delete_role(&state.data_context, &caller, query.id)
            .map_err(ServiceError::into_http)
    }

    pub async fn get_permissions(
        State(state): State<SharedState>,
        Extension(caller): Extension<CurrentUser>,
        Query(query): Query<RoleIdQuery>,
    ) -> Result<Json<PermissionSet>, (StatusCode, String)> {
        role_service::get_permissions(&state.data_context, &caller, query.id)
            .map(Json)
            .map_err(ServiceError::into_http)
    }

    pub async fn edit_permissions(
        State(state): State<SharedState>,
        Extension(caller): Extension<CurrentUser>,
        Query(query): Query<RoleIdQuery>,
        Json(bundle): Json<PermissionSet>,
    ) -> Result<Json<PermissionSet>, (StatusCode, String)> {
        role_service::update_permissions(&state.data_context, &caller, query.id, bundle)
            .map(Json)
            .map_err(ServiceError::into_http)
    }
}
