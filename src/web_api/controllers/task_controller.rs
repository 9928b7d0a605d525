use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};

use crate::app_state::SharedState;
use crate::authentication::auth::CurrentUser;
use crate::create_task_request::CreateTaskRequest;
use crate::id_query::IdQuery;
use crate::services::service_error::ServiceError;
use crate::services::{stats_service, task_service};
use crate::task_list_query::TaskListQuery;
use crate::task_response::TaskResponse;
use crate::task_stats_response::TaskStatsResponse;
use crate::update_task_request::UpdateTaskRequest;

pub struct TaskController {}

impl TaskController {
    pub async fn get(
        State(state): State<SharedState>,
        Extension(caller): Extension<CurrentUser>,
        Query(query): Query<IdQuery>,
    ) -> Result<Json<TaskResponse>, (StatusCode, String)> {
        task_service::get_task(&state.data_context, &caller, query.id)
            .map(Json)
            .map_err(ServiceError::into_http)
    }

    pub async fn get_all(
        State(state): State<SharedState>,
        Extension(caller): Extension<CurrentUser>,
        Query(query): Query<TaskListQuery>,
    ) -> Result<Json<Vec<TaskResponse>>, (StatusCode, String)> {
        task_service::list_tasks(&state.data_context, &caller, &query)
            .map(Json)
            .map_err(ServiceError::into_http)
    }

    pub async fn add(
        State(state): State<SharedState>,
        Extension(caller): Extension<CurrentUser>,
        Json(body): Json<CreateTaskRequest>,
    ) -> Result<Json<TaskResponse>, (StatusCode, String)> {
        task_service::create_task(&state.data_context, &caller, body)
            .map(Json)
            .map_err(ServiceError::into_http)
    }

    pub async fn edit(
        State(state): State<SharedState>,
        Extension(caller): Extension<CurrentUser>,
        Query(query): Query<IdQuery>,
        Json(body): Json<UpdateTaskRequest>,
    ) -> Result<Json<TaskResponse>, (StatusCode, String)> {
        task_service::update_task(&state.data_context, &caller, query.id, body)
            .map(Json)
            .map_err(ServiceError::into_http)
    }

    pub async fn delete(
        State(state): State<SharedState>,
        Extension(caller): Extension<CurrentUser>,
        Query(query): Query<IdQuery>,
    ) -> Result<(), (StatusCode, String)> {
        task_service::delete_task(&state.data_context, &caller, query.id)
            .map_err(ServiceError::into_http)
    }

    pub async fn stats(
        State(state): State<SharedState>,
        Extension(caller): Extension<CurrentUser>,
    ) -> Result<Json<TaskStatsResponse>, (StatusCode, String)> {
        stats_service::task_stats(&state.data_context, &caller)
            .map(Json)
            .map_err(ServiceError::into_http)
    }
}
