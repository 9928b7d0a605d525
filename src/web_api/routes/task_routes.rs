use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{
    app_state::AppState, authentication::auth::auth_middleware, task_controller::TaskController,
};

pub const ROUTER_PATH: &str = "/task";

pub fn get_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route(format!("{}/get", ROUTER_PATH).as_str(), get(TaskController::get))
        .route(format!("{}/get_all", ROUTER_PATH).as_str(), get(TaskController::get_all))
        .route(format!("{}/add", ROUTER_PATH).as_str(), post(TaskController::add))
        .route(format!("{}/edit", ROUTER_PATH).as_str(), put(TaskController::edit))
        .route(format!("{}/delete", ROUTER_PATH).as_str(), delete(TaskController::delete))
        .route(format!("{}/stats", ROUTER_PATH).as_str(), get(TaskController::stats))
        .layer(middleware::from_fn_with_state(app_state.clone(), auth_middleware))
        .with_state(app_state)
}
