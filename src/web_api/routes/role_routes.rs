use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{
    app_state::AppState, authentication::auth::auth_middleware, role_controller::RoleController,
};

pub const ROUTER_PATH: &str = "/role";

pub fn get_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route(format!("{}/get", ROUTER_PATH).as_str(), get(RoleController::get))
        .route(format!("{}/get_all", ROUTER_PATH).as_str(), get(RoleController::get_all))
        .route(format!("{}/add", ROUTER_PATH).as_str(), post(RoleController::add))
        .route(format!("{}/edit", ROUTER_PATH).as_str(), put(RoleController::edit))
        .route(format!("{}/delete", ROUTER_PATH).as_str(), delete(RoleController::delete))
        .route(
            format!("{}/get_permissions", ROUTER_PATH).as_str(),
            get(RoleController::get_permissions),
        )
        .route(
            format!("{}/edit_permissions", ROUTER_PATH).as_str(),
            put(RoleController::edit_permissions),
        )
        .layer(middleware::from_fn_with_state(app_state.clone(), auth_middleware))
        .with_state(app_state)
}
