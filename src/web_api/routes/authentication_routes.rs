use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{
    app_state::AppState, authentication::auth::auth_middleware,
    authentication_controller::AuthenticationController,
};

pub const ROUTER_PATH: &str = "/authentication";

pub fn get_router(app_state: Arc<AppState>) -> Router {
    let public = Router::new()
        .route(format!("{}/login", ROUTER_PATH).as_str(), post(AuthenticationController::login))
        .route(format!("{}/logout", ROUTER_PATH).as_str(), post(AuthenticationController::logout));

    let protected = Router::new()
        .route(format!("{}/me", ROUTER_PATH).as_str(), get(AuthenticationController::me))
        .route(
            format!("{}/change_password", ROUTER_PATH).as_str(),
            post(AuthenticationController::change_password),
        )
        .layer(middleware::from_fn_with_state(app_state.clone(), auth_middleware));

    public.merge(protected).with_state(app_state)
}
