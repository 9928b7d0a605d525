use axum::Router;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};
use tracing_subscriber::EnvFilter;

use taskman_server::app_state::{AppState, SharedState};
use taskman_server::data_access::data_context::DataContext;
use taskman_server::map_routes;
use taskman_server::settings::Settings;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // ── Boot ───────────────────────────────────────────────────
    let settings = Settings::load().expect("Failed to load settings");

    let data_context = DataContext::new(&settings.database_path)
        .expect("Failed to open database");

    // Seed defaults if empty
    let role_count = data_context
        .ensure_default_roles()
        .expect("Failed to seed roles");
    if role_count > 0 {
        tracing::info!("Seeded {role_count} default roles");
    }
    if data_context
        .ensure_default_admin(&settings)
        .expect("Failed to seed admin user")
    {
        tracing::info!("Created default admin user {}", settings.default_admin_username);
    }

    let addr = format!("{}:{}", settings.tcp_socket_binding, settings.tcp_socket_port);

    // ── Shared state ───────────────────────────────────────────
    let state: SharedState = Arc::new(AppState {
        data_context,
        settings,
    });

    // ── Router ─────────────────────────────────────────────────
    let app = Router::new()
        .nest("/api", map_routes(state))
        // Static files (built frontend)
        .fallback_service(ServeDir::new("frontend/dist").append_index_html_on_directories(true))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // ── Start ──────────────────────────────────────────────────
    tracing::info!("Server running on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server exited");
}
