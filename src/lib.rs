pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;
pub mod templates;
pub mod views;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Room for the text fields and multipart framing on top of the icon itself.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: Arc<AppState>) -> Router {
    let uploads = ServeDir::new(&state.config.upload_dir);
    let body_limit = state.config.max_upload_bytes + FORM_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/admin", get(handlers::auth::admin_home))
        .route(
            "/admin/login",
            get(handlers::auth::login_page).post(handlers::auth::login),
        )
        .route("/admin/logout", post(handlers::auth::logout))
        .route(
            "/admin/bookings",
            get(handlers::bookings::bookings_page).post(handlers::bookings::bookings_action),
        )
        .route(
            "/admin/services",
            get(handlers::services::services_page).post(handlers::services::services_action),
        )
        .route(
            "/admin/services/:id/data",
            get(handlers::services::service_data),
        )
        .nest_service(state.config.upload_route(), uploads)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
