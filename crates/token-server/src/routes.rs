//! Router

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{health_check, report_handler, suggest_handler};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/report", post(report_handler))
        .route("/api/suggest", get(suggest_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
