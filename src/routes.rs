// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{answers, questions},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Mounts the question and subject routes under `/api`.
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (question store).
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route(
            "/api/questions",
            get(questions::list_questions).post(questions::create_question),
        )
        .route(
            "/api/questions/{id}",
            get(questions::get_question)
                .put(questions::update_question)
                .delete(questions::delete_question),
        )
        .route("/api/questions/{id}/answer", post(answers::submit_answer))
        .route("/api/subjects", get(questions::list_subjects))
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
