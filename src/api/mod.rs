pub mod error;
pub mod handlers;

pub use error::ErrorResponse;

use axum::{
    Json, Router,
    routing::{get, patch, post},
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::{app_state::AppState, health};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::classify_event,
        handlers::extract_article,
        handlers::create_event,
        handlers::patch_event,
        health::health_check,
    ),
    tags(
        (name = "events", description = "Event classification, extraction and storage"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health::health_check))
        .route("/openapi.json", get(openapi_json))
        .route("/v1/events", post(handlers::create_event))
        .route("/v1/events/classify", post(handlers::classify_event))
        .route("/v1/events/extract", post(handlers::extract_article))
        .route("/v1/events/{id}", patch(handlers::patch_event))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
