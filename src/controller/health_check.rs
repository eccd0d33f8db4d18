use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Router};
use serde_json::json;
use crate::controller::AppState;

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(get_health_check))
        .route_layer(Extension(app_state))
}

/// Liveness probe, also reports whether searches can reach the places API
async fn get_health_check(
    Extension(app_state): Extension<AppState>,
) -> impl IntoResponse {
    (
        StatusCode::OK,
        json!({
            "status": "ok",
            "environment": app_state.config.environment,
            "places_api_key_configured": app_state.config.google_api_key.is_some(),
        }).to_string()
    )
}
