use axum::{Extension, Json, Router};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use serde_json::json;
use tracing::{info, warn};
use crate::controller::AppState;
use crate::roulette::session::{refresh_restaurants, LocationReport};

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(retrieve_session))
        .route("/geolocation-options", get(retrieve_geolocation_options))
        .route("/location", post(report_location))
        .route_layer(Extension(app_state))
}

pub async fn retrieve_session(
    Extension(app_state): Extension<AppState>,
) -> impl IntoResponse {
    let view = app_state.session.read().await.view();
    (StatusCode::OK, json!(view).to_string())
}

pub async fn retrieve_geolocation_options(
    Extension(app_state): Extension<AppState>,
) -> impl IntoResponse {
    (StatusCode::OK, json!(app_state.config.geolocation_options()).to_string())
}

/// Stores the browser's position (or its failure) and searches around it straight away.
pub async fn report_location(
    Extension(app_state): Extension<AppState>,
    Json(body): Json<LocationReport>,
) -> impl IntoResponse {
    let location_res = app_state.session.write().await.report_location(body);
    let location = match location_res {
        Ok(location) => location,
        Err(e) => return e.into_response(),
    };
    info!("Current location acquired, searching nearby restaurants");

    let search_res = refresh_restaurants(
        &app_state.session,
        app_state.places.as_ref(),
        None,
    ).await;

    return match search_res {
        Ok(outcome) => {
            (
                StatusCode::OK,
                json!({ "location": location, "search": outcome }).to_string()
            ).into_response()
        }
        Err(e) => {
            warn!("Something went wrong searching after a location update due to: {}", e);
            e.into_response()
        }
    };
}
