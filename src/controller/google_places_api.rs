use axum::{Extension, Router};
use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect};
use axum::routing::get;
use serde::{Deserialize, Serialize};
use tracing::warn;
use crate::controller::AppState;

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/photo", get(proxy_place_photo))
        .route_layer(Extension(app_state))
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct PlacePhotoParams {
    /// Photo resource name, `places/{place_id}/photos/{photo_reference}`
    pub name: String,
}

fn is_resource_id(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn is_photo_resource(name: &str) -> bool {
    let parts: Vec<&str> = name.split('/').collect();
    matches!(
        parts.as_slice(),
        ["places", place_id, "photos", reference] if is_resource_id(place_id) && is_resource_id(reference)
    )
}

/// Resolves a place photo server-side so the API key never reaches the browser.
pub async fn proxy_place_photo(
    Extension(app_state): Extension<AppState>,
    Query(query): Query<PlacePhotoParams>,
) -> impl IntoResponse {
    if !is_photo_resource(&query.name) {
        return (StatusCode::BAD_REQUEST, "Not a place photo reference").into_response();
    }

    return match app_state.places.photo_uri(&query.name).await {
        Ok(uri) => Redirect::temporary(&uri).into_response(),
        Err(e) => {
            warn!("Something went wrong resolving photo {} due to: {}", query.name, e);
            e.into_response()
        }
    };
}
