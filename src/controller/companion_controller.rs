use std::time::Duration;
use axum::{Extension, Router};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use serde_json::json;
use tracing::{debug, info};
use crate::controller::AppState;
use crate::error::RouletteError;

const FRAME_WAIT: Duration = Duration::from_secs(5);

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(retrieve_reveal_frame).delete(cancel_reveal))
        .route("/reveal", post(run_reveal))
        .route("/next-frame", get(await_next_frame))
        .route_layer(Extension(app_state))
}

/// What the animation should show right now. Clients poll this while a reveal runs.
pub async fn retrieve_reveal_frame(
    Extension(app_state): Extension<AppState>,
) -> impl IntoResponse {
    (StatusCode::OK, json!(app_state.companion.current_frame()).to_string())
}

/// Long poll: answers as soon as the displayed frame changes, or with the current one after a few seconds.
pub async fn await_next_frame(
    Extension(app_state): Extension<AppState>,
) -> impl IntoResponse {
    let mut frames = app_state.companion.subscribe();
    frames.borrow_and_update();
    if tokio::time::timeout(FRAME_WAIT, frames.changed()).await.is_err() {
        debug!("No companion frame change within {:?}", FRAME_WAIT);
    }
    let frame = frames.borrow().clone();
    (StatusCode::OK, json!(frame).to_string())
}

/// Starts a reveal, replacing any reveal still in progress, and waits for its outcome.
pub async fn run_reveal(
    Extension(app_state): Extension<AppState>,
) -> impl IntoResponse {
    app_state.session.write().await.clear_companion();
    let pending = app_state.companion.start();
    debug!("Companion reveal started");

    return match pending.await {
        Ok(companion) => {
            info!("Companion decided: {} ({})", companion.name, companion.country);
            app_state.session.write().await.set_companion(companion.clone());
            (
                StatusCode::OK,
                json!({
                    "companion": companion,
                    "frame": app_state.companion.current_frame(),
                }).to_string()
            ).into_response()
        }
        Err(_) => RouletteError::RevealSuperseded.into_response(),
    };
}

pub async fn cancel_reveal(
    Extension(app_state): Extension<AppState>,
) -> impl IntoResponse {
    app_state.companion.cancel();
    app_state.session.write().await.clear_companion();
    (StatusCode::OK, json!(app_state.companion.current_frame()).to_string())
}
