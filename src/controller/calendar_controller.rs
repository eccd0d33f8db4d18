use axum::{Extension, Router};
use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::warn;
use crate::controller::AppState;
use crate::error::RouletteError;
use crate::helpers::calendar::{Attendee, CalendarEvent};

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(export_lunch_event))
        .route_layer(Extension(app_state))
}

#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct ExportLunchParams {
    pub attendee_email: Option<String>,
}

/// Downloads the last roulette pick as an iCalendar event in the configured lunch slot.
pub async fn export_lunch_event(
    Extension(app_state): Extension<AppState>,
    Query(query): Query<ExportLunchParams>,
) -> impl IntoResponse {
    let attendee = match Attendee::from_email(query.attendee_email.as_deref().unwrap_or_default()) {
        Ok(attendee) => attendee,
        Err(e) => return e.into_response(),
    };

    let event = {
        let session = app_state.session.read().await;
        let Some(restaurant) = session.selected() else {
            return RouletteError::NothingSelected.into_response();
        };
        CalendarEvent::for_restaurant(
            restaurant,
            session.companion(),
            attendee,
            &app_state.lunch_slot,
            OffsetDateTime::now_utc(),
        )
    };

    return match event.to_ics() {
        Ok(ics) => {
            let disposition = format!("attachment; filename=\"{}\"", event.file_name());
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/calendar; charset=utf-8".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                ics,
            ).into_response()
        }
        Err(e) => {
            warn!("Something went wrong rendering the lunch event due to: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create calendar file, please try again.").into_response()
        }
    };
}
