use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

/// Failure reported by the browser's geolocation query.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GeolocationFailure {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    Unknown(Option<String>),
}

impl std::fmt::Display for GeolocationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeolocationFailure::PermissionDenied => {
                write!(f, "location access was denied, check the browser settings")
            }
            GeolocationFailure::PositionUnavailable => write!(f, "location information is unavailable"),
            GeolocationFailure::Timeout => write!(f, "the location request timed out"),
            GeolocationFailure::Unknown(Some(message)) => write!(f, "{}", message),
            GeolocationFailure::Unknown(None) => write!(f, "unknown error"),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum RouletteError {
    #[error("Failed to get current location: {0}")]
    Geolocation(GeolocationFailure),

    #[error("Current location is not available yet")]
    LocationUnavailable,

    #[error("API key is not configured, set GOOGLE_API_KEY")]
    MissingApiKey,

    #[error("API Error: {status} - {message}")]
    PlacesApi { status: u16, message: String },

    #[error("Failed to reach the places API: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("A newer search replaced this one")]
    SearchSuperseded,

    #[error("No restaurant matches the current filters, try changing them")]
    NoMatchingRestaurant,

    #[error("No restaurant has been picked yet")]
    NothingSelected,

    #[error("Invalid attendee email: {0:?}")]
    InvalidAttendeeEmail(String),

    #[error("The companion reveal was cancelled by a newer one")]
    RevealSuperseded,

    #[error("Companion pool must contain at least one companion")]
    EmptyCompanionPool,
}

impl RouletteError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RouletteError::Geolocation(_) | RouletteError::InvalidAttendeeEmail(_) => {
                StatusCode::BAD_REQUEST
            }
            RouletteError::LocationUnavailable
            | RouletteError::SearchSuperseded
            | RouletteError::NoMatchingRestaurant
            | RouletteError::NothingSelected
            | RouletteError::RevealSuperseded => StatusCode::CONFLICT,
            RouletteError::MissingApiKey | RouletteError::EmptyCompanionPool => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            RouletteError::PlacesApi { .. } | RouletteError::Transport(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Search failures are shown to the user as a status line instead of a blocking notice.
    pub fn is_search_failure(&self) -> bool {
        matches!(
            self,
            RouletteError::MissingApiKey
                | RouletteError::PlacesApi { .. }
                | RouletteError::Transport(_)
        )
    }
}

impl IntoResponse for RouletteError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            warn!("Request failed due to: {}", self);
        }
        (status, json!({ "error": self.to_string() }).to_string()).into_response()
    }
}

pub type RouletteResult<T> = Result<T, RouletteError>;
