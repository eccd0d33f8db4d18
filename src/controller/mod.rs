use std::net::SocketAddr;
use std::sync::Arc;
use anyhow::Context;
use axum::http::HeaderValue;
use axum::Router;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use crate::config::Config;
use crate::helpers::calendar::LunchSlot;
use crate::helpers::handler_404::page_not_found_handler;
use crate::repositories::places_repo::PlacesSearch;
use crate::roulette::companion::CompanionReveal;
use crate::roulette::session::Session;

pub mod calendar_controller;
pub mod companion_controller;
pub mod google_places_api;
pub mod health_check;
pub mod restaurant_controller;
pub mod session_controller;

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<RwLock<Session>>,
    pub places: Arc<dyn PlacesSearch>,
    pub companion: Arc<CompanionReveal>,
    pub config: Arc<Config>,
    pub lunch_slot: LunchSlot,
}

impl AppState {
    pub fn new(
        places: Arc<dyn PlacesSearch>,
        companion: CompanionReveal,
        config: Config,
    ) -> anyhow::Result<Self> {
        let lunch_slot = config
            .lunch_slot()
            .context("Invalid lunch slot configuration")?;

        Ok(Self {
            session: Arc::new(RwLock::new(Session::new())),
            places,
            companion: Arc::new(companion),
            config: Arc::new(config),
            lunch_slot,
        })
    }
}

pub async fn serve(app_state: AppState) -> anyhow::Result<()> {
    let config = Arc::clone(&app_state.config);
    let origins: Vec<HeaderValue> = config
        .origin_urls
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| match s.parse() {
            Ok(origin) => Some(origin),
            Err(e) => {
                warn!("Ignoring invalid origin url: {}, due to: {}", s, e);
                None
            }
        })
        .collect::<Vec<HeaderValue>>();

    let application = router_endpoints(app_state)
        .layer(
            ServiceBuilder::new()
                .layer(
                    CorsLayer::new()
                        .allow_methods([
                            Method::GET,
                            Method::POST,
                            Method::DELETE,
                            Method::OPTIONS
                        ])
                        .allow_origin(origins)
                        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                )
                .layer(CompressionLayer::new())
        );

    let host: std::net::IpAddr = config
        .host
        .parse()
        .with_context(|| format!("Invalid host: {}", config.host))?;
    let address = SocketAddr::from((host, config.port));
    info!("API server listening on: {}", address);
    axum::Server::bind(&address)
        .serve(application.into_make_service())
        .await
        .context("Error spinning up the API server")
}

pub fn router_endpoints(app_state: AppState) -> Router {
    Router::new()
        .merge(health_check::router(app_state.clone()))
        .nest("/session", session_controller::router(app_state.clone()))
        .nest("/restaurants", restaurant_controller::router(app_state.clone()))
        .nest("/places", google_places_api::router(app_state.clone()))
        .nest("/companion", companion_controller::router(app_state.clone()))
        .nest("/calendar", calendar_controller::router(app_state))
        .fallback(page_not_found_handler)
}
