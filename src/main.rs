use std::sync::Arc;
use clap::Parser;
use dotenv::dotenv;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use crate::config::Config;
use crate::controller::AppState;
use crate::repositories::places_repo::PlacesApiRepo;
use crate::roulette::companion::CompanionReveal;

pub mod config;
pub mod controller;
pub mod error;
pub mod helpers;
pub mod models;
pub mod repositories;
pub mod roulette;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("lunch_roulette_backend=info,tower_http=info")),
        )
        .init();

    let config = Config::parse();
    info!("Starting lunch roulette in {} mode", config.environment);
    if config.google_api_key.is_none() {
        warn!("GOOGLE_API_KEY is not set, restaurant searches will fail until it is configured");
    }

    let places = PlacesApiRepo::new(
        reqwest::Client::new(),
        &config.places_api_url,
        config.google_api_key.clone(),
        &config.language_code,
        config.max_result_count,
    );
    let companion = CompanionReveal::new(config.companion_pool()?, config.reveal_timing());

    let app_state = AppState::new(Arc::new(places), companion, config)?;
    controller::serve(app_state).await
}
