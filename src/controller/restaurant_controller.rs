use axum::{Extension, Json, Router};
use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use serde_with::skip_serializing_none;
use tracing::{info, warn};
use crate::controller::AppState;
use crate::models::filter::{FilterCriteria, TravelTime};
use crate::models::restaurant::Restaurant;
use crate::roulette::session::{refresh_restaurants, SearchOutcome};

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(filter_restaurants))
        .route("/search", post(search_restaurants))
        .route("/roulette", post(spin_roulette))
        .route_layer(Extension(app_state))
}

/// Restaurant plus the display details the result card needs.
#[skip_serializing_none]
#[derive(Serialize, Debug)]
pub struct RestaurantCard<'a> {
    #[serde(flatten)]
    pub restaurant: &'a Restaurant,
    pub price_symbol: Option<&'static str>,
    pub price_range: Option<&'static str>,
    pub photo_url: Option<String>,
}

impl<'a> From<&'a Restaurant> for RestaurantCard<'a> {
    fn from(restaurant: &'a Restaurant) -> Self {
        Self {
            restaurant,
            price_symbol: restaurant.price_bucket.map(|b| b.symbol()),
            price_range: restaurant
                .price_bucket
                .map(|b| b.range_label())
                .filter(|r| !r.is_empty()),
            photo_url: restaurant
                .photo
                .as_ref()
                .map(|p| format!("/places/photo?name={}", p.photo_reference)),
        }
    }
}

fn outcome_json(outcome: &SearchOutcome) -> Value {
    let cards: Vec<RestaurantCard> = outcome.restaurants.iter().map(RestaurantCard::from).collect();
    json!({
        "total": outcome.total,
        "matching": outcome.matching,
        "count_message": outcome.count_message,
        "notice": outcome.notice,
        "restaurants": cards,
    })
}

#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct SearchRestaurantsBody {
    pub travel_time: Option<TravelTime>,
}

pub async fn search_restaurants(
    Extension(app_state): Extension<AppState>,
    Json(body): Json<SearchRestaurantsBody>,
) -> impl IntoResponse {
    let search_res = refresh_restaurants(
        &app_state.session,
        app_state.places.as_ref(),
        body.travel_time,
    ).await;

    return match search_res {
        Ok(outcome) => {
            (StatusCode::OK, outcome_json(&outcome).to_string()).into_response()
        }
        Err(e) => {
            warn!("Something went wrong searching for restaurants due to: {}", e);
            e.into_response()
        }
    };
}

/// Lists the restaurants matching the given filters. Not a pure read: the
/// criteria are stored on the session, so later roulette spins and the
/// session view use them. Omitted parameters reset to "all".
pub async fn filter_restaurants(
    Extension(app_state): Extension<AppState>,
    Query(criteria): Query<FilterCriteria>,
) -> impl IntoResponse {
    let outcome = app_state.session.write().await.apply_criteria(criteria);
    (StatusCode::OK, outcome_json(&outcome).to_string())
}

pub async fn spin_roulette(
    Extension(app_state): Extension<AppState>,
) -> impl IntoResponse {
    let mut session = app_state.session.write().await;
    let roulette_res = session.roulette(&mut rand::thread_rng());
    drop(session);

    return match roulette_res {
        Ok(restaurant) => {
            info!("Roulette landed on {} ({})", restaurant.name, restaurant.place_id);
            (
                StatusCode::OK,
                json!({ "selected": RestaurantCard::from(&restaurant) }).to_string()
            ).into_response()
        }
        Err(e) => e.into_response(),
    };
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use axum::http::StatusCode;
    use serde_json::json;
    use crate::controller::test_support::{app_with, get, locate, place, post_json, send, StubPlaces};
    use crate::models::place::PlacePhoto;

    fn catalog() -> Arc<StubPlaces> {
        let mut cafe = place("cafe", &["cafe", "italian_restaurant"], Some("PRICE_LEVEL_MODERATE"));
        cafe.photos = vec![PlacePhoto {
            name: "places/cafe/photos/p1".to_string(),
            width_px: None,
            height_px: None,
        }];
        Arc::new(StubPlaces {
            places: vec![
                place("ramen", &["ramen_restaurant"], Some("PRICE_LEVEL_INEXPENSIVE")),
                cafe,
                place("steak", &["steak_house"], Some("PRICE_LEVEL_EXPENSIVE")),
            ],
            ..StubPlaces::default()
        })
    }

    #[tokio::test]
    async fn test_filter_by_budget_and_mood() {
        let (app, _) = app_with(catalog());
        locate(&app).await;

        let (status, body) = send(&app, get("/restaurants?budget=500")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["matching"], 1);
        assert_eq!(body["restaurants"][0]["place_id"], "ramen");
        assert_eq!(body["restaurants"][0]["price_symbol"], "¥");
        assert_eq!(body["restaurants"][0]["price_range"], "〜500円");

        let (_, body) = send(&app, get("/restaurants?mood=fancy")).await;
        assert_eq!(body["count_message"], "1 restaurant matches your filters");
        assert_eq!(body["matching"], 1);
        assert_eq!(body["restaurants"][0]["photo_url"], "/places/photo?name=places/cafe/photos/p1");

        let (_, body) = send(&app, get("/restaurants?budget=over&mood=heavy&hours=all")).await;
        assert_eq!(body["restaurants"][0]["place_id"], "steak");
    }

    #[tokio::test]
    async fn test_no_filters_lists_everything() {
        let (app, _) = app_with(catalog());
        locate(&app).await;

        let (_, body) = send(&app, get("/restaurants")).await;
        assert_eq!(body["total"], 3);
        assert_eq!(body["matching"], 3);
        assert_eq!(body["count_message"], "3 restaurants match your filters");
    }

    #[tokio::test]
    async fn test_invalid_filter_value_rejected() {
        let (app, _) = app_with(catalog());
        let (status, _) = send(&app, get("/restaurants?budget=cheap")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_roulette_with_empty_filter_is_blocked() {
        let (app, state) = app_with(catalog());
        locate(&app).await;

        let (_, body) = send(&app, get("/restaurants?budget=500&mood=sweet")).await;
        assert_eq!(body["matching"], 0);

        let (status, body) = send(&app, post_json("/restaurants/roulette", json!({}))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["error"].as_str().unwrap().contains("No restaurant matches"));
        assert!(state.session.read().await.selected().is_none());
    }

    #[tokio::test]
    async fn test_roulette_picks_matching_restaurant() {
        let (app, state) = app_with(catalog());
        locate(&app).await;
        send(&app, get("/restaurants?mood=heavy")).await;

        let (status, body) = send(&app, post_json("/restaurants/roulette", json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        let picked = body["selected"]["place_id"].as_str().unwrap().to_string();
        assert!(picked == "ramen" || picked == "steak");
        assert_eq!(state.session.read().await.selected().unwrap().place_id, picked);
    }

    #[tokio::test]
    async fn test_search_with_travel_time() {
        let places = catalog();
        let (app, _) = app_with(places.clone());
        locate(&app).await;

        let (status, body) = send(&app, post_json("/restaurants/search", json!({"travel_time": 20}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 3);

        let queries = places.queries.lock().unwrap();
        assert_eq!(queries.last().unwrap().radius_meters, 1600.0);
    }

    #[tokio::test]
    async fn test_search_without_location_conflicts() {
        let (app, _) = app_with(catalog());
        let (status, _) = send(&app, post_json("/restaurants/search", json!({"travel_time": 5}))).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }
}
