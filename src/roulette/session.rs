use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use tokio::sync::RwLock;
use tracing::{info, warn};
use crate::error::{GeolocationFailure, RouletteError, RouletteResult};
use crate::models::companion::Companion;
use crate::models::filter::{FilterCriteria, TravelTime};
use crate::models::place::Place;
use crate::models::restaurant::{Location, Restaurant};
use crate::repositories::places_repo::{NearbyQuery, PlacesSearch};
use crate::roulette::catalog::build_catalog;
use crate::roulette::filter::{apply_filters, count_message};
use crate::roulette::selector::pick_random;

const NOTHING_NEARBY: &str = "No restaurants found nearby, try a longer travel time";

/// What the browser reports after asking for the current position.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(untagged)]
pub enum LocationReport {
    Fix { latitude: f64, longitude: f64 },
    Failure { error: GeolocationFailure },
}

#[derive(Clone, Debug, PartialEq)]
pub struct PendingSearch {
    pub generation: u64,
    pub query: NearbyQuery,
}

#[skip_serializing_none]
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct SearchOutcome {
    pub total: usize,
    pub matching: usize,
    pub count_message: String,
    /// Set when the search itself found nothing
    pub notice: Option<String>,
    pub restaurants: Vec<Restaurant>,
}

#[skip_serializing_none]
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct SessionView {
    pub location: Option<Location>,
    pub travel_time: TravelTime,
    pub criteria: FilterCriteria,
    pub total: usize,
    pub matching: usize,
    pub count_message: String,
    pub status: Option<String>,
    pub selected: Option<Restaurant>,
    pub companion: Option<Companion>,
}

/// Everything one user has done so far. Owned by the server and only mutated
/// through these methods, so a new search always replaces the whole set.
#[derive(Debug, Default)]
pub struct Session {
    location: Option<Location>,
    travel_time: TravelTime,
    restaurants: Vec<Restaurant>,
    criteria: FilterCriteria,
    filtered: Vec<Restaurant>,
    selected: Option<Restaurant>,
    companion: Option<Companion>,
    status: Option<String>,
    search_generation: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report_location(&mut self, report: LocationReport) -> RouletteResult<Location> {
        match report {
            LocationReport::Fix { latitude, longitude } => {
                let location = Location { lat: latitude, lng: longitude };
                self.location = Some(location);
                self.status = Some("Current location acquired".to_string());
                Ok(location)
            }
            LocationReport::Failure { error } => {
                let error = RouletteError::Geolocation(error);
                warn!("Geolocation failed due to: {}", error);
                self.location = None;
                self.status = Some(error.to_string());
                Err(error)
            }
        }
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }

    /// Claims a new search generation; results from older generations are dropped on commit.
    pub fn begin_search(&mut self, travel_time: Option<TravelTime>) -> RouletteResult<PendingSearch> {
        let center = self.location.ok_or(RouletteError::LocationUnavailable)?;
        if let Some(travel_time) = travel_time {
            self.travel_time = travel_time;
        }
        self.search_generation += 1;

        Ok(PendingSearch {
            generation: self.search_generation,
            query: NearbyQuery {
                center,
                radius_meters: self.travel_time.radius_meters(),
            },
        })
    }

    pub fn commit_search(&mut self, generation: u64, places: &[Place]) -> RouletteResult<SearchOutcome> {
        if generation != self.search_generation {
            return Err(RouletteError::SearchSuperseded);
        }
        let center = self.location.ok_or(RouletteError::LocationUnavailable)?;

        self.restaurants = build_catalog(places, center);
        self.filtered = apply_filters(&self.restaurants, &self.criteria);
        self.selected = None;
        self.status = if self.restaurants.is_empty() {
            Some(NOTHING_NEARBY.to_string())
        } else {
            None
        };
        info!(
            "Search {} found {} restaurants, {} match the current filters",
            generation,
            self.restaurants.len(),
            self.filtered.len()
        );

        Ok(self.outcome())
    }

    pub fn fail_search(&mut self, generation: u64, error: &RouletteError) {
        if generation == self.search_generation && error.is_search_failure() {
            self.status = Some(format!("An error occurred while searching: {}", error));
        }
    }

    pub fn apply_criteria(&mut self, criteria: FilterCriteria) -> SearchOutcome {
        self.criteria = criteria;
        self.filtered = apply_filters(&self.restaurants, &self.criteria);
        self.outcome()
    }

    pub fn roulette<R: Rng + ?Sized>(&mut self, rng: &mut R) -> RouletteResult<Restaurant> {
        if self.filtered.is_empty() {
            return Err(RouletteError::NoMatchingRestaurant);
        }
        let picked = pick_random(&self.filtered, rng)
            .cloned()
            .ok_or(RouletteError::NoMatchingRestaurant)?;
        self.selected = Some(picked.clone());
        Ok(picked)
    }

    pub fn selected(&self) -> Option<&Restaurant> {
        self.selected.as_ref()
    }

    pub fn clear_companion(&mut self) {
        self.companion = None;
    }

    pub fn set_companion(&mut self, companion: Companion) {
        self.companion = Some(companion);
    }

    pub fn companion(&self) -> Option<&Companion> {
        self.companion.as_ref()
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            location: self.location,
            travel_time: self.travel_time,
            criteria: self.criteria,
            total: self.restaurants.len(),
            matching: self.filtered.len(),
            count_message: count_message(self.restaurants.len(), self.filtered.len()),
            status: self.status.clone(),
            selected: self.selected.clone(),
            companion: self.companion.clone(),
        }
    }

    fn outcome(&self) -> SearchOutcome {
        SearchOutcome {
            total: self.restaurants.len(),
            matching: self.filtered.len(),
            count_message: count_message(self.restaurants.len(), self.filtered.len()),
            notice: self
                .restaurants
                .is_empty()
                .then(|| NOTHING_NEARBY.to_string()),
            restaurants: self.filtered.clone(),
        }
    }
}

/// Runs one nearby search without holding the session lock across the network call.
pub async fn refresh_restaurants(
    session: &RwLock<Session>,
    places: &dyn PlacesSearch,
    travel_time: Option<TravelTime>,
) -> RouletteResult<SearchOutcome> {
    let pending = session.write().await.begin_search(travel_time)?;

    match places.search_nearby(&pending.query).await {
        Ok(found) => session.write().await.commit_search(pending.generation, &found),
        Err(e) => {
            warn!("Something went wrong searching for restaurants due to: {}", e);
            session.write().await.fail_search(pending.generation, &e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use crate::models::filter::{BudgetFilter, MoodFilter};
    use crate::models::place::{LatLng, LocalizedText};

    struct StubPlaces {
        places: Vec<Place>,
        fail: bool,
    }

    #[async_trait]
    impl PlacesSearch for StubPlaces {
        async fn search_nearby(&self, _query: &NearbyQuery) -> RouletteResult<Vec<Place>> {
            if self.fail {
                return Err(RouletteError::PlacesApi { status: 500, message: "boom".to_string() });
            }
            Ok(self.places.clone())
        }

        async fn photo_uri(&self, photo_name: &str) -> RouletteResult<String> {
            Ok(format!("https://photos.test/{}", photo_name))
        }
    }

    fn place(id: &str, types: &[&str], price: Option<&str>) -> Place {
        Place {
            id: id.to_string(),
            display_name: Some(LocalizedText { text: id.to_string(), language_code: None }),
            location: LatLng { latitude: 35.6812, longitude: 139.7671 },
            types: types.iter().map(|t| t.to_string()).collect(),
            price_level: price.map(String::from),
            ..Place::default()
        }
    }

    fn located_session() -> Session {
        let mut session = Session::new();
        session
            .report_location(LocationReport::Fix { latitude: 35.68, longitude: 139.76 })
            .unwrap();
        session
    }

    #[test]
    fn test_location_report_json_shapes() {
        let fix: LocationReport = serde_json::from_str(r#"{"latitude": 1.5, "longitude": 2.5}"#).unwrap();
        assert_eq!(fix, LocationReport::Fix { latitude: 1.5, longitude: 2.5 });

        let failure: LocationReport = serde_json::from_str(r#"{"error": "timeout"}"#).unwrap();
        assert_eq!(failure, LocationReport::Failure { error: GeolocationFailure::Timeout });
    }

    #[test]
    fn test_geolocation_failure_sets_status() {
        let mut session = located_session();
        let result = session.report_location(LocationReport::Failure {
            error: GeolocationFailure::PermissionDenied,
        });
        assert!(matches!(result, Err(RouletteError::Geolocation(GeolocationFailure::PermissionDenied))));
        assert!(session.location().is_none());
        assert!(session.view().status.unwrap().contains("denied"));
    }

    #[test]
    fn test_search_requires_location() {
        let mut session = Session::new();
        assert!(matches!(session.begin_search(None), Err(RouletteError::LocationUnavailable)));
    }

    #[test]
    fn test_begin_search_uses_travel_time_radius() {
        let mut session = located_session();
        assert_eq!(session.begin_search(None).unwrap().query.radius_meters, 800.0);

        let pending = session.begin_search(Some(TravelTime::FifteenMinutes)).unwrap();
        assert_eq!(pending.query.radius_meters, 1200.0);
        assert_eq!(pending.query.center, Location { lat: 35.68, lng: 139.76 });

        // The chosen travel time sticks for later searches
        assert_eq!(session.begin_search(None).unwrap().query.radius_meters, 1200.0);
    }

    #[test]
    fn test_stale_search_is_not_committed() {
        let mut session = located_session();
        let first = session.begin_search(None).unwrap();
        let second = session.begin_search(None).unwrap();

        let stale = session.commit_search(first.generation, &[place("old", &[], None)]);
        assert!(matches!(stale, Err(RouletteError::SearchSuperseded)));
        assert_eq!(session.view().total, 0);

        let fresh = session.commit_search(second.generation, &[place("new", &[], None)]).unwrap();
        assert_eq!(fresh.total, 1);
        assert_eq!(fresh.restaurants[0].place_id, "new");
    }

    #[test]
    fn test_new_search_replaces_previous_set() {
        let mut session = located_session();
        let pending = session.begin_search(None).unwrap();
        session
            .commit_search(pending.generation, &[place("a", &[], None), place("b", &[], None)])
            .unwrap();
        session.roulette(&mut StdRng::seed_from_u64(1)).unwrap();
        assert!(session.selected().is_some());

        let pending = session.begin_search(None).unwrap();
        let outcome = session.commit_search(pending.generation, &[place("c", &[], None)]).unwrap();
        assert_eq!(outcome.total, 1);
        assert_eq!(outcome.restaurants[0].place_id, "c");
        assert!(session.selected().is_none());
    }

    #[test]
    fn test_empty_search_is_not_an_error() {
        let mut session = located_session();
        let pending = session.begin_search(None).unwrap();
        let outcome = session.commit_search(pending.generation, &[]).unwrap();
        assert_eq!(outcome.total, 0);
        assert_eq!(outcome.notice.as_deref(), Some(NOTHING_NEARBY));
        assert_eq!(outcome.count_message, "");
    }

    #[test]
    fn test_criteria_reapplied_after_search() {
        let mut session = located_session();
        session.apply_criteria(FilterCriteria { mood: MoodFilter::Heavy, ..FilterCriteria::default() });

        let pending = session.begin_search(None).unwrap();
        let outcome = session
            .commit_search(
                pending.generation,
                &[place("ramen", &["ramen_restaurant"], None), place("cafe", &["cafe"], None)],
            )
            .unwrap();
        assert_eq!(outcome.total, 2);
        assert_eq!(outcome.matching, 1);
        assert_eq!(outcome.restaurants[0].place_id, "ramen");
    }

    #[test]
    fn test_roulette_with_no_match_reports_instead_of_selecting() {
        let mut session = located_session();
        let pending = session.begin_search(None).unwrap();
        session
            .commit_search(pending.generation, &[place("pricey", &[], Some("PRICE_LEVEL_EXPENSIVE"))])
            .unwrap();

        let outcome = session.apply_criteria(FilterCriteria { budget: BudgetFilter::UpTo500, ..FilterCriteria::default() });
        assert_eq!(outcome.matching, 0);
        assert_eq!(outcome.count_message, "No restaurant matches your filters");

        let result = session.roulette(&mut StdRng::seed_from_u64(0));
        assert!(matches!(result, Err(RouletteError::NoMatchingRestaurant)));
        assert!(session.selected().is_none());
    }

    #[test]
    fn test_roulette_picks_from_filtered() {
        let mut session = located_session();
        let pending = session.begin_search(None).unwrap();
        session
            .commit_search(
                pending.generation,
                &[place("cafe", &["cafe"], None), place("ramen", &["ramen_restaurant"], None)],
            )
            .unwrap();
        session.apply_criteria(FilterCriteria { mood: MoodFilter::Sweet, ..FilterCriteria::default() });

        for seed in 0..20 {
            let picked = session.roulette(&mut StdRng::seed_from_u64(seed)).unwrap();
            assert_eq!(picked.place_id, "cafe");
        }
        assert_eq!(session.view().selected.unwrap().place_id, "cafe");
    }

    #[tokio::test]
    async fn test_refresh_restaurants_commits_results() {
        let session = RwLock::new(located_session());
        let places = StubPlaces {
            places: vec![place("a", &["sushi_restaurant"], None)],
            fail: false,
        };

        let outcome = refresh_restaurants(&session, &places, Some(TravelTime::FiveMinutes))
            .await
            .unwrap();
        assert_eq!(outcome.total, 1);

        let view = session.read().await.view();
        assert_eq!(view.travel_time, TravelTime::FiveMinutes);
        assert_eq!(view.count_message, "1 restaurant matches your filters");
    }

    #[tokio::test]
    async fn test_refresh_restaurants_failure_keeps_session_usable() {
        let session = RwLock::new(located_session());
        let failing = StubPlaces { places: vec![], fail: true };

        let result = refresh_restaurants(&session, &failing, None).await;
        assert!(matches!(result, Err(RouletteError::PlacesApi { status: 500, .. })));
        assert!(session.read().await.view().status.unwrap().contains("API Error: 500 - boom"));

        let working = StubPlaces { places: vec![place("a", &[], None)], fail: false };
        assert!(refresh_restaurants(&session, &working, None).await.is_ok());
        assert!(session.read().await.view().status.is_none());
    }
}
