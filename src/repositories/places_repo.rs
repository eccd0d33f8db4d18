use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use tracing::{debug, warn};
use crate::error::{RouletteError, RouletteResult};
use crate::models::place::{Place, PhotoMediaResponse, PlacesErrorResponse, SearchNearbyResponse};
use crate::models::restaurant::Location;

pub const DEFAULT_PLACES_API_URL: &str = "https://places.googleapis.com/v1";

const API_KEY_HEADER: &str = "X-Goog-Api-Key";
const FIELD_MASK_HEADER: &str = "X-Goog-FieldMask";
const SEARCH_FIELD_MASK: &str = "places.displayName,places.formattedAddress,places.location,\
places.rating,places.priceLevel,places.types,places.googleMapsUri,places.id,places.photos,\
places.currentOpeningHours,places.regularOpeningHours";

const PHOTO_MAX_HEIGHT_PX: u32 = 400;
const PHOTO_MAX_WIDTH_PX: u32 = 600;

#[derive(Clone, Debug, PartialEq)]
pub struct NearbyQuery {
    pub center: Location,
    pub radius_meters: f64,
}

/// The external places search the roulette draws its restaurants from.
#[async_trait]
pub trait PlacesSearch: Send + Sync {
    async fn search_nearby(&self, query: &NearbyQuery) -> RouletteResult<Vec<Place>>;

    /// Resolves a photo resource name to a short-lived URL the browser can load directly.
    async fn photo_uri(&self, photo_name: &str) -> RouletteResult<String>;
}

pub struct PlacesApiRepo {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    language_code: String,
    max_result_count: u32,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct SearchNearbyRequest<'a> {
    included_types: [&'a str; 1],
    max_result_count: u32,
    location_restriction: LocationRestriction,
    language_code: &'a str,
}

#[derive(Serialize, Debug)]
struct LocationRestriction {
    circle: Circle,
}

#[derive(Serialize, Debug)]
struct Circle {
    center: Center,
    radius: f64,
}

#[derive(Serialize, Debug)]
struct Center {
    latitude: f64,
    longitude: f64,
}

impl PlacesApiRepo {
    pub fn new(
        client: reqwest::Client,
        base_url: &str,
        api_key: Option<String>,
        language_code: &str,
        max_result_count: u32,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            language_code: language_code.to_string(),
            max_result_count,
        }
    }

    fn api_key(&self) -> RouletteResult<&str> {
        self.api_key.as_deref().ok_or(RouletteError::MissingApiKey)
    }

    fn search_request<'a>(&'a self, query: &NearbyQuery) -> SearchNearbyRequest<'a> {
        SearchNearbyRequest {
            included_types: ["restaurant"],
            max_result_count: self.max_result_count,
            location_restriction: LocationRestriction {
                circle: Circle {
                    center: Center {
                        latitude: query.center.lat,
                        longitude: query.center.lng,
                    },
                    radius: query.radius_meters,
                },
            },
            language_code: &self.language_code,
        }
    }
}

#[async_trait]
impl PlacesSearch for PlacesApiRepo {
    async fn search_nearby(&self, query: &NearbyQuery) -> RouletteResult<Vec<Place>> {
        let api_key = self.api_key()?;
        let url = format!("{}/places:searchNearby", self.base_url);
        debug!("Searching restaurants within {}m of {:?}", query.radius_meters, query.center);

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, api_key)
            .header(FIELD_MASK_HEADER, SEARCH_FIELD_MASK)
            .json(&self.search_request(query))
            .send()
            .await?;

        let response = ensure_success(response).await?;
        let body: SearchNearbyResponse = response.json().await?;
        Ok(body.places)
    }

    async fn photo_uri(&self, photo_name: &str) -> RouletteResult<String> {
        let api_key = self.api_key()?;
        let url = format!("{}/{}/media", self.base_url, photo_name.trim_start_matches('/'));

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, api_key)
            .query(&[
                ("maxHeightPx", PHOTO_MAX_HEIGHT_PX.to_string()),
                ("maxWidthPx", PHOTO_MAX_WIDTH_PX.to_string()),
                ("skipHttpRedirect", "true".to_string()),
            ])
            .send()
            .await?;

        let response = ensure_success(response).await?;
        let body: PhotoMediaResponse = response.json().await?;
        Ok(body.photo_uri)
    }
}

async fn ensure_success(response: reqwest::Response) -> RouletteResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<PlacesErrorResponse>()
        .await
        .ok()
        .and_then(|body| body.error)
        .and_then(|error| error.message)
        .unwrap_or_else(|| "Unknown error".to_string());
    warn!("Places API responded with {} due to: {}", status, message);

    Err(RouletteError::PlacesApi {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(api_key: Option<&str>) -> PlacesApiRepo {
        PlacesApiRepo::new(
            reqwest::Client::new(),
            "https://places.example.test/v1/",
            api_key.map(String::from),
            "ja",
            20,
        )
    }

    #[test]
    fn test_search_request_body() {
        let repo = repo(Some("key"));
        let query = NearbyQuery {
            center: Location { lat: 35.68, lng: 139.76 },
            radius_meters: 800.0,
        };
        let body = serde_json::to_value(repo.search_request(&query)).unwrap();

        assert_eq!(body["includedTypes"], serde_json::json!(["restaurant"]));
        assert_eq!(body["maxResultCount"], 20);
        assert_eq!(body["languageCode"], "ja");
        assert_eq!(body["locationRestriction"]["circle"]["radius"], 800.0);
        assert_eq!(body["locationRestriction"]["circle"]["center"]["latitude"], 35.68);
        assert_eq!(body["locationRestriction"]["circle"]["center"]["longitude"], 139.76);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        assert_eq!(repo(None).base_url, "https://places.example.test/v1");
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_request() {
        let repo = repo(None);
        let query = NearbyQuery {
            center: Location { lat: 0.0, lng: 0.0 },
            radius_meters: 400.0,
        };
        assert!(matches!(repo.search_nearby(&query).await, Err(RouletteError::MissingApiKey)));
        assert!(matches!(repo.photo_uri("places/x/photos/y").await, Err(RouletteError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_blank_api_key_is_missing() {
        let repo = repo(Some("   "));
        assert!(matches!(repo.photo_uri("places/x/photos/y").await, Err(RouletteError::MissingApiKey)));
    }

    #[test]
    fn test_field_mask_lists_every_field() {
        for field in ["displayName", "priceLevel", "photos", "currentOpeningHours", "regularOpeningHours"] {
            assert!(SEARCH_FIELD_MASK.contains(&format!("places.{}", field)));
        }
        assert!(!SEARCH_FIELD_MASK.contains(' '));
    }
}
