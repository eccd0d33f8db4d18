use serde::{Deserialize, Serialize};

/// Raw place record as returned by the Places API `places:searchNearby` endpoint.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: String,
    pub display_name: Option<LocalizedText>,
    pub formatted_address: Option<String>,
    pub location: LatLng,
    pub rating: Option<f64>,
    pub price_level: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
    pub google_maps_uri: Option<String>,
    #[serde(default)]
    pub photos: Vec<PlacePhoto>,
    pub current_opening_hours: Option<OpeningHours>,
    pub regular_opening_hours: Option<OpeningHours>,
}

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedText {
    pub text: String,
    pub language_code: Option<String>,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlacePhoto {
    /// Resource name, e.g. `places/{place_id}/photos/{photo_reference}`
    pub name: String,
    pub width_px: Option<u32>,
    pub height_px: Option<u32>,
}

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OpeningHours {
    pub open_now: Option<bool>,
    pub periods: Option<Vec<OpeningPeriod>>,
    pub weekday_descriptions: Option<Vec<String>>,
}

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct OpeningPeriod {
    pub open: Option<OpeningPoint>,
    pub close: Option<OpeningPoint>,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct OpeningPoint {
    /// 0 = Sunday
    #[serde(default)]
    pub day: Option<u8>,
    #[serde(default)]
    pub hour: Option<u8>,
    #[serde(default)]
    pub minute: u8,
}

#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct SearchNearbyResponse {
    #[serde(default)]
    pub places: Vec<Place>,
}

#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct PlacesErrorResponse {
    pub error: Option<PlacesErrorBody>,
}

#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct PlacesErrorBody {
    pub code: Option<u16>,
    pub message: Option<String>,
    pub status: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PhotoMediaResponse {
    pub name: Option<String>,
    pub photo_uri: String,
}
