use crate::helpers::geo::{distance_meters, travel_minutes};
use crate::models::place::Place;
use crate::models::restaurant::{Location, Photo, Restaurant};
use crate::roulette::classifier::{classify_mood, classify_opening_hours, classify_price_bucket};

const UNKNOWN_NAME: &str = "Unknown name";
const UNKNOWN_ADDRESS: &str = "Unknown address";

/// Normalizes raw search results relative to the user's position, keeping provider order.
pub fn build_catalog(places: &[Place], origin: Location) -> Vec<Restaurant> {
    places
        .iter()
        .map(|place| normalize_place(place, origin))
        .collect()
}

pub fn normalize_place(place: &Place, origin: Location) -> Restaurant {
    let distance_m = distance_meters(
        origin.lat,
        origin.lng,
        place.location.latitude,
        place.location.longitude,
    );

    let opening_hours = match (&place.current_opening_hours, &place.regular_opening_hours) {
        (None, None) => None,
        (current, regular) => Some(classify_opening_hours(current.as_ref(), regular.as_ref())),
    };

    Restaurant {
        place_id: place.id.clone(),
        name: place
            .display_name
            .as_ref()
            .map(|n| n.text.clone())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNKNOWN_NAME.to_string()),
        address: place
            .formatted_address
            .clone()
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| UNKNOWN_ADDRESS.to_string()),
        geometry: Location {
            lat: place.location.latitude,
            lng: place.location.longitude,
        },
        distance_m,
        travel_minutes: travel_minutes(distance_m),
        rating: place.rating,
        price_bucket: place
            .price_level
            .as_deref()
            .map(|level| classify_price_bucket(Some(level))),
        moods: classify_mood(&place.types),
        opening_hours,
        google_maps_uri: place.google_maps_uri.clone(),
        photo: place.photos.first().map(|p| Photo {
            photo_reference: p.name.clone(),
        }),
        types: place.types.clone(),
    }
}
