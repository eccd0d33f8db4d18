use std::collections::BTreeSet;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

#[skip_serializing_none]
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Restaurant {
    pub place_id: String,
    pub name: String,
    pub address: String,
    pub geometry: Location,
    pub distance_m: u32,
    pub travel_minutes: u32,
    pub rating: Option<f64>,
    /// Absent when the provider reported no price tier at all
    pub price_bucket: Option<PriceBucket>,
    pub moods: BTreeSet<Mood>,
    /// Absent when the provider reported no opening hours at all
    pub opening_hours: Option<OpeningSummary>,
    pub google_maps_uri: Option<String>,
    pub photo: Option<Photo>,
    pub types: Vec<String>,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Photo {
    pub photo_reference: String,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Light,
    Heavy,
    Sweet,
    Fancy,
}

impl Mood {
    pub const ALL: [Mood; 4] = [Mood::Light, Mood::Heavy, Mood::Sweet, Mood::Fancy];
}

/// Coarse price classification, ordered from cheapest to most expensive.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PriceBucket {
    Free,
    Inexpensive,
    Moderate,
    Expensive,
    VeryExpensive,
}

impl PriceBucket {
    pub fn symbol(&self) -> &'static str {
        match self {
            PriceBucket::Free => "無料",
            PriceBucket::Inexpensive => "¥",
            PriceBucket::Moderate => "¥¥",
            PriceBucket::Expensive => "¥¥¥",
            PriceBucket::VeryExpensive => "¥¥¥¥",
        }
    }

    /// Approximate spend per person shown next to the symbol.
    pub fn range_label(&self) -> &'static str {
        match self {
            PriceBucket::Free => "",
            PriceBucket::Inexpensive => "〜500円",
            PriceBucket::Moderate => "500円〜1,000円",
            PriceBucket::Expensive => "1,000円〜2,000円",
            PriceBucket::VeryExpensive => "2,000円〜",
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct OpeningSummary {
    /// `None` means the provider did not say, which is not the same as closed
    pub is_open: Option<bool>,
    pub is_24_hours: bool,
    pub is_late_night: bool,
    pub weekday_texts: Vec<String>,
}
