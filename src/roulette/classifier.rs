use std::collections::BTreeSet;
use crate::models::place::OpeningHours;
use crate::models::restaurant::{Mood, OpeningSummary, PriceBucket};

const LIGHT_TYPES: &[&str] = &[
    "sushi_restaurant",
    "japanese_restaurant",
    "seafood_restaurant",
    "salad",
];

const HEAVY_TYPES: &[&str] = &[
    "ramen_restaurant",
    "yakiniku_restaurant",
    "barbecue_restaurant",
    "curry_restaurant",
    "steak_house",
    "hamburger_restaurant",
];

const SWEET_TYPES: &[&str] = &[
    "cafe",
    "bakery",
    "dessert_restaurant",
    "ice_cream_shop",
    "coffee_shop",
];

const FANCY_TYPES: &[&str] = &[
    "italian_restaurant",
    "french_restaurant",
    "fine_dining_restaurant",
    "wine_bar",
    "spanish_restaurant",
];

/// Closing at or after this hour counts as late night.
const LATE_NIGHT_CLOSE_HOUR: u8 = 23;

fn mood_keywords(mood: Mood) -> &'static [&'static str] {
    match mood {
        Mood::Light => LIGHT_TYPES,
        Mood::Heavy => HEAVY_TYPES,
        Mood::Sweet => SWEET_TYPES,
        Mood::Fancy => FANCY_TYPES,
    }
}

/// Multi-label: a place gets every mood whose keyword list shares a tag with it.
pub fn classify_mood<S: AsRef<str>>(types: &[S]) -> BTreeSet<Mood> {
    Mood::ALL
        .into_iter()
        .filter(|mood| {
            let keywords = mood_keywords(*mood);
            types.iter().any(|t| keywords.contains(&t.as_ref()))
        })
        .collect()
}

pub fn classify_price_bucket(price_level: Option<&str>) -> PriceBucket {
    match price_level {
        Some("PRICE_LEVEL_FREE") => PriceBucket::Free,
        Some("PRICE_LEVEL_INEXPENSIVE") => PriceBucket::Inexpensive,
        Some("PRICE_LEVEL_MODERATE") => PriceBucket::Moderate,
        Some("PRICE_LEVEL_EXPENSIVE") => PriceBucket::Expensive,
        Some("PRICE_LEVEL_VERY_EXPENSIVE") => PriceBucket::VeryExpensive,
        _ => PriceBucket::Moderate,
    }
}

pub fn classify_opening_hours(
    current: Option<&OpeningHours>,
    regular: Option<&OpeningHours>,
) -> OpeningSummary {
    let mut summary = OpeningSummary {
        is_open: current.and_then(|hours| hours.open_now),
        ..OpeningSummary::default()
    };

    let Some(regular) = regular else {
        return summary;
    };

    if let Some(periods) = &regular.periods {
        summary.is_24_hours = matches!(
            periods.as_slice(),
            [only] if only.open.is_some() && only.close.is_none()
        );

        summary.is_late_night = periods.iter().any(|period| match period.close {
            Some(close) => {
                close.hour.map_or(false, |hour| hour >= LATE_NIGHT_CLOSE_HOUR)
                    || period.open.and_then(|open| open.day) != close.day
            }
            None => false,
        });
    }

    if let Some(descriptions) = &regular.weekday_descriptions {
        summary.weekday_texts = descriptions.clone();
    }

    summary
}
