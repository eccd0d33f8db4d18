use crate::models::filter::{BudgetFilter, FilterCriteria, HoursFilter, MoodFilter};
use crate::models::restaurant::{OpeningSummary, PriceBucket, Restaurant};

/// Returns the restaurants passing every filter group, in their original order.
pub fn apply_filters(restaurants: &[Restaurant], criteria: &FilterCriteria) -> Vec<Restaurant> {
    restaurants
        .iter()
        .filter(|restaurant| matches_criteria(restaurant, criteria))
        .cloned()
        .collect()
}

pub fn matches_criteria(restaurant: &Restaurant, criteria: &FilterCriteria) -> bool {
    matches_budget(restaurant.price_bucket, criteria.budget)
        && matches_mood(restaurant, criteria.mood)
        && matches_hours(restaurant.opening_hours.as_ref(), criteria.hours)
}

/// Places without any price tier are never excluded by budget.
fn matches_budget(bucket: Option<PriceBucket>, budget: BudgetFilter) -> bool {
    let Some(bucket) = bucket else {
        return true;
    };

    match budget {
        BudgetFilter::All => true,
        BudgetFilter::UpTo500 => bucket <= PriceBucket::Inexpensive,
        BudgetFilter::UpTo1000 => bucket <= PriceBucket::Moderate,
        BudgetFilter::Over1000 => bucket >= PriceBucket::Expensive,
    }
}

fn matches_mood(restaurant: &Restaurant, mood: MoodFilter) -> bool {
    match mood.mood() {
        None => true,
        Some(wanted) => restaurant.moods.contains(&wanted),
    }
}

fn matches_hours(summary: Option<&OpeningSummary>, hours: HoursFilter) -> bool {
    let Some(summary) = summary else {
        return true;
    };

    match hours {
        HoursFilter::All => true,
        HoursFilter::OpenNow => summary.is_open == Some(true),
        HoursFilter::TwentyFourHours => summary.is_24_hours,
        HoursFilter::LateNight => summary.is_late_night,
    }
}

/// Result count line shown above the list.
pub fn count_message(total: usize, matching: usize) -> String {
    if matching == 1 {
        "1 restaurant matches your filters".to_string()
    } else if matching > 1 {
        format!("{} restaurants match your filters", matching)
    } else if total > 0 {
        "No restaurant matches your filters".to_string()
    } else {
        String::new()
    }
}
