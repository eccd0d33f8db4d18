use serde::{Deserialize, Serialize};
use crate::models::restaurant::Mood;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub enum BudgetFilter {
    #[default]
    #[serde(rename = "all")]
    All,
    /// Up to roughly 500 yen
    #[serde(rename = "500")]
    UpTo500,
    /// Up to roughly 1,000 yen
    #[serde(rename = "1000")]
    UpTo1000,
    #[serde(rename = "over")]
    Over1000,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MoodFilter {
    #[default]
    All,
    Light,
    Heavy,
    Sweet,
    Fancy,
}

impl MoodFilter {
    pub fn mood(&self) -> Option<Mood> {
        match self {
            MoodFilter::All => None,
            MoodFilter::Light => Some(Mood::Light),
            MoodFilter::Heavy => Some(Mood::Heavy),
            MoodFilter::Sweet => Some(Mood::Sweet),
            MoodFilter::Fancy => Some(Mood::Fancy),
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub enum HoursFilter {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "open")]
    OpenNow,
    #[serde(rename = "24h")]
    TwentyFourHours,
    #[serde(rename = "late")]
    LateNight,
}

/// One selection per filter group. Missing query parameters mean "all".
#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    #[serde(default)]
    pub budget: BudgetFilter,
    #[serde(default)]
    pub mood: MoodFilter,
    #[serde(default)]
    pub hours: HoursFilter,
}

/// Walking time options offered to the user, mapped to a search radius.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(try_from = "u32", into = "u32")]
pub enum TravelTime {
    FiveMinutes,
    #[default]
    TenMinutes,
    FifteenMinutes,
    TwentyMinutesOrMore,
}

impl TravelTime {
    pub fn radius_meters(&self) -> f64 {
        match self {
            TravelTime::FiveMinutes => 400.0,
            TravelTime::TenMinutes => 800.0,
            TravelTime::FifteenMinutes => 1200.0,
            TravelTime::TwentyMinutesOrMore => 1600.0,
        }
    }

    pub fn minutes(&self) -> u32 {
        match self {
            TravelTime::FiveMinutes => 5,
            TravelTime::TenMinutes => 10,
            TravelTime::FifteenMinutes => 15,
            TravelTime::TwentyMinutesOrMore => 20,
        }
    }
}

impl TryFrom<u32> for TravelTime {
    type Error = String;

    fn try_from(minutes: u32) -> Result<Self, Self::Error> {
        match minutes {
            5 => Ok(TravelTime::FiveMinutes),
            10 => Ok(TravelTime::TenMinutes),
            15 => Ok(TravelTime::FifteenMinutes),
            m if m >= 20 => Ok(TravelTime::TwentyMinutesOrMore),
            m => Err(format!("unsupported travel time: {} minutes", m)),
        }
    }
}

impl From<TravelTime> for u32 {
    fn from(travel_time: TravelTime) -> Self {
        travel_time.minutes()
    }
}
