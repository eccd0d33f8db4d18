use std::time::Duration;
use clap::Parser;
use serde::Serialize;
use time::macros::format_description;
use time::{Time, UtcOffset};
use anyhow::bail;
use crate::helpers::calendar::LunchSlot;
use crate::models::companion::{Companion, CompanionPool};
use crate::repositories::places_repo::DEFAULT_PLACES_API_URL;
use crate::roulette::companion::{RevealTiming, RevealVariant};

#[derive(Parser, Clone, Debug)]
pub struct Config {
    #[clap(env, long, default_value = "development")]
    pub environment: String,

    /// Places API key; searches fail with a credentials error while unset
    #[clap(env, long)]
    pub google_api_key: Option<String>,

    #[clap(env, long, default_value = DEFAULT_PLACES_API_URL)]
    pub places_api_url: String,

    #[clap(env, long, default_value = "ja")]
    pub language_code: String,

    #[clap(env, long, default_value_t = 20)]
    pub max_result_count: u32,

    #[clap(env, long, default_value = "127.0.0.1")]
    pub host: String,

    #[clap(env, long, default_value_t = 3000)]
    pub port: u16,

    /// Comma separated list of origins allowed by CORS
    #[clap(env, long, default_value = "http://localhost:5173")]
    pub origin_urls: String,

    /// Comma separated `Name:CC` entries; the first entry always wins the reveal
    #[clap(env, long)]
    pub companions: Option<String>,

    #[clap(env, long, value_enum, default_value = "shuffled")]
    pub reveal_variant: RevealVariant,

    #[clap(env, long, default_value_t = 80)]
    pub reveal_tick_ms: u64,

    #[clap(env, long, default_value_t = 3)]
    pub reveal_rounds: usize,

    #[clap(env, long, default_value_t = 2000)]
    pub reveal_min_spin_ms: u64,

    #[clap(env, long, default_value_t = 3000)]
    pub reveal_spin_budget_ms: u64,

    #[clap(env, long, default_value_t = true, action = clap::ArgAction::Set)]
    pub reveal_near_miss: bool,

    #[clap(env, long, default_value_t = 1200)]
    pub reveal_fake_hold_ms: u64,

    #[clap(env, long, default_value_t = 1500)]
    pub reveal_final_hold_ms: u64,

    /// Local start of the lunch slot used for calendar exports, HH:MM
    #[clap(env, long, default_value = "12:00", value_parser = parse_clock_time)]
    pub lunch_start: Time,

    #[clap(env, long, default_value_t = 60)]
    pub lunch_minutes: i64,

    #[clap(env, long, default_value_t = 9, allow_hyphen_values = true)]
    pub lunch_utc_offset_hours: i8,

    #[clap(env, long, default_value_t = true, action = clap::ArgAction::Set)]
    pub geolocation_high_accuracy: bool,

    #[clap(env, long, default_value_t = 10_000)]
    pub geolocation_timeout_ms: u64,

    #[clap(env, long, default_value_t = 300_000)]
    pub geolocation_maximum_age_ms: u64,
}

/// Options the browser passes to its one-shot current position query.
#[derive(Clone, Copy, Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GeolocationOptions {
    pub enable_high_accuracy: bool,
    pub timeout: u64,
    pub maximum_age: u64,
}

impl Config {
    pub fn reveal_timing(&self) -> RevealTiming {
        RevealTiming {
            variant: self.reveal_variant,
            tick: Duration::from_millis(self.reveal_tick_ms),
            rounds: self.reveal_rounds,
            min_spin: Duration::from_millis(self.reveal_min_spin_ms),
            spin_budget: Duration::from_millis(self.reveal_spin_budget_ms),
            near_miss: self.reveal_near_miss,
            fake_hold: Duration::from_millis(self.reveal_fake_hold_ms),
            final_hold: Duration::from_millis(self.reveal_final_hold_ms),
        }
    }

    pub fn companion_pool(&self) -> anyhow::Result<CompanionPool> {
        let Some(raw) = self.companions.as_deref() else {
            return Ok(CompanionPool::default());
        };

        let mut companions = Vec::new();
        for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            match entry.rsplit_once(':') {
                Some((name, country)) if !name.trim().is_empty() && !country.trim().is_empty() => {
                    companions.push(Companion::new(name.trim(), country.trim()));
                }
                _ => bail!("Invalid companion entry: {}, expected Name:CC", entry),
            }
        }
        Ok(CompanionPool::new(companions)?)
    }

    pub fn lunch_slot(&self) -> anyhow::Result<LunchSlot> {
        Ok(LunchSlot {
            start: self.lunch_start,
            duration: time::Duration::minutes(self.lunch_minutes),
            utc_offset: UtcOffset::from_hms(self.lunch_utc_offset_hours, 0, 0)?,
        })
    }

    pub fn geolocation_options(&self) -> GeolocationOptions {
        GeolocationOptions {
            enable_high_accuracy: self.geolocation_high_accuracy,
            timeout: self.geolocation_timeout_ms,
            maximum_age: self.geolocation_maximum_age_ms,
        }
    }
}

fn parse_clock_time(value: &str) -> Result<Time, String> {
    Time::parse(value, format_description!("[hour]:[minute]"))
        .map_err(|e| format!("expected HH:MM, got {}: {}", value, e))
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config::parse_from(["lunch-roulette-backend"])
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::time;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["lunch-roulette-backend"]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.language_code, "ja");
        assert_eq!(config.max_result_count, 20);
        assert_eq!(config.places_api_url, "https://places.googleapis.com/v1");
        assert_eq!(config.lunch_start, time!(12:00));
        assert_eq!(config.reveal_variant, RevealVariant::Shuffled);
        assert_eq!(
            config.geolocation_options(),
            GeolocationOptions { enable_high_accuracy: true, timeout: 10_000, maximum_age: 300_000 }
        );
    }

    #[test]
    fn test_overrides() {
        let config = Config::try_parse_from([
            "lunch-roulette-backend",
            "--reveal-variant", "sequential",
            "--reveal-near-miss", "false",
            "--lunch-start", "11:30",
            "--lunch-utc-offset-hours", "-5",
        ]).unwrap();
        assert_eq!(config.reveal_timing().variant, RevealVariant::Sequential);
        assert!(!config.reveal_timing().near_miss);

        let slot = config.lunch_slot().unwrap();
        assert_eq!(slot.start, time!(11:30));
        assert_eq!(slot.utc_offset.whole_hours(), -5);
    }

    #[test]
    fn test_companion_pool_from_list() {
        let config = Config::try_parse_from([
            "lunch-roulette-backend",
            "--companions", "Aiko:JP, Ben:GB ,",
        ]).unwrap();
        let pool = config.companion_pool().unwrap();
        assert_eq!(pool.final_companion(), &Companion::new("Aiko", "JP"));
        assert_eq!(pool.runners_up(), &[Companion::new("Ben", "GB")]);

        assert_eq!(test_config().companion_pool().unwrap(), CompanionPool::default());
    }

    #[test]
    fn test_invalid_companion_list_rejected() {
        let blank = Config::try_parse_from(["lunch-roulette-backend", "--companions", " , "]).unwrap();
        assert!(blank.companion_pool().is_err());

        let missing_country = Config::try_parse_from(["lunch-roulette-backend", "--companions", "Aiko"]).unwrap();
        assert!(missing_country.companion_pool().is_err());
    }

    #[test]
    fn test_invalid_lunch_start_rejected() {
        assert!(Config::try_parse_from(["lunch-roulette-backend", "--lunch-start", "noon"]).is_err());
    }
}
