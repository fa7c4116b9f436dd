//! Core data models for Himla
//!
//! This module contains the display-ready domain model produced from Open-Meteo
//! responses, plus the clients and lookup tables that build it.

pub mod conditions;
pub mod error;
pub mod forecast;
pub mod geocoding;
pub mod wind;

pub use conditions::{classify, is_night, Classification, IconKey, Locale};
pub use error::FetchError;
pub use forecast::{ForecastClient, FORECAST_DAYS, WINDOW_HOURS};
pub use geocoding::{GeocodingClient, MAX_RESULTS};
pub use wind::{compass_sector, snap_wind_degrees, CompassSector};

use chrono::{NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// A place resolved by the geocoder
///
/// Two locations are equal when their coordinates are equal; names are not
/// unique and are ignored for identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    /// Place name as returned by the geocoder
    pub name: String,
    /// Country name, empty when unknown
    #[serde(default)]
    pub country: String,
    /// First-level administrative region, empty when unknown
    #[serde(default)]
    pub region: String,
    /// Latitude coordinate
    pub latitude: f64,
    /// Longitude coordinate
    pub longitude: f64,
}

impl Location {
    /// Creates a location with no country or region
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            country: String::new(),
            region: String::new(),
            latitude,
            longitude,
        }
    }

    /// Builder-style setter for the country
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    /// Builder-style setter for the region
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// "Name, Country", or just the name when the country is unknown
    pub fn display_name(&self) -> String {
        if self.country.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.country)
        }
    }
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        self.latitude == other.latitude && self.longitude == other.longitude
    }
}

/// Weather at the most recent sample before now
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Temperature in whole degrees Celsius
    pub temperature: i32,
    /// Apparent temperature in whole degrees Celsius
    pub feels_like: i32,
    /// Relative humidity percentage (0-100)
    pub humidity: u8,
    /// Wind speed in whole m/s
    pub wind_speed: i32,
    /// Wind direction in degrees
    pub wind_direction: f64,
    /// Wind gusts in whole m/s
    pub wind_gusts: i32,
    /// WMO weather code
    pub weather_code: i32,
    /// UV index, one decimal
    pub uv_index: f64,
    /// Surface pressure in whole hPa
    pub pressure: i32,
    /// Cloud cover percentage (0-100)
    pub cloud_cover: u8,
    /// Precipitation in mm
    pub precipitation: f64,
    /// Visibility in km. Not measured: the endpoint does not report it.
    pub visibility: f64,
}

/// One hour of the forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlySample {
    /// Location-local wall-clock time of the sample
    pub time: NaiveDateTime,
    pub temperature: i32,
    pub weather_code: i32,
    pub humidity: u8,
    pub uv_index: f64,
    pub wind_speed: i32,
    pub wind_gusts: i32,
    pub wind_direction: f64,
    pub cloud_cover: u8,
    pub precipitation_probability: u8,
    /// Precipitation in mm, one decimal
    pub precipitation: f64,
}

/// One calendar day of the forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySample {
    pub date: NaiveDate,
    pub temp_max: i32,
    pub temp_min: i32,
    pub weather_code: i32,
    pub precipitation_probability: u8,
    /// Precipitation sum in mm, one decimal
    pub precipitation_sum: f64,
    pub wind_speed_max: i32,
    pub uv_index_max: f64,
}

/// Normalized forecast for one location
///
/// Built fresh for every fetch and never mutated afterwards. Consumers hold it
/// behind an `Arc` and swap the whole value when a newer fetch lands.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResult {
    /// The location this forecast was requested for
    pub location: Location,
    /// Current conditions
    pub current: CurrentConditions,
    /// Every hourly sample of the fetch horizon
    pub full_hourly: Vec<HourlySample>,
    /// Up to 24 samples starting at `alignment_index`
    pub windowed_hourly: Vec<HourlySample>,
    /// One entry per day, ascending
    pub daily: Vec<DailySample>,
    /// Sunrise per day, index-aligned with `daily`
    pub sunrises: Vec<NaiveDateTime>,
    /// Sunset per day, index-aligned with `daily`
    pub sunsets: Vec<NaiveDateTime>,
    /// IANA time zone the API resolved for the coordinates
    pub timezone: Tz,
    /// Position in `full_hourly` of the first sample at or after local now
    pub alignment_index: usize,
}

impl ForecastResult {
    /// Hourly samples falling on the given calendar day
    pub fn hourly_for_day(&self, date: NaiveDate) -> &[HourlySample] {
        let start = self.full_hourly.partition_point(|h| h.time.date() < date);
        let end = self.full_hourly.partition_point(|h| h.time.date() <= date);
        &self.full_hourly[start..end]
    }

    /// Mean temperature of each two-hour block of a day, rounded to whole degrees
    pub fn temperature_blocks(&self, date: NaiveDate) -> Vec<i32> {
        self.hourly_for_day(date)
            .chunks(2)
            .map(|block| {
                let sum: i32 = block.iter().map(|h| h.temperature).sum();
                forecast::round_whole(f64::from(sum) / block.len() as f64)
            })
            .collect()
    }

    /// Lowest daily minimum and highest daily maximum across the horizon
    pub fn temperature_range(&self) -> Option<(i32, i32)> {
        let min = self.daily.iter().map(|d| d.temp_min).min()?;
        let max = self.daily.iter().map(|d| d.temp_max).max()?;
        Some((min, max))
    }

    /// Sunrise and sunset for a calendar day, if it is within the horizon
    pub fn sun_times(&self, date: NaiveDate) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let index = self.daily.iter().position(|d| d.date == date)?;
        Some((*self.sunrises.get(index)?, *self.sunsets.get(index)?))
    }

    /// Whether a local time falls outside daylight on its own calendar day
    ///
    /// Times on days outside the fetched horizon count as day.
    pub fn is_night(&self, time: NaiveDateTime) -> bool {
        self.sun_times(time.date())
            .map(|(sunrise, sunset)| is_night(time, sunrise, sunset))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(time: &str, temperature: i32) -> HourlySample {
        HourlySample {
            time: NaiveDateTime::parse_from_str(time, "%Y-%m-%dT%H:%M").unwrap(),
            temperature,
            weather_code: 0,
            humidity: 50,
            uv_index: 0.0,
            wind_speed: 3,
            wind_gusts: 5,
            wind_direction: 180.0,
            cloud_cover: 0,
            precipitation_probability: 0,
            precipitation: 0.0,
        }
    }

    fn day(date: &str, temp_min: i32, temp_max: i32) -> DailySample {
        DailySample {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            temp_max,
            temp_min,
            weather_code: 3,
            precipitation_probability: 10,
            precipitation_sum: 0.2,
            wind_speed_max: 6,
            uv_index_max: 4.5,
        }
    }

    fn result() -> ForecastResult {
        let mut full_hourly = Vec::new();
        for (d, date) in ["2024-07-15", "2024-07-16"].iter().enumerate() {
            for h in 0..24 {
                full_hourly.push(sample(&format!("{}T{:02}:00", date, h), (d as i32) * 10 + h));
            }
        }
        let parse = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").unwrap();
        ForecastResult {
            location: Location::new("London", 51.5074, -0.1278).with_country("United Kingdom"),
            current: CurrentConditions {
                temperature: 18,
                feels_like: 17,
                humidity: 60,
                wind_speed: 4,
                wind_direction: 225.0,
                wind_gusts: 9,
                weather_code: 2,
                uv_index: 3.1,
                pressure: 1012,
                cloud_cover: 40,
                precipitation: 0.0,
                visibility: 10.0,
            },
            windowed_hourly: full_hourly[..24].to_vec(),
            full_hourly,
            daily: vec![day("2024-07-15", 12, 22), day("2024-07-16", 9, 25)],
            sunrises: vec![parse("2024-07-15T05:01"), parse("2024-07-16T05:03")],
            sunsets: vec![parse("2024-07-15T21:10"), parse("2024-07-16T21:08")],
            timezone: chrono_tz::Europe::London,
            alignment_index: 0,
        }
    }

    #[test]
    fn test_location_identity_is_coordinates() {
        let a = Location::new("Paris", 48.8566, 2.3522).with_country("France");
        let b = Location::new("Paree", 48.8566, 2.3522);
        let c = Location::new("Paris", 33.6609, -95.5555).with_country("United States");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_location_display_name() {
        let london = Location::new("London", 51.5074, -0.1278).with_country("United Kingdom");
        assert_eq!(london.display_name(), "London, United Kingdom");
        assert_eq!(Location::new("Nowhere", 0.0, 0.0).display_name(), "Nowhere");
    }

    #[test]
    fn test_location_deserializes_without_optional_fields() {
        let json = r#"{"name": "Kiruna", "latitude": 67.85, "longitude": 20.22}"#;
        let location: Location = serde_json::from_str(json).expect("Failed to parse location");

        assert_eq!(location.country, "");
        assert_eq!(location.region, "");
    }

    #[test]
    fn test_hourly_for_day_selects_one_calendar_day() {
        let result = result();
        let date = NaiveDate::from_ymd_opt(2024, 7, 16).unwrap();
        let hours = result.hourly_for_day(date);

        assert_eq!(hours.len(), 24);
        assert!(hours.iter().all(|h| h.time.date() == date));

        let outside = NaiveDate::from_ymd_opt(2024, 7, 20).unwrap();
        assert!(result.hourly_for_day(outside).is_empty());
    }

    #[test]
    fn test_temperature_blocks_average_pairs_of_hours() {
        let result = result();
        let blocks = result.temperature_blocks(NaiveDate::from_ymd_opt(2024, 7, 15).unwrap());

        assert_eq!(blocks.len(), 12);
        // Hours 0 and 1 are 0° and 1°, mean 0.5 rounds up
        assert_eq!(blocks[0], 1);
        assert_eq!(blocks[11], 23);
    }

    #[test]
    fn test_temperature_range_spans_all_days() {
        assert_eq!(result().temperature_range(), Some((9, 25)));
    }

    #[test]
    fn test_is_night_uses_the_matching_day() {
        let result = result();
        let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").unwrap();

        assert!(result.is_night(at("2024-07-15T04:00")));
        assert!(!result.is_night(at("2024-07-15T12:00")));
        assert!(result.is_night(at("2024-07-16T21:08")));
        assert!(!result.is_night(at("2024-07-30T02:00")));
    }
}
