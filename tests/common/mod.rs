//! Shared fixtures for the wiremock-backed tests

#![allow(dead_code)]

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use himla::data::Location;
use serde_json::{json, Value};

/// First day of every forecast fixture
pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, 15).expect("valid date")
}

/// 05:00 BST on the first fixture day
pub fn five_am_london() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 7, 15, 4, 0, 0).unwrap()
}

pub fn london() -> Location {
    Location::new("London", 51.5074, -0.1278).with_country("United Kingdom")
}

/// Open-Meteo forecast body covering `days` days from [`start_date`]
///
/// Hourly temperature is `10 + hour of day`, so the hour can be read back
/// from the normalized samples.
pub fn forecast_body(days: usize, timezone: &str) -> Value {
    let hours = days * 24;
    let dates: Vec<String> = (0..days)
        .map(|d| (start_date() + Duration::days(d as i64)).format("%Y-%m-%d").to_string())
        .collect();
    let time: Vec<String> = dates
        .iter()
        .flat_map(|date| (0..24).map(move |h| format!("{}T{:02}:00", date, h)))
        .collect();

    json!({
        "latitude": 51.5,
        "longitude": -0.120000124,
        "timezone": timezone,
        "current": {
            "time": "2024-07-15T04:45",
            "temperature_2m": 14.2,
            "relative_humidity_2m": 82,
            "apparent_temperature": 13.6,
            "weather_code": 3,
            "wind_speed_10m": 2.9,
            "wind_gusts_10m": 6.2,
            "wind_direction_10m": 100,
            "surface_pressure": 1011.3,
            "uv_index": 0.0,
            "cloud_cover": 97,
            "precipitation": 0.0
        },
        "hourly": {
            "time": time,
            "temperature_2m": (0..hours).map(|i| 10.0 + (i % 24) as f64).collect::<Vec<_>>(),
            "weather_code": vec![3; hours],
            "relative_humidity_2m": vec![75; hours],
            "uv_index": vec![1.2; hours],
            "wind_speed_10m": vec![3.1; hours],
            "wind_gusts_10m": vec![6.8; hours],
            "wind_direction_10m": vec![225; hours],
            "cloud_cover": vec![90; hours],
            "precipitation_probability": vec![20; hours],
            "precipitation": vec![0.1; hours]
        },
        "daily": {
            "time": dates,
            "weather_code": vec![61; days],
            "temperature_2m_max": vec![21.2; days],
            "temperature_2m_min": vec![12.8; days],
            "precipitation_probability_max": vec![55; days],
            "precipitation_sum": vec![2.4; days],
            "wind_speed_10m_max": vec![7.2; days],
            "uv_index_max": vec![5.1; days],
            "sunrise": dates.iter().map(|d| format!("{}T04:58", d)).collect::<Vec<_>>(),
            "sunset": dates.iter().map(|d| format!("{}T21:13", d)).collect::<Vec<_>>()
        }
    })
}

/// Geocoding result entry
pub fn place(name: &str, country: Option<&str>, admin1: Option<&str>, latitude: f64, longitude: f64) -> Value {
    let mut value = json!({
        "id": 2988507,
        "name": name,
        "latitude": latitude,
        "longitude": longitude,
    });
    if let Some(country) = country {
        value["country"] = json!(country);
    }
    if let Some(admin1) = admin1 {
        value["admin1"] = json!(admin1);
    }
    value
}
