//! Open-Meteo forecast client
//!
//! This module fetches current, hourly and daily weather for a location and
//! normalizes the parallel-array response into the display-ready model:
//! rounding, defaults for missing series, and the "next 24 hours" window
//! aligned to the location's own wall clock.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use reqwest::Client;
use serde::Deserialize;

use super::{
    CurrentConditions, DailySample, FetchError, ForecastResult, HourlySample, Location,
};

/// Base URL for the Open-Meteo forecast API
pub const OPEN_METEO_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Number of days requested per fetch
pub const FORECAST_DAYS: u32 = 14;

/// Length of the "next hours" window
pub const WINDOW_HOURS: usize = 24;

/// Visibility reported when the endpoint does not provide one, in km
pub const DEFAULT_VISIBILITY_KM: f64 = 10.0;

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,weather_code,wind_speed_10m,wind_gusts_10m,wind_direction_10m,surface_pressure,uv_index,cloud_cover,precipitation";
const HOURLY_FIELDS: &str = "temperature_2m,weather_code,relative_humidity_2m,uv_index,wind_speed_10m,wind_gusts_10m,wind_direction_10m,cloud_cover,precipitation_probability,precipitation";
const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min,precipitation_probability_max,precipitation_sum,wind_speed_10m_max,uv_index_max,sunrise,sunset";

/// Client for fetching forecasts from Open-Meteo API
#[derive(Debug, Clone)]
pub struct ForecastClient {
    client: Client,
    base_url: String,
}

impl Default for ForecastClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ForecastClient {
    /// Create a new ForecastClient with default settings
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    /// Create a new ForecastClient with a custom HTTP client
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            base_url: OPEN_METEO_FORECAST_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch and normalize the 14-day forecast for a location
    ///
    /// One request, no retry. Either the whole model is built or the call fails.
    pub async fn fetch_forecast(&self, location: &Location) -> Result<ForecastResult, FetchError> {
        self.fetch_forecast_at(location, Utc::now()).await
    }

    /// Same as [`fetch_forecast`](Self::fetch_forecast), aligning the hourly
    /// window to `now` instead of the system clock
    pub async fn fetch_forecast_at(
        &self,
        location: &Location,
        now: DateTime<Utc>,
    ) -> Result<ForecastResult, FetchError> {
        tracing::debug!(
            latitude = location.latitude,
            longitude = location.longitude,
            "fetching forecast"
        );

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", location.latitude.to_string()),
                ("longitude", location.longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
                ("hourly", HOURLY_FIELDS.to_string()),
                ("daily", DAILY_FIELDS.to_string()),
                ("timezone", "auto".to_string()),
                ("forecast_days", FORECAST_DAYS.to_string()),
                ("wind_speed_unit", "ms".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;
        let text = response.text().await?;
        let api_response: ForecastResponse = serde_json::from_str(&text)?;

        normalize(location.clone(), api_response, now)
    }
}

/// Build the domain model from a parsed response
fn normalize(
    location: Location,
    response: ForecastResponse,
    now: DateTime<Utc>,
) -> Result<ForecastResult, FetchError> {
    let timezone: Tz = response
        .timezone
        .parse()
        .map_err(|_| FetchError::UnknownTimeZone(response.timezone.clone()))?;

    let current = parse_current(&response.current);
    let full_hourly = parse_hourly_data(&response.hourly)?;
    let (daily, sunrises, sunsets) = parse_daily_data(&response.daily)?;

    let local = local_now(now, timezone);
    let alignment_index = alignment_index(&full_hourly, local);
    let windowed_hourly = window(&full_hourly, alignment_index).to_vec();
    tracing::debug!(
        %timezone,
        %local,
        alignment_index,
        hours = full_hourly.len(),
        days = daily.len(),
        "forecast normalized"
    );

    Ok(ForecastResult {
        location,
        current,
        full_hourly,
        windowed_hourly,
        daily,
        sunrises,
        sunsets,
        timezone,
        alignment_index,
    })
}

fn parse_current(current: &CurrentWeather) -> CurrentConditions {
    CurrentConditions {
        temperature: round_whole(current.temperature_2m),
        feels_like: round_whole(current.apparent_temperature),
        humidity: percent(current.relative_humidity_2m),
        wind_speed: round_whole(current.wind_speed_10m),
        wind_direction: current.wind_direction_10m,
        wind_gusts: round_whole(current.wind_gusts_10m),
        weather_code: current.weather_code,
        uv_index: round_tenth(current.uv_index),
        pressure: round_whole(current.surface_pressure),
        cloud_cover: percent(current.cloud_cover),
        precipitation: current.precipitation,
        visibility: current
            .visibility
            .map(|meters| round_tenth(meters / 1000.0))
            .unwrap_or(DEFAULT_VISIBILITY_KM),
    }
}

/// Parse hourly weather data arrays into HourlySample structs
fn parse_hourly_data(hourly: &HourlyWeather) -> Result<Vec<HourlySample>, FetchError> {
    let len = hourly.time.len();

    // Validate that all required arrays have the same length
    if hourly.temperature_2m.len() != len
        || hourly.weather_code.len() != len
        || hourly.relative_humidity_2m.len() != len
        || hourly.uv_index.len() != len
        || hourly.wind_speed_10m.len() != len
        || hourly.wind_gusts_10m.len() != len
        || hourly.wind_direction_10m.len() != len
        || hourly.cloud_cover.len() != len
    {
        return Err(FetchError::MissingField(
            "hourly arrays have inconsistent lengths".to_string(),
        ));
    }

    let mut samples = Vec::with_capacity(len);

    for i in 0..len {
        samples.push(HourlySample {
            time: parse_datetime(&hourly.time[i])?,
            temperature: round_whole(required(&hourly.temperature_2m, i, "hourly.temperature_2m")?),
            weather_code: required(&hourly.weather_code, i, "hourly.weather_code")?,
            humidity: percent(required(&hourly.relative_humidity_2m, i, "hourly.relative_humidity_2m")?),
            uv_index: round_tenth(required(&hourly.uv_index, i, "hourly.uv_index")?),
            wind_speed: round_whole(required(&hourly.wind_speed_10m, i, "hourly.wind_speed_10m")?),
            wind_gusts: round_whole(required(&hourly.wind_gusts_10m, i, "hourly.wind_gusts_10m")?),
            wind_direction: required(&hourly.wind_direction_10m, i, "hourly.wind_direction_10m")?,
            cloud_cover: percent(required(&hourly.cloud_cover, i, "hourly.cloud_cover")?),
            precipitation_probability: percent(or_zero(&hourly.precipitation_probability, i)),
            precipitation: round_tenth(or_zero(&hourly.precipitation, i)),
        });
    }

    Ok(samples)
}

type DailyParts = (Vec<DailySample>, Vec<NaiveDateTime>, Vec<NaiveDateTime>);

/// Parse daily weather data arrays, plus the sunrise and sunset series
fn parse_daily_data(daily: &DailyWeather) -> Result<DailyParts, FetchError> {
    let len = daily.time.len();

    if daily.weather_code.len() != len
        || daily.temperature_2m_max.len() != len
        || daily.temperature_2m_min.len() != len
        || daily.wind_speed_10m_max.len() != len
        || daily.uv_index_max.len() != len
        || daily.sunrise.len() != len
        || daily.sunset.len() != len
    {
        return Err(FetchError::MissingField(
            "daily arrays have inconsistent lengths".to_string(),
        ));
    }

    let mut days = Vec::with_capacity(len);
    for i in 0..len {
        days.push(DailySample {
            date: parse_date(&daily.time[i])?,
            temp_max: round_whole(required(&daily.temperature_2m_max, i, "daily.temperature_2m_max")?),
            temp_min: round_whole(required(&daily.temperature_2m_min, i, "daily.temperature_2m_min")?),
            weather_code: required(&daily.weather_code, i, "daily.weather_code")?,
            precipitation_probability: percent(or_zero(&daily.precipitation_probability_max, i)),
            precipitation_sum: round_tenth(or_zero(&daily.precipitation_sum, i)),
            wind_speed_max: round_whole(required(&daily.wind_speed_10m_max, i, "daily.wind_speed_10m_max")?),
            uv_index_max: round_tenth(required(&daily.uv_index_max, i, "daily.uv_index_max")?),
        });
    }

    let sunrises = daily
        .sunrise
        .iter()
        .map(|s| parse_datetime(s))
        .collect::<Result<Vec<_>, _>>()?;
    let sunsets = daily
        .sunset
        .iter()
        .map(|s| parse_datetime(s))
        .collect::<Result<Vec<_>, _>>()?;

    Ok((days, sunrises, sunsets))
}

/// Value at `index`, failing on null
///
/// A null in a required series fails the whole fetch; it is not read as 0.
/// Only the precipitation series go through [`or_zero`].
fn required<T: Copy>(series: &[Option<T>], index: usize, name: &str) -> Result<T, FetchError> {
    series
        .get(index)
        .copied()
        .flatten()
        .ok_or_else(|| FetchError::MissingField(format!("{}[{}]", name, index)))
}

/// Value at `index`, zero when null or past the end of the series
fn or_zero(series: &[Option<f64>], index: usize) -> f64 {
    series.get(index).copied().flatten().unwrap_or(0.0)
}

/// Round to the nearest whole number, halves toward positive infinity
pub(crate) fn round_whole(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

/// Round to one decimal place, halves toward positive infinity
pub(crate) fn round_tenth(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}

/// Whole-number percentage clamped into 0..=100
fn percent(value: f64) -> u8 {
    round_whole(value).clamp(0, 100) as u8
}

/// Wall-clock time at the forecast location
pub fn local_now(now: DateTime<Utc>, timezone: Tz) -> NaiveDateTime {
    now.with_timezone(&timezone).naive_local()
}

/// Index of the first sample at or after `local_now`
///
/// When every sample is in the past the last index is used, so the window
/// degrades to the final hour instead of disappearing. An empty sequence
/// aligns at 0.
pub fn alignment_index(hourly: &[HourlySample], local_now: NaiveDateTime) -> usize {
    match hourly.iter().position(|h| h.time >= local_now) {
        Some(index) => index,
        None => {
            if !hourly.is_empty() {
                tracing::warn!(%local_now, "no hourly sample at or after local now; clamping to last hour");
            }
            hourly.len().saturating_sub(1)
        }
    }
}

/// Up to [`WINDOW_HOURS`] samples starting at `start`
pub fn window(hourly: &[HourlySample], start: usize) -> &[HourlySample] {
    let start = start.min(hourly.len());
    let end = (start + WINDOW_HOURS).min(hourly.len());
    &hourly[start..end]
}

/// Parse a datetime string in ISO 8601 format (e.g., "2024-07-15T05:30") to NaiveDateTime
fn parse_datetime(datetime_str: &str) -> Result<NaiveDateTime, FetchError> {
    NaiveDateTime::parse_from_str(datetime_str, "%Y-%m-%dT%H:%M")
        .map_err(|_| FetchError::InvalidTimeFormat(datetime_str.to_string()))
}

/// Parse a calendar date (e.g., "2024-07-15")
fn parse_date(date_str: &str) -> Result<NaiveDate, FetchError> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| FetchError::InvalidTimeFormat(date_str.to_string()))
}

/// Open-Meteo forecast response structure
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    timezone: String,
    current: CurrentWeather,
    hourly: HourlyWeather,
    daily: DailyWeather,
}

/// Current weather data from Open-Meteo
#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    apparent_temperature: f64,
    weather_code: i32,
    wind_speed_10m: f64,
    wind_gusts_10m: f64,
    wind_direction_10m: f64,
    surface_pressure: f64,
    uv_index: f64,
    cloud_cover: f64,
    precipitation: f64,
    /// Meters; only present when explicitly requested
    #[serde(default)]
    visibility: Option<f64>,
}

/// Hourly weather data from Open-Meteo, one array per variable
#[derive(Debug, Deserialize)]
struct HourlyWeather {
    time: Vec<String>,
    temperature_2m: Vec<Option<f64>>,
    weather_code: Vec<Option<i32>>,
    relative_humidity_2m: Vec<Option<f64>>,
    uv_index: Vec<Option<f64>>,
    wind_speed_10m: Vec<Option<f64>>,
    wind_gusts_10m: Vec<Option<f64>>,
    wind_direction_10m: Vec<Option<f64>>,
    cloud_cover: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_probability: Vec<Option<f64>>,
    #[serde(default)]
    precipitation: Vec<Option<f64>>,
}

/// Daily weather data from Open-Meteo
#[derive(Debug, Deserialize)]
struct DailyWeather {
    time: Vec<String>,
    weather_code: Vec<Option<i32>>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_probability_max: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_sum: Vec<Option<f64>>,
    wind_speed_10m_max: Vec<Option<f64>>,
    uv_index_max: Vec<Option<f64>>,
    sunrise: Vec<String>,
    sunset: Vec<String>,
}
