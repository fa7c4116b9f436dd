//! Open-Meteo geocoding client
//!
//! Resolves a free-text place name into a short, ranked list of candidate
//! locations.

use reqwest::Client;
use serde::Deserialize;

use super::conditions::Locale;
use super::{FetchError, Location};

/// Base URL for the Open-Meteo geocoding API
pub const OPEN_METEO_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";

/// Maximum number of candidates returned per search
pub const MAX_RESULTS: usize = 5;

/// Client for searching places by name
#[derive(Debug, Clone)]
pub struct GeocodingClient {
    client: Client,
    base_url: String,
    locale: Locale,
}

impl Default for GeocodingClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GeocodingClient {
    /// Create a new GeocodingClient with default settings
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    /// Create a new GeocodingClient with a custom HTTP client
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            base_url: OPEN_METEO_GEOCODING_URL.to_string(),
            locale: Locale::default(),
        }
    }

    /// Point the client at a different endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the language place names are returned in
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Search for places matching `query`
    ///
    /// A query that is empty after trimming returns no results without touching
    /// the network. Results keep the upstream relevance order.
    ///
    /// # Returns
    /// * `Ok(Vec<Location>)` - Up to five candidates, possibly none
    /// * `Err(FetchError)` - If the request or parsing fails
    pub async fn search(&self, query: &str) -> Result<Vec<Location>, FetchError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let count = MAX_RESULTS.to_string();
        tracing::debug!(query, language = self.locale.code(), "geocoding search");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("name", query),
                ("count", count.as_str()),
                ("language", self.locale.code()),
                ("format", "json"),
            ])
            .send()
            .await?
            .error_for_status()?;
        let text = response.text().await?;
        let api_response: GeocodingResponse = serde_json::from_str(&text)?;

        let locations = parse_response(api_response);
        tracing::debug!(query, results = locations.len(), "geocoding search finished");
        Ok(locations)
    }
}

/// Convert the raw results, filling absent optional fields with empty strings
fn parse_response(response: GeocodingResponse) -> Vec<Location> {
    response
        .results
        .unwrap_or_default()
        .into_iter()
        .take(MAX_RESULTS)
        .map(|r| Location {
            name: r.name,
            country: r.country.unwrap_or_default(),
            region: r.admin1.unwrap_or_default(),
            latitude: r.latitude,
            longitude: r.longitude,
        })
        .collect()
}

/// Open-Meteo geocoding response structure
#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    /// Absent when nothing matched
    results: Option<Vec<GeocodingResult>>,
}

/// A single geocoding match
#[derive(Debug, Deserialize)]
struct GeocodingResult {
    name: String,
    country: Option<String>,
    admin1: Option<String>,
    latitude: f64,
    longitude: f64,
}
