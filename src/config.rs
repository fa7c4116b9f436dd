//! Runtime configuration
//!
//! Resolved once at startup from command-line flags and their environment
//! variable fallbacks; every client and store is built from it.

use std::path::PathBuf;
use std::time::Duration;

use crate::cli::{parse_locale_arg, Cli, CliError};
use crate::data::forecast::OPEN_METEO_FORECAST_URL;
use crate::data::geocoding::OPEN_METEO_GEOCODING_URL;
use crate::data::{ForecastClient, GeocodingClient, Locale};
use crate::session::DEFAULT_DEBOUNCE;
use crate::store::FileStore;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Geocoding search endpoint
    pub geocoding_url: String,
    /// Forecast endpoint
    pub forecast_url: String,
    /// Language for place names and labels
    pub locale: Locale,
    /// Where preferences are stored; the platform data dir when `None`
    pub data_dir: Option<PathBuf>,
    /// Search-as-you-type delay
    pub debounce: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            geocoding_url: OPEN_METEO_GEOCODING_URL.to_string(),
            forecast_url: OPEN_METEO_FORECAST_URL.to_string(),
            locale: Locale::default(),
            data_dir: None,
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

impl Config {
    /// Creates a Config from parsed CLI arguments, defaulting what was not given
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let defaults = Self::default();
        Ok(Self {
            geocoding_url: cli.geocoding_url.clone().unwrap_or(defaults.geocoding_url),
            forecast_url: cli.forecast_url.clone().unwrap_or(defaults.forecast_url),
            locale: parse_locale_arg(&cli.locale)?,
            data_dir: cli.data_dir.clone(),
            debounce: defaults.debounce,
        })
    }

    pub fn geocoding_client(&self) -> GeocodingClient {
        GeocodingClient::new()
            .with_base_url(&self.geocoding_url)
            .with_locale(self.locale)
    }

    pub fn forecast_client(&self) -> ForecastClient {
        ForecastClient::new().with_base_url(&self.forecast_url)
    }

    /// Preference store, `None` when no data directory can be determined
    pub fn store(&self) -> Option<FileStore> {
        match &self.data_dir {
            Some(dir) => Some(FileStore::with_dir(dir.clone())),
            None => FileStore::new(),
        }
    }
}
