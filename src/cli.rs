//! Command-line interface parsing for Himla
//!
//! Global flags select endpoints, language and the data directory, each with an
//! environment variable fallback. Subcommands cover searching, showing a
//! forecast, listing recent locations and switching the icon style.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use thiserror::Error;

use crate::data::Locale;
use crate::store::IconStyle;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified locale is not supported
    #[error("Invalid locale: '{0}'. Valid locales: en, sv")]
    InvalidLocale(String),

    /// The specified icon style is not recognized
    #[error("Invalid icon style: '{0}'. Valid styles: lucide, meteocons")]
    InvalidIconStyle(String),

    /// --pick is outside the list of candidates
    #[error("No candidate number {pick}: the search returned {available}")]
    PickOutOfRange { pick: usize, available: usize },
}

/// Himla - weather forecasts from Open-Meteo in your terminal
#[derive(Parser, Debug)]
#[command(name = "himla")]
#[command(about = "Weather search and 14-day forecasts from Open-Meteo")]
#[command(version)]
pub struct Cli {
    /// Language for place names and labels (en, sv)
    #[arg(long, global = true, env = "HIMLA_LOCALE", default_value = "en")]
    pub locale: String,

    /// Geocoding endpoint
    #[arg(long, global = true, env = "HIMLA_GEOCODING_URL", value_name = "URL")]
    pub geocoding_url: Option<String>,

    /// Forecast endpoint
    #[arg(long, global = true, env = "HIMLA_FORECAST_URL", value_name = "URL")]
    pub forecast_url: Option<String>,

    /// Directory for recent locations and preferences
    #[arg(long, global = true, env = "HIMLA_DATA_DIR", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List places matching a name
    Search {
        /// Place name, e.g. "Paris"
        query: String,
    },

    /// Show the forecast for a place, coordinates or the last place viewed
    ///
    /// Examples:
    ///   himla forecast Uppsala
    ///   himla forecast Paris --pick 2
    ///   himla forecast --lat 59.33 --lon 18.07
    Forecast {
        /// Place name to search for
        query: Option<String>,

        /// Latitude, used with --lon instead of a place name
        #[arg(long, requires = "lon", conflicts_with = "query", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude, used with --lat instead of a place name
        #[arg(long, requires = "lat", conflicts_with = "query", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Which search candidate to use, 1-based
        #[arg(long, default_value_t = 1)]
        pick: usize,
    },

    /// List recently viewed places, newest first
    Recent,

    /// Show or change the icon style
    Icons {
        /// New style (lucide, meteocons)
        style: Option<String>,

        /// Switch to the other style
        #[arg(long, conflicts_with = "style")]
        toggle: bool,
    },

    /// Search as you type, one query per line; enter a number to load a result
    Interactive,
}

/// Parses a locale argument
///
/// # Returns
/// * `Ok(Locale)` for `en`/`english` or `sv`/`swedish`/`svenska`
/// * `Err(CliError::InvalidLocale)` otherwise
pub fn parse_locale_arg(s: &str) -> Result<Locale, CliError> {
    s.parse().map_err(|_| CliError::InvalidLocale(s.to_string()))
}

/// Parses an icon style argument
pub fn parse_icon_style_arg(s: &str) -> Result<IconStyle, CliError> {
    s.parse().map_err(|_| CliError::InvalidIconStyle(s.to_string()))
}

/// Index into a candidate list for a 1-based `--pick`
pub fn pick_index(pick: usize, available: usize) -> Result<usize, CliError> {
    if pick == 0 || pick > available {
        return Err(CliError::PickOutOfRange { pick, available });
    }
    Ok(pick - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_locale_arg_aliases() {
        assert_eq!(parse_locale_arg("en").unwrap(), Locale::English);
        assert_eq!(parse_locale_arg("SV").unwrap(), Locale::Swedish);
        assert_eq!(parse_locale_arg("svenska").unwrap(), Locale::Swedish);
    }

    #[test]
    fn test_parse_locale_arg_invalid() {
        let err = parse_locale_arg("fr").unwrap_err();
        assert!(err.to_string().contains("Invalid locale"));
        assert!(err.to_string().contains("fr"));
    }

    #[test]
    fn test_parse_icon_style_arg() {
        assert_eq!(parse_icon_style_arg("meteocons").unwrap(), IconStyle::Meteocons);
        assert!(parse_icon_style_arg("emoji").is_err());
    }

    #[test]
    fn test_pick_index_bounds() {
        assert_eq!(pick_index(1, 2).unwrap(), 0);
        assert_eq!(pick_index(2, 2).unwrap(), 1);
        assert!(pick_index(0, 2).is_err());
        assert!(pick_index(3, 2).is_err());
        assert!(pick_index(1, 0).is_err());
    }

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::parse_from(["himla"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_search() {
        let cli = Cli::parse_from(["himla", "search", "Paris"]);
        assert_eq!(
            cli.command,
            Some(Command::Search {
                query: "Paris".to_string()
            })
        );
    }

    #[test]
    fn test_cli_parse_forecast_with_negative_coordinates() {
        let cli = Cli::parse_from(["himla", "forecast", "--lat", "51.5074", "--lon", "-0.1278"]);
        match cli.command {
            Some(Command::Forecast { query, lat, lon, pick }) => {
                assert!(query.is_none());
                assert!((lat.unwrap() - 51.5074).abs() < 0.0001);
                assert!((lon.unwrap() + 0.1278).abs() < 0.0001);
                assert_eq!(pick, 1);
            }
            other => panic!("Expected forecast command, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_lat_requires_lon() {
        assert!(Cli::try_parse_from(["himla", "forecast", "--lat", "51.5"]).is_err());
    }

    #[test]
    fn test_cli_query_conflicts_with_coordinates() {
        let result =
            Cli::try_parse_from(["himla", "forecast", "Paris", "--lat", "1", "--lon", "2"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_global_flag_after_subcommand() {
        let cli = Cli::parse_from(["himla", "recent", "--locale", "sv"]);
        assert_eq!(cli.locale, "sv");
        assert_eq!(cli.command, Some(Command::Recent));
    }

    #[test]
    fn test_cli_icons_toggle() {
        let cli = Cli::parse_from(["himla", "icons", "--toggle"]);
        assert_eq!(
            cli.command,
            Some(Command::Icons {
                style: None,
                toggle: true
            })
        );
        assert!(Cli::try_parse_from(["himla", "icons", "lucide", "--toggle"]).is_err());
    }
}
