//! Errors shared by the geocoding and forecast clients

use thiserror::Error;

/// Errors that can occur when fetching from Open-Meteo
///
/// Callers usually treat every variant the same way: the operation failed as a
/// whole and the user may retry. `is_network` and `is_malformed` split the two
/// underlying causes for logging.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed or returned a non-success status
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Missing expected field in response
    #[error("Missing expected field in response: {0}")]
    MissingField(String),

    /// Invalid time format in response
    #[error("Invalid time format: {0}")]
    InvalidTimeFormat(String),

    /// Time zone identifier not in the IANA database
    #[error("Unknown time zone: {0}")]
    UnknownTimeZone(String),
}

impl FetchError {
    /// Transport failure or non-success response
    pub fn is_network(&self) -> bool {
        matches!(self, Self::RequestFailed(_))
    }

    /// Successful response that could not be turned into the domain model
    pub fn is_malformed(&self) -> bool {
        !self.is_network()
    }

    /// Generic message for display; the details go to the log
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::RequestFailed(_) => "Could not load weather data. Check your connection and try again.",
            _ => "Could not load weather data. Please try again later.",
        }
    }
}
