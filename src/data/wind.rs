//! Wind-direction quantization
//!
//! Both the compass label and the snapped icon rotation come from the same
//! sector index, so they always agree.

use serde::{Deserialize, Serialize};

use super::conditions::Locale;

/// One of 8 compass sectors, clockwise from north
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompassSector {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

const SECTORS: [CompassSector; 8] = [
    CompassSector::N,
    CompassSector::NE,
    CompassSector::E,
    CompassSector::SE,
    CompassSector::S,
    CompassSector::SW,
    CompassSector::W,
    CompassSector::NW,
];

const ENGLISH_LABELS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];
const SWEDISH_LABELS: [&str; 8] = ["N", "NO", "Ö", "SO", "S", "SV", "V", "NV"];

impl CompassSector {
    /// Position in the table, 0 for north
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Short label in the given locale
    pub fn label(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::English => ENGLISH_LABELS[self.index()],
            Locale::Swedish => SWEDISH_LABELS[self.index()],
        }
    }
}

/// round(degrees / 45) mod 8, rounding halves up
fn sector_index(degrees: f64) -> usize {
    // `as` saturates and maps NaN to 0
    let steps = (degrees / 45.0 + 0.5).floor() as i64;
    steps.rem_euclid(8) as usize
}

/// Compass sector a wind direction falls into
pub fn compass_sector(degrees: f64) -> CompassSector {
    SECTORS[sector_index(degrees)]
}

/// Wind direction snapped to the nearest multiple of 45° in `0..360`
pub fn snap_wind_degrees(degrees: f64) -> u16 {
    sector_index(degrees) as u16 * 45
}
