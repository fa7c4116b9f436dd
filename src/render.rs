//! Plain-text rendering of locations and forecasts
//!
//! Consumes the normalized model only; nothing here talks to the network or
//! the store.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use std::fmt;

use crate::data::{classify, compass_sector, snap_wind_degrees, ForecastResult, Locale, Location};
use crate::store::IconStyle;

/// Block characters for the temperature curve (8 levels)
const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Fixed strings per locale
struct Labels {
    no_results: &'static str,
    feels_like: &'static str,
    wind: &'static str,
    gusts: &'static str,
    humidity: &'static str,
    cloud_cover: &'static str,
    pressure: &'static str,
    precipitation: &'static str,
    visibility: &'static str,
    sunrise: &'static str,
    sunset: &'static str,
    next_hours: &'static str,
    days: &'static str,
    now: &'static str,
    today: &'static str,
}

const ENGLISH: Labels = Labels {
    no_results: "No matching places",
    feels_like: "feels like",
    wind: "Wind",
    gusts: "gusts",
    humidity: "Humidity",
    cloud_cover: "Cloud cover",
    pressure: "Pressure",
    precipitation: "Precipitation",
    visibility: "Visibility",
    sunrise: "Sunrise",
    sunset: "Sunset",
    next_hours: "Next 24 hours",
    days: "14-day forecast",
    now: "Now",
    today: "Today",
};

const SWEDISH: Labels = Labels {
    no_results: "Inga matchande platser",
    feels_like: "känns som",
    wind: "Vind",
    gusts: "byar",
    humidity: "Luftfuktighet",
    cloud_cover: "Molnighet",
    pressure: "Lufttryck",
    precipitation: "Nederbörd",
    visibility: "Sikt",
    sunrise: "Soluppgång",
    sunset: "Solnedgång",
    next_hours: "Kommande 24 timmar",
    days: "14 dagar",
    now: "Nu",
    today: "Idag",
};

fn labels(locale: Locale) -> &'static Labels {
    match locale {
        Locale::English => &ENGLISH,
        Locale::Swedish => &SWEDISH,
    }
}

fn weekday_name(weekday: Weekday, locale: Locale) -> &'static str {
    let index = weekday.num_days_from_monday() as usize;
    match locale {
        Locale::English => ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"][index],
        Locale::Swedish => ["mån", "tis", "ons", "tor", "fre", "lör", "sön"][index],
    }
}

/// Map a temperature onto a block character within `min..=max`
fn temperature_to_block(value: i32, min: i32, max: i32) -> char {
    if max <= min {
        return BLOCKS[0];
    }
    let normalized = (f64::from(value - min) / f64::from(max - min)).clamp(0.0, 1.0);
    let index = ((normalized * 7.0).round() as usize).min(7);
    BLOCKS[index]
}

/// One block character per temperature, scaled to the given range
///
/// Using the whole forecast's range keeps bars comparable between days.
pub fn temperature_sparkline(temperatures: &[i32], min: i32, max: i32) -> String {
    temperatures
        .iter()
        .map(|t| temperature_to_block(*t, min, max))
        .collect()
}

/// Numbered candidate list, 1-based
pub struct LocationList<'a> {
    pub locations: &'a [Location],
    pub locale: Locale,
}

impl fmt::Display for LocationList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.locations.is_empty() {
            return writeln!(f, "{}", labels(self.locale).no_results);
        }

        for (i, location) in self.locations.iter().enumerate() {
            write!(f, "{:>2}. {}", i + 1, location.name)?;
            if !location.region.is_empty() {
                write!(f, ", {}", location.region)?;
            }
            if !location.country.is_empty() {
                write!(f, ", {}", location.country)?;
            }
            writeln!(f, " ({:.4}, {:.4})", location.latitude, location.longitude)?;
        }
        Ok(())
    }
}

/// Full forecast view: current conditions, the next 24 hours and the days
pub struct ForecastView<'a> {
    pub result: &'a ForecastResult,
    pub locale: Locale,
    pub style: IconStyle,
}

impl ForecastView<'_> {
    fn write_current(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (result, locale, text) = (self.result, self.locale, labels(self.locale));

        // The first windowed sample is the current hour
        let now = result.windowed_hourly.first().map(|h| h.time);
        let night_now = now.map(|t| result.is_night(t)).unwrap_or(false);

        let current = &result.current;
        let classification = classify(current.weather_code, locale);
        writeln!(
            f,
            "{} [{}]",
            classification.label,
            self.style.icon_name(classification.icon, night_now)
        )?;
        writeln!(
            f,
            "{}°C, {} {}°C",
            current.temperature, text.feels_like, current.feels_like
        )?;
        writeln!(
            f,
            "{} {} m/s {} ({}°), {} {} m/s",
            text.wind,
            current.wind_speed,
            compass_sector(current.wind_direction).label(locale),
            snap_wind_degrees(current.wind_direction),
            text.gusts,
            current.wind_gusts
        )?;
        writeln!(
            f,
            "{} {}%  {} {}%  UV {:.1}",
            text.humidity, current.humidity, text.cloud_cover, current.cloud_cover, current.uv_index
        )?;
        writeln!(
            f,
            "{} {} hPa  {} {:.1} mm  {} {} km",
            text.pressure,
            current.pressure,
            text.precipitation,
            current.precipitation,
            text.visibility,
            current.visibility
        )?;
        if let Some((sunrise, sunset)) = now.and_then(|t| result.sun_times(t.date())) {
            writeln!(
                f,
                "{} {}  {} {}",
                text.sunrise,
                clock(sunrise),
                text.sunset,
                clock(sunset)
            )?;
        }
        Ok(())
    }

    fn write_hours(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (result, locale, text) = (self.result, self.locale, labels(self.locale));

        writeln!(f, "\n{}", text.next_hours)?;
        for (i, hour) in result.windowed_hourly.iter().enumerate() {
            let when = if i == 0 { text.now.to_string() } else { clock(hour.time) };
            let icon = classify(hour.weather_code, locale).icon;
            writeln!(
                f,
                "{:<6} {:>4}°C  {:<28} {:>3}%  {:>4.1} mm  {:>2} m/s {}",
                when,
                hour.temperature,
                self.style.icon_name(icon, result.is_night(hour.time)),
                hour.precipitation_probability,
                hour.precipitation,
                hour.wind_speed,
                compass_sector(hour.wind_direction).label(locale)
            )?;
        }
        Ok(())
    }

    fn write_days(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (result, locale) = (self.result, self.locale);

        writeln!(f, "\n{}", labels(locale).days)?;
        let (range_min, range_max) = result.temperature_range().unwrap_or((0, 0));
        for (i, day) in result.daily.iter().enumerate() {
            writeln!(
                f,
                "{:<6} {:<24} {:>4}° / {:>3}°  {:>3}%  {}",
                day_name(i, day.date, locale),
                classify(day.weather_code, locale).label,
                day.temp_min,
                day.temp_max,
                day.precipitation_probability,
                temperature_sparkline(&result.temperature_blocks(day.date), range_min, range_max)
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for ForecastView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} ({})",
            self.result.location.display_name(),
            self.result.timezone.name()
        )?;
        self.write_current(f)?;
        self.write_hours(f)?;
        self.write_days(f)
    }
}

/// Numbered candidate list as a string
pub fn render_locations(locations: &[Location], locale: Locale) -> String {
    LocationList { locations, locale }.to_string()
}

/// Full forecast as a string
pub fn render_forecast(result: &ForecastResult, locale: Locale, style: IconStyle) -> String {
    ForecastView {
        result,
        locale,
        style,
    }
    .to_string()
}

fn clock(time: NaiveDateTime) -> String {
    time.format("%H:%M").to_string()
}

/// The first daily row is today; the rest are named by weekday
fn day_name(index: usize, date: NaiveDate, locale: Locale) -> &'static str {
    if index == 0 {
        labels(locale).today
    } else {
        weekday_name(date.weekday(), locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CurrentConditions, DailySample, HourlySample};

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").expect("Failed to parse time")
    }

    fn forecast() -> ForecastResult {
        let mut full_hourly = Vec::new();
        for date in ["2024-07-15", "2024-07-16"] {
            for h in 0..24 {
                full_hourly.push(HourlySample {
                    time: at(&format!("{}T{:02}:00", date, h)),
                    temperature: 10 + h / 2,
                    weather_code: if h < 12 { 0 } else { 61 },
                    humidity: 70,
                    uv_index: 0.0,
                    wind_speed: 3,
                    wind_gusts: 6,
                    wind_direction: 100.0,
                    cloud_cover: 20,
                    precipitation_probability: 15,
                    precipitation: 0.0,
                });
            }
        }
        let day = |date: &str, temp_min, temp_max| DailySample {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("Failed to parse date"),
            temp_max,
            temp_min,
            weather_code: 2,
            precipitation_probability: 30,
            precipitation_sum: 1.2,
            wind_speed_max: 7,
            uv_index_max: 5.5,
        };
        ForecastResult {
            location: Location::new("London", 51.5074, -0.1278).with_country("United Kingdom"),
            current: CurrentConditions {
                temperature: 12,
                feels_like: 11,
                humidity: 70,
                wind_speed: 3,
                wind_direction: 100.0,
                wind_gusts: 6,
                weather_code: 2,
                uv_index: 0.4,
                pressure: 1015,
                cloud_cover: 20,
                precipitation: 0.0,
                visibility: 10.0,
            },
            windowed_hourly: full_hourly[3..27].to_vec(),
            full_hourly,
            daily: vec![day("2024-07-15", 10, 21), day("2024-07-16", 10, 21)],
            sunrises: vec![at("2024-07-15T05:01"), at("2024-07-16T05:03")],
            sunsets: vec![at("2024-07-15T21:10"), at("2024-07-16T21:08")],
            timezone: chrono_tz::Europe::London,
            alignment_index: 3,
        }
    }

    #[test]
    fn test_temperature_to_block_minimum() {
        assert_eq!(temperature_to_block(-5, -5, 20), '▁');
    }

    #[test]
    fn test_temperature_to_block_maximum() {
        assert_eq!(temperature_to_block(20, -5, 20), '█');
    }

    #[test]
    fn test_temperature_to_block_outside_range_clamps() {
        assert_eq!(temperature_to_block(40, 0, 10), '█');
        assert_eq!(temperature_to_block(-40, 0, 10), '▁');
    }

    #[test]
    fn test_temperature_to_block_flat_range() {
        assert_eq!(temperature_to_block(7, 7, 7), '▁');
    }

    #[test]
    fn test_sparkline_one_block_per_value() {
        let line = temperature_sparkline(&[0, 5, 10], 0, 10);
        assert_eq!(line.chars().count(), 3);
        assert!(line.starts_with('▁'));
        assert!(line.ends_with('█'));
    }

    #[test]
    fn test_render_locations_numbered() {
        let locations = vec![
            Location::new("Paris", 48.8566, 2.3522)
                .with_country("France")
                .with_region("Île-de-France"),
            Location::new("Paris", 33.6609, -95.5555).with_country("United States"),
        ];
        let out = render_locations(&locations, Locale::English);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], " 1. Paris, Île-de-France, France (48.8566, 2.3522)");
        assert!(lines[1].starts_with(" 2. Paris, United States"));
    }

    #[test]
    fn test_render_locations_empty() {
        assert_eq!(render_locations(&[], Locale::Swedish), "Inga matchande platser\n");
    }

    #[test]
    fn test_render_forecast_sections() {
        let out = render_forecast(&forecast(), Locale::English, IconStyle::Lucide);

        assert!(out.starts_with("London, United Kingdom (Europe/London)\n"));
        assert!(out.contains("Partly cloudy [CloudSun]"));
        assert!(out.contains("Wind 3 m/s E (90°), gusts 6 m/s"));
        assert!(out.contains("Sunrise 05:01  Sunset 21:10"));
        assert!(out.contains("\nNow "));
        assert!(out.contains("\nToday "));
        assert!(out.contains("\nTue "));
    }

    #[test]
    fn test_render_forecast_hour_rows_match_window() {
        let result = forecast();
        let out = render_forecast(&result, Locale::English, IconStyle::Lucide);

        let section: Vec<&str> = out
            .split("Next 24 hours\n")
            .nth(1)
            .and_then(|rest| rest.split("\n\n").next())
            .expect("hourly section present")
            .lines()
            .collect();
        assert_eq!(section.len(), result.windowed_hourly.len());
        assert!(section[1].starts_with("04:00"));
    }

    #[test]
    fn test_render_forecast_night_icons_in_meteocons() {
        let out = render_forecast(&forecast(), Locale::English, IconStyle::Meteocons);

        // Current hour is 03:00, before sunrise
        assert!(out.contains("Partly cloudy [partly-cloudy-night]"));
        assert!(out.contains("clear-night"));
        assert!(out.contains("clear-day"));
    }

    #[test]
    fn test_first_day_is_today_when_window_is_clamped() {
        let mut result = forecast();
        // Alignment clamped to the final hour of the horizon
        result.alignment_index = result.full_hourly.len() - 1;
        result.windowed_hourly = result.full_hourly[result.alignment_index..].to_vec();
        result.daily[0].date = NaiveDate::from_ymd_opt(2024, 7, 14).expect("valid date");

        let out = render_forecast(&result, Locale::Swedish, IconStyle::Lucide);
        let days: Vec<&str> = out
            .split("14 dagar\n")
            .nth(1)
            .expect("daily section present")
            .lines()
            .collect();

        assert_eq!(days.len(), 2);
        assert!(days[0].starts_with("Idag "));
        assert!(days[1].starts_with("tis "));
    }

    #[test]
    fn test_render_forecast_swedish() {
        let out = render_forecast(&forecast(), Locale::Swedish, IconStyle::Lucide);

        assert!(out.contains("Halvklart"));
        assert!(out.contains("Vind 3 m/s Ö (90°)"));
        assert!(out.contains("\nNu "));
        assert!(out.contains("\nIdag "));
        assert!(out.contains("\ntis "));
    }
}
