//! Himla - weather forecasts from Open-Meteo in your terminal
//!
//! Searches places, prints 14-day forecasts and remembers the places viewed.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use himla::cli::{parse_icon_style_arg, pick_index, Cli, Command};
use himla::config::Config;
use himla::data::Location;
use himla::render::{render_forecast, render_locations};
use himla::session::{ForecastSession, ForecastState, SearchSession, MIN_QUERY_CHARS};
use himla::store::{IconPreference, KeyValueStore, MemoryStore, RecentLocations};

/// Shown when nothing was asked for and nothing was viewed before
fn default_location() -> Location {
    Location::new("London", 51.5074, -0.1278).with_country("United Kingdom")
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_cli(&cli)?;

    let store: Box<dyn KeyValueStore> = match config.store() {
        Some(store) => Box::new(store),
        None => {
            tracing::warn!("No data directory available, preferences will not be saved");
            Box::new(MemoryStore::new())
        }
    };

    let command = cli.command.clone().unwrap_or(Command::Forecast {
        query: None,
        lat: None,
        lon: None,
        pick: 1,
    });

    match command {
        Command::Search { query } => {
            let results = config
                .geocoding_client()
                .search(&query)
                .await
                .map_err(|e| {
                    tracing::warn!(error = %e, "search failed");
                    anyhow!(e.user_message())
                })?;
            print!("{}", render_locations(&results, config.locale));
        }
        Command::Forecast {
            query,
            lat,
            lon,
            pick,
        } => {
            let recent = RecentLocations::new(&*store);
            let location = match (query, lat, lon) {
                (Some(query), _, _) => search_and_pick(&config, &query, pick).await?,
                (None, Some(lat), Some(lon)) => {
                    Location::new(format!("{:.4}, {:.4}", lat, lon), lat, lon)
                }
                _ => recent.latest().unwrap_or_else(default_location),
            };

            let result = config
                .forecast_client()
                .fetch_forecast(&location)
                .await
                .map_err(|e| {
                    tracing::warn!(location = %location.display_name(), error = %e, "forecast fetch failed");
                    anyhow!(e.user_message())
                })?;

            if let Err(e) = recent.remember(&location) {
                tracing::warn!(error = %e, "could not save recent location");
            }
            let style = IconPreference::new(&*store).get();
            print!("{}", render_forecast(&result, config.locale, style));
        }
        Command::Recent => {
            let locations = RecentLocations::new(&*store).list();
            if locations.is_empty() {
                println!("No recent locations");
            } else {
                print!("{}", render_locations(&locations, config.locale));
            }
        }
        Command::Icons { style, toggle } => {
            let preference = IconPreference::new(&*store);
            let style = if toggle {
                preference.toggle().context("Failed to save icon style")?
            } else if let Some(style) = style {
                let style = parse_icon_style_arg(&style)?;
                preference.set(style).context("Failed to save icon style")?;
                style
            } else {
                preference.get()
            };
            println!("{}", style.as_str());
        }
        Command::Interactive => run_interactive(&config, &*store).await?,
    }

    Ok(())
}

/// Geocode `query` and take the `pick`-th candidate (1-based)
async fn search_and_pick(config: &Config, query: &str, pick: usize) -> Result<Location> {
    let mut results = config.geocoding_client().search(query).await.map_err(|e| {
        tracing::warn!(error = %e, "search failed");
        anyhow!(e.user_message())
    })?;
    if results.is_empty() {
        return Err(anyhow!("No places match '{}'", query));
    }
    let index = pick_index(pick, results.len())?;
    Ok(results.swap_remove(index))
}

/// Line-driven search-as-you-type session
///
/// Each line replaces the search text. A number loads that candidate, `:q`
/// quits. Output is printed whenever either session commits a new state.
async fn run_interactive(config: &Config, store: &dyn KeyValueStore) -> Result<()> {
    let search = SearchSession::with_debounce(config.geocoding_client(), config.debounce);
    let forecast = ForecastSession::new(config.forecast_client());
    let mut search_rx = search.subscribe();
    let mut forecast_rx = forecast.subscribe();

    let recent = RecentLocations::new(store);
    let style = IconPreference::new(store).get();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Type a place name, a result number to load it, or :q to quit");
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    break;
                };
                let line = line.trim();
                if line == ":q" {
                    break;
                }
                if let Ok(pick) = line.parse::<usize>() {
                    let results = search.state().results;
                    match pick_index(pick, results.len()) {
                        Ok(index) => {
                            let location = results[index].clone();
                            if let Err(e) = recent.remember(&location) {
                                tracing::warn!(error = %e, "could not save recent location");
                            }
                            search.clear();
                            forecast.select_location(location);
                        }
                        Err(e) => eprintln!("{}", e),
                    }
                } else {
                    search.input(line);
                }
            }
            Ok(()) = search_rx.changed() => {
                let state = search_rx.borrow_and_update().clone();
                if !state.searching && state.query.trim().chars().count() >= MIN_QUERY_CHARS {
                    print!("{}", render_locations(&state.results, config.locale));
                }
            }
            Ok(()) = forecast_rx.changed() => {
                let state = forecast_rx.borrow_and_update().clone();
                match state {
                    ForecastState::Idle => {}
                    ForecastState::Loading(location) => {
                        println!("Loading {}...", location.display_name());
                    }
                    ForecastState::Ready(result) => {
                        print!("{}", render_forecast(&result, config.locale, style));
                    }
                    ForecastState::Failed { location, message } => {
                        eprintln!("{}: {}", location.display_name(), message);
                    }
                }
            }
        }
    }

    Ok(())
}
