//! Latest-request-wins sessions for search and forecast loading
//!
//! Every request gets a ticket from a monotonically increasing generation
//! counter. A result is written to the shared state only while its ticket is
//! still the latest one issued, so a slow, stale response can never replace a
//! newer one. State is published through `tokio::sync::watch` channels: the
//! whole value is swapped at once and subscribers only ever see complete
//! states.
//!
//! Both sessions spawn tokio tasks and must be driven from inside a runtime.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::data::{ForecastClient, ForecastResult, GeocodingClient, Location};

/// Delay after the last keystroke before a search is sent
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Shorter queries clear the results instead of searching
pub const MIN_QUERY_CHARS: usize = 2;

/// Position of a request in issue order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Generation counter handing out tickets
#[derive(Debug, Default)]
pub struct Sequencer {
    latest: AtomicU64,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new ticket, invalidating every earlier one
    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether no newer ticket has been issued since `ticket`
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

/// What the forecast view should show
#[derive(Debug, Clone, Default)]
pub enum ForecastState {
    /// Nothing selected yet
    #[default]
    Idle,
    /// A fetch for this location is in flight
    Loading(Location),
    /// The forecast for the latest selected location
    Ready(Arc<ForecastResult>),
    /// The latest fetch failed; `message` is safe to show to users
    Failed { location: Location, message: String },
}

/// Loads forecasts for the selected location, keeping only the latest
pub struct ForecastSession {
    client: ForecastClient,
    sequencer: Arc<Sequencer>,
    state: Arc<watch::Sender<ForecastState>>,
}

impl ForecastSession {
    pub fn new(client: ForecastClient) -> Self {
        let (state, _) = watch::channel(ForecastState::Idle);
        Self {
            client,
            sequencer: Arc::new(Sequencer::new()),
            state: Arc::new(state),
        }
    }

    /// Receiver notified on every committed state change
    pub fn subscribe(&self) -> watch::Receiver<ForecastState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state
    pub fn state(&self) -> ForecastState {
        self.state.borrow().clone()
    }

    /// Start loading the forecast for `location`
    ///
    /// Any fetch still in flight for an earlier selection is left to finish,
    /// but its result is discarded on arrival.
    pub fn select_location(&self, location: Location) -> JoinHandle<()> {
        let mut ticket = Ticket(0);
        self.state.send_modify(|state| {
            ticket = self.sequencer.issue();
            *state = ForecastState::Loading(location.clone());
        });

        let client = self.client.clone();
        let sequencer = Arc::clone(&self.sequencer);
        let state = Arc::clone(&self.state);

        tokio::spawn(async move {
            let next = match client.fetch_forecast(&location).await {
                Ok(result) => ForecastState::Ready(Arc::new(result)),
                Err(e) => {
                    tracing::warn!(location = %location.display_name(), error = %e, "forecast fetch failed");
                    ForecastState::Failed {
                        message: e.user_message().to_string(),
                        location,
                    }
                }
            };

            // Check and write under the channel lock so a newer selection
            // cannot slip in between
            let committed = state.send_if_modified(|current| {
                if !sequencer.is_current(ticket) {
                    return false;
                }
                *current = next;
                true
            });
            if committed {
                tracing::info!(?ticket, "forecast state committed");
            } else {
                tracing::debug!(?ticket, "discarding stale forecast");
            }
        })
    }
}

/// What the search box should show
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    /// Latest text typed
    pub query: String,
    /// Candidates for the last settled query
    pub results: Vec<Location>,
    /// A search for `query` is pending or in flight
    pub searching: bool,
}

/// Debounced search-as-you-type
pub struct SearchSession {
    client: GeocodingClient,
    debounce: Duration,
    sequencer: Arc<Sequencer>,
    pending: Mutex<Option<JoinHandle<()>>>,
    state: Arc<watch::Sender<SearchState>>,
}

impl SearchSession {
    pub fn new(client: GeocodingClient) -> Self {
        Self::with_debounce(client, DEFAULT_DEBOUNCE)
    }

    pub fn with_debounce(client: GeocodingClient, debounce: Duration) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            client,
            debounce,
            sequencer: Arc::new(Sequencer::new()),
            pending: Mutex::new(None),
            state: Arc::new(state),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// Handle a change of the search text
    ///
    /// Cancels the pending search. Queries shorter than [`MIN_QUERY_CHARS`]
    /// clear the results right away; longer ones are sent once the text has
    /// been stable for the debounce delay.
    pub fn input(&self, query: &str) {
        if let Some(previous) = self.replace_pending(None) {
            previous.abort();
        }

        let query = query.to_string();
        let searchable = query.trim().chars().count() >= MIN_QUERY_CHARS;
        let mut ticket = Ticket(0);
        self.state.send_modify(|state| {
            ticket = self.sequencer.issue();
            state.query = query.clone();
            state.searching = searchable;
            if !searchable {
                state.results.clear();
            }
        });
        if !searchable {
            return;
        }

        let client = self.client.clone();
        let debounce = self.debounce;
        let sequencer = Arc::clone(&self.sequencer);
        let state = Arc::clone(&self.state);

        let handle = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if !sequencer.is_current(ticket) {
                return;
            }

            let outcome = client.search(&query).await;
            state.send_if_modified(|current| {
                if !sequencer.is_current(ticket) {
                    tracing::debug!(query = %query, "discarding stale search results");
                    return false;
                }
                current.searching = false;
                match outcome {
                    Ok(results) => current.results = results,
                    // Keep showing the previous candidates
                    Err(e) => tracing::warn!(query = %query, error = %e, "search failed"),
                }
                true
            });
        });
        self.replace_pending(Some(handle));
    }

    /// Drop the query and results, e.g. after a location was picked
    pub fn clear(&self) {
        if let Some(previous) = self.replace_pending(None) {
            previous.abort();
        }
        self.state.send_modify(|state| {
            self.sequencer.issue();
            *state = SearchState::default();
        });
    }

    /// Wait for the pending search, if any, to finish or be cancelled
    pub async fn settle(&self) {
        if let Some(handle) = self.replace_pending(None) {
            // A cancelled task is as settled as a finished one
            let _ = handle.await;
        }
    }

    fn replace_pending(&self, handle: Option<JoinHandle<()>>) -> Option<JoinHandle<()>> {
        let mut pending = match self.pending.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        std::mem::replace(&mut *pending, handle)
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        if let Some(handle) = self.replace_pending(None) {
            handle.abort();
        }
    }
}
