//! Most-recently selected locations

use crate::data::Location;

use super::KeyValueStore;

/// Storage key for the recent-locations list
pub const RECENT_LOCATIONS_KEY: &str = "himla-recent-locations";

/// Number of locations remembered
pub const MAX_RECENT: usize = 5;

/// Newest-first list of selected locations, deduplicated by coordinates
pub struct RecentLocations<S> {
    store: S,
}

impl<S: KeyValueStore> RecentLocations<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Stored locations, newest first
    ///
    /// Missing or unreadable data reads as an empty list.
    pub fn list(&self) -> Vec<Location> {
        let Some(raw) = self.store.get(RECENT_LOCATIONS_KEY) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(locations) => locations,
            Err(e) => {
                tracing::warn!("Ignoring unreadable recent locations: {}", e);
                Vec::new()
            }
        }
    }

    /// Most recently selected location
    pub fn latest(&self) -> Option<Location> {
        self.list().into_iter().next()
    }

    /// Move `location` to the front, dropping any older entry at the same
    /// coordinates and anything beyond [`MAX_RECENT`]
    pub fn remember(&self, location: &Location) -> std::io::Result<Vec<Location>> {
        let mut locations = self.list();
        locations.retain(|l| l != location);
        locations.insert(0, location.clone());
        locations.truncate(MAX_RECENT);

        let json = serde_json::to_string(&locations)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        self.store.set(RECENT_LOCATIONS_KEY, &json)?;
        Ok(locations)
    }
}
