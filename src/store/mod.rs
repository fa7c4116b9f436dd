//! Key-value storage for user preferences
//!
//! Collaborators that remember things between runs (recent locations, icon
//! style) receive a [`KeyValueStore`] instead of reaching for global state. The
//! forecast and geocoding core never touch a store.

mod file;
mod preferences;
mod recent;

pub use file::{FileStore, MemoryStore};
pub use preferences::{IconPreference, IconStyle};
pub use recent::{RecentLocations, MAX_RECENT};

/// String values addressed by string keys
pub trait KeyValueStore: Send + Sync {
    /// Stored value for `key`, `None` if absent or unreadable
    fn get(&self, key: &str) -> Option<String>;

    /// Replace the value for `key`
    fn set(&self, key: &str, value: &str) -> std::io::Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> std::io::Result<()> {
        (**self).set(key, value)
    }
}
