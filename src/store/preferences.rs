//! Icon style preference

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::data::IconKey;

use super::KeyValueStore;

/// Storage key for the icon style
pub const ICON_STYLE_KEY: &str = "himla-icon-style";

/// Which icon set conditions are drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconStyle {
    /// Line icons, one per condition
    #[default]
    Lucide,
    /// Filled icons with day and night variants
    Meteocons,
}

impl IconStyle {
    /// Stored and displayed name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lucide => "lucide",
            Self::Meteocons => "meteocons",
        }
    }

    /// The other style
    pub fn toggled(self) -> Self {
        match self {
            Self::Lucide => Self::Meteocons,
            Self::Meteocons => Self::Lucide,
        }
    }

    /// Icon identifier for a condition in this style
    pub fn icon_name(self, icon: IconKey, is_night: bool) -> &'static str {
        match self {
            Self::Lucide => icon.name(),
            Self::Meteocons => icon.meteocon(is_night),
        }
    }
}

impl FromStr for IconStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lucide" => Ok(Self::Lucide),
            "meteocons" => Ok(Self::Meteocons),
            other => Err(format!("unknown icon style '{}' (expected lucide or meteocons)", other)),
        }
    }
}

/// Persisted icon style
pub struct IconPreference<S> {
    store: S,
}

impl<S: KeyValueStore> IconPreference<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Saved style; anything unreadable counts as the default
    pub fn get(&self) -> IconStyle {
        self.store
            .get(ICON_STYLE_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    pub fn set(&self, style: IconStyle) -> std::io::Result<()> {
        let json = serde_json::to_string(&style)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        self.store.set(ICON_STYLE_KEY, &json)
    }

    /// Flip the saved style and return the new one
    pub fn toggle(&self) -> std::io::Result<IconStyle> {
        let style = self.get().toggled();
        self.set(style)?;
        Ok(style)
    }
}
