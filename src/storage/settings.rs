//! Parent settings blob.
//!
//! Stored as JSON under the `parentSettings` key. The onboarding flow only
//! touches `language`; everything else belongs to the settings screen and is
//! carried through untouched.

use serde::{Deserialize, Serialize};

use crate::error::{FailOpen, Result};
use crate::locale::Locale;
use crate::storage::LocalStore;

/// Storage key for the settings blob.
pub const SETTINGS_KEY: &str = "parentSettings";

/// Settings managed from the parent settings screen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParentSettings {
    /// Display language, if one has been chosen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Locale>,
    /// Whether game sounds play.
    #[serde(default = "default_sound_enabled")]
    pub sound_enabled: bool,
    /// Fields written by other parts of the app.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn default_sound_enabled() -> bool {
    true
}

impl Default for ParentSettings {
    fn default() -> Self {
        Self {
            language: None,
            sound_enabled: true,
            extra: serde_json::Map::new(),
        }
    }
}

impl ParentSettings {
    /// Load settings, surfacing storage and parse errors.
    pub fn try_load<S: LocalStore + ?Sized>(store: &S) -> Result<Self> {
        match store.get(SETTINGS_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Self::default()),
        }
    }

    /// Load settings. Unreadable or malformed settings become defaults.
    pub fn load<S: LocalStore + ?Sized>(store: &S) -> Self {
        Self::try_load(store).fail_open_default("loading parent settings")
    }

    /// Persist settings.
    pub fn save<S: LocalStore + ?Sized>(&self, store: &S) -> Result<()> {
        let json = serde_json::to_string(self)?;
        store.set(SETTINGS_KEY, &json)
    }
}

/// Merge a language choice into the stored settings, keeping every other
/// field. Malformed settings are replaced by defaults carrying the language.
pub fn persist_language<S: LocalStore + ?Sized>(store: &S, locale: Locale) -> Result<()> {
    let mut settings = ParentSettings::load(store);
    settings.language = Some(locale);
    settings.save(store)
}
