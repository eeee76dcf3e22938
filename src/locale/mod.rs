//! Display languages and the process-wide language context.

pub mod dictionary;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BoundariesError, Result};
use crate::storage::{persist_language, LocalStore, ParentSettings};

pub use dictionary::{lookup, Dictionary, TextKey};

/// Supported display languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English.
    #[default]
    En,
    /// Bahasa Melayu.
    Ms,
    /// Simplified Chinese.
    Zh,
}

impl Locale {
    /// Every supported locale, in selector order.
    pub const ALL: [Locale; 3] = [Locale::En, Locale::Ms, Locale::Zh];

    /// The locale tag (`en`, `ms`, `zh`).
    pub fn tag(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ms => "ms",
            Self::Zh => "zh",
        }
    }

    /// The language's name in its own script, as shown on the selector.
    pub fn native_name(&self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Ms => "Bahasa Melayu",
            Self::Zh => "中文",
        }
    }

    /// The language's name in English.
    pub fn english_name(&self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Ms => "Malay",
            Self::Zh => "Chinese",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Locale {
    type Err = BoundariesError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Self::En),
            "ms" => Ok(Self::Ms),
            "zh" => Ok(Self::Zh),
            _ => Err(BoundariesError::unknown_locale(s)),
        }
    }
}

/// The active display language for a session.
///
/// Loaded from parent settings at startup. The language gate sets it once;
/// the settings screen may change it later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageContext {
    locale: Locale,
}

impl LanguageContext {
    /// Create a context with a fixed locale.
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    /// Load the persisted language, falling back to `default` when none has
    /// been chosen or the settings are unreadable.
    pub fn load<S: LocalStore + ?Sized>(store: &S, default: Locale) -> Self {
        let locale = ParentSettings::load(store).language.unwrap_or(default);
        Self { locale }
    }

    /// The active locale.
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Switch the in-memory locale without persisting.
    pub fn set(&mut self, locale: Locale) {
        self.locale = locale;
    }

    /// Change language from the settings surface: switch and persist.
    ///
    /// The in-memory switch always happens; a persistence failure is returned
    /// so the caller can tell the user the choice won't survive a restart.
    pub fn change<S: LocalStore + ?Sized>(&mut self, store: &S, locale: Locale) -> Result<()> {
        self.locale = locale;
        persist_language(store, locale)
    }

    /// The dictionary for the active locale.
    pub fn dictionary(&self) -> Dictionary {
        Dictionary::new(self.locale)
    }

    /// Look up one string in the active locale.
    pub fn text(&self, key: TextKey) -> &'static str {
        lookup(self.locale, key)
    }
}

impl Default for LanguageContext {
    fn default() -> Self {
        Self::new(Locale::default())
    }
}
