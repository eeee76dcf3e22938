//! Event input types.

use serde::{Deserialize, Serialize};

use crate::error::{BoundariesError, Result};
use crate::locale::Locale;

/// One user or host event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// A language was picked on the language gate.
    SelectLanguage { locale: Locale },
    /// Ask the platform for capabilities, then leave the permission gate.
    RequestPermissions,
    /// Leave the permission gate without asking.
    SkipPermissions,
    /// Tutorial "next".
    TutorialNext,
    /// Tutorial "skip".
    TutorialSkip,
    /// Show another screen.
    Navigate { screen: String },
    /// Go back one screen.
    Back,
    /// Change language from parent settings.
    ChangeLanguage { locale: Locale },
    /// Report the current state.
    Status,
}

impl Event {
    /// Event name as it appears on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SelectLanguage { .. } => "select_language",
            Self::RequestPermissions => "request_permissions",
            Self::SkipPermissions => "skip_permissions",
            Self::TutorialNext => "tutorial_next",
            Self::TutorialSkip => "tutorial_skip",
            Self::Navigate { .. } => "navigate",
            Self::Back => "back",
            Self::ChangeLanguage { .. } => "change_language",
            Self::Status => "status",
        }
    }
}

/// Parse one event line.
pub fn parse_event(line: &str) -> Result<Event> {
    serde_json::from_str(line)
        .map_err(|e| BoundariesError::serde(format!("Failed to parse event: {}", e)))
}
