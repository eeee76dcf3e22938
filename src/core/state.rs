//! Onboarding state types.
//!
//! These types describe which gate is in front of the main app, the persisted
//! flags that decide it, and the trace of transitions within one session.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BoundariesError, Result};
use crate::locale::Locale;

/// The gating screen currently shown in front of the main app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActiveGate {
    /// Choose a display language.
    #[default]
    LanguageSelect,
    /// Ask for platform capabilities.
    PermissionRequest,
    /// Guided walkthrough over the main menu.
    Tutorial,
    /// No gate; the main app is visible.
    None,
}

impl ActiveGate {
    /// Whether onboarding is finished for this session.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Whether this gate replaces the main app entirely. The tutorial is an
    /// overlay on top of it.
    pub fn hides_main_app(&self) -> bool {
        matches!(self, Self::LanguageSelect | Self::PermissionRequest)
    }

    /// Stable name of the gate.
    pub fn name(&self) -> &'static str {
        match self {
            Self::LanguageSelect => "language_select",
            Self::PermissionRequest => "permission_request",
            Self::Tutorial => "tutorial",
            Self::None => "none",
        }
    }
}

impl fmt::Display for ActiveGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A persisted onboarding fact. Each flag guards one gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GateFlag {
    /// A language has been chosen.
    LanguageSetupComplete,
    /// The permission screen has been shown once, whatever the outcome.
    PermissionsShown,
    /// The tutorial has been finished or skipped.
    TutorialComplete,
}

impl GateFlag {
    /// Every flag, in gate priority order.
    pub const ALL: [GateFlag; 3] = [
        GateFlag::LanguageSetupComplete,
        GateFlag::PermissionsShown,
        GateFlag::TutorialComplete,
    ];

    /// The storage key.
    pub fn key(&self) -> &'static str {
        match self {
            Self::LanguageSetupComplete => "languageSetupComplete",
            Self::PermissionsShown => "permissionsShown",
            Self::TutorialComplete => "tutorialComplete",
        }
    }

    /// The gate this flag guards.
    pub fn gate(&self) -> ActiveGate {
        match self {
            Self::LanguageSetupComplete => ActiveGate::LanguageSelect,
            Self::PermissionsShown => ActiveGate::PermissionRequest,
            Self::TutorialComplete => ActiveGate::Tutorial,
        }
    }
}

impl FromStr for GateFlag {
    type Err = BoundariesError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace(['-', '_'], "");
        GateFlag::ALL
            .iter()
            .copied()
            .find(|f| f.key().to_lowercase() == normalized)
            .ok_or_else(|| {
                BoundariesError::config(format!(
                    "unknown flag '{}'. Valid flags: languageSetupComplete, permissionsShown, tutorialComplete",
                    s
                ))
            })
    }
}

/// Snapshot of the three persisted flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GateFlags {
    pub language_setup_complete: bool,
    pub permissions_shown: bool,
    pub tutorial_complete: bool,
}

impl GateFlags {
    /// Build from the three booleans, in priority order.
    pub fn new(
        language_setup_complete: bool,
        permissions_shown: bool,
        tutorial_complete: bool,
    ) -> Self {
        Self {
            language_setup_complete,
            permissions_shown,
            tutorial_complete,
        }
    }

    /// Value of one flag.
    pub fn get(&self, flag: GateFlag) -> bool {
        match flag {
            GateFlag::LanguageSetupComplete => self.language_setup_complete,
            GateFlag::PermissionsShown => self.permissions_shown,
            GateFlag::TutorialComplete => self.tutorial_complete,
        }
    }

    /// The first incomplete gate in priority order, or `None` when all are
    /// complete. A later flag never excuses an earlier one.
    pub fn initial_gate(&self) -> ActiveGate {
        GateFlag::ALL
            .iter()
            .find(|&&f| !self.get(f))
            .map(|f| f.gate())
            .unwrap_or(ActiveGate::None)
    }
}

/// How the user moved the tutorial along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TutorialAction {
    /// Go to the next step (or finish on the last one).
    Next,
    /// Finish immediately from any step.
    Skip,
}

/// Individual trace event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TraceEvent {
    /// Type of event.
    pub event_type: EventType,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// Optional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl TraceEvent {
    /// Create a new trace event.
    pub fn new(event_type: EventType, details: Option<String>) -> Self {
        Self {
            event_type,
            timestamp: Utc::now(),
            details,
        }
    }
}

/// Event type enum for trace events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// Flags read and the initial gate chosen.
    SessionStart,
    /// A language was chosen.
    LanguageSelected,
    /// The permission screen completed.
    PermissionsCompleted,
    /// Audio output resumed after an audio grant.
    AudioResumed,
    /// Audio output could not be resumed.
    AudioResumeFailed,
    /// The tutorial cursor moved.
    TutorialStep,
    /// The tutorial finished via its last step.
    TutorialCompleted,
    /// The tutorial was skipped.
    TutorialSkipped,
    /// A flag could not be written.
    FlagWriteFailed,
    /// The active gate changed.
    GateChanged,
}

/// Serializable view of the sequencer for output and debugging.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SequencerSnapshot {
    /// The active gate.
    pub gate: ActiveGate,
    /// Tutorial cursor, when the tutorial is active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_index: Option<usize>,
    /// Number of tutorial steps.
    pub step_count: usize,
    /// Flags as read at startup and written since.
    pub flags: GateFlags,
    /// Language chosen at the language gate this session, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chosen_locale: Option<Locale>,
}
