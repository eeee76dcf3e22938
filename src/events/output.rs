//! Event output types.
//!
//! Every event gets one `EventOutput` line back describing what the host
//! should draw.

use serde::{Deserialize, Serialize};

use crate::capability::{Capability, CapabilityReport, PermissionStatus};
use crate::core::state::ActiveGate;
use crate::core::tutorial::{ArrowDirection, StepPosition, TutorialStep};
use crate::error::{BoundariesError, Result};
use crate::locale::{lookup, Locale, TextKey};

/// A tutorial card ready to draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepView {
    /// Position in the step table.
    pub index: usize,
    /// Number of steps in the table.
    pub step_count: usize,
    /// Whether this is the final card.
    pub is_last: bool,
    /// Step identifier.
    pub id: String,
    /// Localized title.
    pub title: String,
    /// Localized description.
    pub description: String,
    pub position: StepPosition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrow: Option<ArrowDirection>,
    /// "Next", or "Let's Go!" on the final card.
    pub next_label: String,
    pub skip_label: String,
}

impl StepView {
    /// Localize a step for display.
    pub fn new(index: usize, step_count: usize, step: &TutorialStep, locale: Locale) -> Self {
        let is_last = index + 1 >= step_count;
        let next_key = if is_last {
            TextKey::TutorialLetsGo
        } else {
            TextKey::TutorialNext
        };
        Self {
            index,
            step_count,
            is_last,
            id: step.id.clone(),
            title: step.title_text(locale).to_string(),
            description: step.description_text(locale).to_string(),
            position: step.position,
            arrow: step.arrow,
            next_label: lookup(locale, next_key).to_string(),
            skip_label: lookup(locale, TextKey::TutorialSkip).to_string(),
        }
    }
}

/// One capability row on the permission screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRow {
    pub capability: Capability,
    /// Localized capability name.
    pub label: String,
    pub status: PermissionStatus,
    /// Localized status, or the platform message for a failed request.
    pub status_label: String,
}

/// The permission screen ready to draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionScreenView {
    pub title: String,
    pub description: String,
    pub rows: Vec<PermissionRow>,
    pub all_granted: bool,
    pub any_granted: bool,
    /// Main button. Reads "All Permissions Granted!" once nothing is left to ask.
    pub request_label: String,
    /// Secondary button. "Continue" once anything is granted, else "Skip for Now".
    pub continue_label: String,
}

impl PermissionScreenView {
    /// Localize a report for display.
    pub fn new(report: &CapabilityReport, locale: Locale) -> Self {
        let rows = report
            .statuses()
            .into_iter()
            .map(|(capability, status)| {
                let status_label = match status.message() {
                    Some(message) => message.to_string(),
                    None => lookup(locale, status.label_key()).to_string(),
                };
                PermissionRow {
                    capability,
                    label: lookup(locale, capability.label_key()).to_string(),
                    status,
                    status_label,
                }
            })
            .collect();

        let all_granted = report.all_granted();
        let any_granted = report.any_granted();
        let request_key = if all_granted {
            TextKey::PermissionsGranted
        } else {
            TextKey::RequestPermissions
        };
        let continue_key = if any_granted {
            TextKey::Continue
        } else {
            TextKey::SkipForNow
        };

        Self {
            title: lookup(locale, TextKey::EnableFeatures).to_string(),
            description: lookup(locale, TextKey::PermissionDesc).to_string(),
            rows,
            all_granted,
            any_granted,
            request_label: lookup(locale, request_key).to_string(),
            continue_label: lookup(locale, continue_key).to_string(),
        }
    }
}

/// State after handling one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventOutput {
    /// The gate in front of the main app.
    pub gate: ActiveGate,
    /// The screen the router shows behind any gate.
    pub screen: String,
    /// The active display language.
    pub locale: Locale,
    /// Tutorial card to draw over the current screen.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<StepView>,
    /// The permission screen, while that gate is shown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission_screen: Option<PermissionScreenView>,
    /// Statuses from the last permission request this session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<CapabilityReport>,
    /// Why the event was rejected, if it was.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EventOutput {
    /// Whether the event was rejected.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Serialize output to a single JSON line.
pub fn to_json<T: Serialize>(output: &T) -> Result<String> {
    serde_json::to_string(output)
        .map_err(|e| BoundariesError::serde(format!("Failed to serialize output: {}", e)))
}
