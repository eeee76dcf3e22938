//! Platform capability requests.
//!
//! The app asks for four capabilities at once. Each comes back granted,
//! denied or errored; the onboarding flow only cares whether audio was
//! granted; the per-capability detail is display-only.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::PermissionsConfig;
use crate::error::Result;
use crate::locale::TextKey;

/// A platform capability the app asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Sound output.
    Audio,
    /// Voice input.
    Microphone,
    /// Camera access.
    Camera,
    /// System notifications.
    Notifications,
}

impl Capability {
    /// Every capability, in request order.
    pub const ALL: [Capability; 4] = [
        Capability::Audio,
        Capability::Microphone,
        Capability::Camera,
        Capability::Notifications,
    ];

    /// The capability's stable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Microphone => "microphone",
            Self::Camera => "camera",
            Self::Notifications => "notifications",
        }
    }

    /// The display label key.
    pub fn label_key(&self) -> TextKey {
        match self {
            Self::Audio => TextKey::PermAudio,
            Self::Microphone => TextKey::PermMic,
            Self::Camera => TextKey::PermCamera,
            Self::Notifications => TextKey::PermNotifications,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The result of asking for one capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum PermissionOutcome {
    /// The user or platform allowed it.
    Granted,
    /// The user or platform refused it.
    Denied,
    /// The request itself failed (unsupported, no device, platform error).
    Error(String),
}

impl PermissionOutcome {
    /// Whether this outcome is a grant.
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Display state of one capability, including before any request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum PermissionStatus {
    /// Not requested yet.
    #[default]
    Pending,
    /// Granted.
    Granted,
    /// Denied.
    Denied,
    /// Request failed.
    Error(String),
}

impl PermissionStatus {
    /// Whether this status is a grant.
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }

    /// The display label key. Errors with a platform message show the message
    /// instead; see [`PermissionStatus::message`].
    pub fn label_key(&self) -> TextKey {
        match self {
            Self::Pending => TextKey::StatusPending,
            Self::Granted => TextKey::StatusGranted,
            Self::Denied => TextKey::StatusDenied,
            Self::Error(_) => TextKey::StatusError,
        }
    }

    /// The platform error message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Error(m) if !m.is_empty() => Some(m),
            _ => None,
        }
    }
}

impl From<PermissionOutcome> for PermissionStatus {
    fn from(outcome: PermissionOutcome) -> Self {
        match outcome {
            PermissionOutcome::Granted => Self::Granted,
            PermissionOutcome::Denied => Self::Denied,
            PermissionOutcome::Error(m) => Self::Error(m),
        }
    }
}

/// Per-capability statuses from one request round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CapabilityReport {
    statuses: BTreeMap<Capability, PermissionStatus>,
}

impl CapabilityReport {
    /// A report with every capability pending.
    pub fn pending() -> Self {
        Self::default()
    }

    /// The report delivered when the user skips the permission screen
    /// without requesting anything.
    pub fn skipped() -> Self {
        Self::pending()
    }

    /// Record an outcome.
    pub fn with_outcome(mut self, capability: Capability, outcome: PermissionOutcome) -> Self {
        self.record(capability, outcome);
        self
    }

    /// Record an outcome in place.
    pub fn record(&mut self, capability: Capability, outcome: PermissionOutcome) {
        self.statuses.insert(capability, outcome.into());
    }

    /// Status of one capability (pending if never recorded).
    pub fn status(&self, capability: Capability) -> PermissionStatus {
        self.statuses.get(&capability).cloned().unwrap_or_default()
    }

    /// All four statuses in request order.
    pub fn statuses(&self) -> Vec<(Capability, PermissionStatus)> {
        Capability::ALL
            .iter()
            .map(|&c| (c, self.status(c)))
            .collect()
    }

    /// Whether audio was granted. This is the only signal onboarding uses.
    pub fn audio_granted(&self) -> bool {
        self.status(Capability::Audio).is_granted()
    }

    /// Whether any capability was granted.
    pub fn any_granted(&self) -> bool {
        self.statuses.values().any(PermissionStatus::is_granted)
    }

    /// Whether every capability was granted.
    pub fn all_granted(&self) -> bool {
        Capability::ALL.iter().all(|&c| self.status(c).is_granted())
    }
}

/// Performs platform permission requests.
///
/// Implementations ask for all four capabilities and report each one. A
/// failed request for one capability is reported as its `Error` outcome; the
/// call as a whole only fails when nothing could be asked at all.
pub trait CapabilityRequester {
    /// Ask for every capability.
    fn request_all(&self) -> Result<CapabilityReport>;
}

/// Requester that answers from configuration.
///
/// Stands in for the platform on headless runs and in tests.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PresetRequester {
    outcomes: BTreeMap<Capability, PermissionOutcome>,
}

impl PresetRequester {
    /// A requester that denies everything unless told otherwise.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the `[permissions]` config section.
    pub fn from_config(config: &PermissionsConfig) -> Self {
        let mut requester = Self::new();
        for capability in Capability::ALL {
            requester
                .outcomes
                .insert(capability, config.outcome_for(capability));
        }
        requester
    }

    /// Set the outcome for one capability.
    pub fn with(mut self, capability: Capability, outcome: PermissionOutcome) -> Self {
        self.outcomes.insert(capability, outcome);
        self
    }
}

impl CapabilityRequester for PresetRequester {
    fn request_all(&self) -> Result<CapabilityReport> {
        let mut report = CapabilityReport::pending();
        for capability in Capability::ALL {
            let outcome = self
                .outcomes
                .get(&capability)
                .cloned()
                .unwrap_or(PermissionOutcome::Denied);
            report.record(capability, outcome);
        }
        Ok(report)
    }
}

/// The app's sound output, which platforms start suspended until the user
/// grants audio.
pub trait AudioOutput {
    /// Resume output if it is suspended.
    fn resume(&self) -> Result<()>;
}

/// Audio output that has nothing to resume.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAudioOutput;

impl AudioOutput for NoopAudioOutput {
    fn resume(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_defaults_to_pending() {
        let report = CapabilityReport::pending();
        for (_, status) in report.statuses() {
            assert_eq!(status, PermissionStatus::Pending);
        }
        assert!(!report.audio_granted());
        assert!(!report.any_granted());
        assert!(!report.all_granted());
    }

    #[test]
    fn test_audio_granted_only_looks_at_audio() {
        let report = CapabilityReport::pending()
            .with_outcome(Capability::Camera, PermissionOutcome::Granted)
            .with_outcome(Capability::Audio, PermissionOutcome::Denied);

        assert!(!report.audio_granted());
        assert!(report.any_granted());
    }

    #[test]
    fn test_all_granted() {
        let mut report = CapabilityReport::pending();
        for c in Capability::ALL {
            report.record(c, PermissionOutcome::Granted);
        }
        assert!(report.all_granted());
        assert!(report.audio_granted());
    }

    #[test]
    fn test_statuses_in_request_order() {
        let names: Vec<_> = CapabilityReport::pending()
            .statuses()
            .into_iter()
            .map(|(c, _)| c.name())
            .collect();
        assert_eq!(names, vec!["audio", "microphone", "camera", "notifications"]);
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(PermissionStatus::Pending.label_key(), TextKey::StatusPending);
        let err = PermissionStatus::Error("blocked by policy".into());
        assert_eq!(err.label_key(), TextKey::StatusError);
        assert_eq!(err.message(), Some("blocked by policy"));
        assert_eq!(PermissionStatus::Error(String::new()).message(), None);
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_value(PermissionOutcome::Error("nope".into())).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "nope");

        let json = serde_json::to_value(PermissionStatus::Granted).unwrap();
        assert_eq!(json["status"], "granted");
    }

    #[test]
    fn test_preset_requester_defaults_to_denied() {
        let report = PresetRequester::new().request_all().unwrap();
        for (_, status) in report.statuses() {
            assert_eq!(status, PermissionStatus::Denied);
        }
    }

    #[test]
    fn test_preset_requester_uses_overrides() {
        let report = PresetRequester::new()
            .with(Capability::Audio, PermissionOutcome::Granted)
            .with(
                Capability::Camera,
                PermissionOutcome::Error("no device".into()),
            )
            .request_all()
            .unwrap();

        assert!(report.audio_granted());
        assert_eq!(
            report.status(Capability::Camera),
            PermissionStatus::Error("no device".into())
        );
        assert_eq!(report.status(Capability::Microphone), PermissionStatus::Denied);
    }

    #[test]
    fn test_preset_requester_from_default_config() {
        let report = PresetRequester::from_config(&PermissionsConfig::default())
            .request_all()
            .unwrap();
        assert!(report.audio_granted());
        assert_eq!(report.status(Capability::Camera), PermissionStatus::Denied);
    }

    #[test]
    fn test_capability_labels() {
        assert_eq!(Capability::Microphone.label_key(), TextKey::PermMic);
        assert_eq!(Capability::Notifications.to_string(), "notifications");
    }
}
