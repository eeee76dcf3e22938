//! Boundaries - first-run onboarding for the boundaries and safety app
//!
//! Sequences the gates a new device walks through before the main app:
//! language selection, a one-time permission request, and a guided
//! tutorial. Progress is kept in a small key-value store so each gate is
//! shown once.

pub mod capability;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod events;
pub mod locale;
pub mod router;
pub mod storage;
pub mod util;

pub use capability::{
    AudioOutput, Capability, CapabilityReport, CapabilityRequester, PermissionOutcome,
    PermissionStatus, PresetRequester,
};
pub use config::Config;
pub use core::{ActiveGate, GateFlag, GateFlags, Sequencer, TutorialAction, TutorialStep};
pub use error::{BoundariesError, Result};
pub use events::{Event, EventOutput, EventRunner};
pub use locale::{Dictionary, LanguageContext, Locale, TextKey};
pub use router::ScreenRouter;
pub use storage::{FileStore, LocalStore, MemoryStore, ParentSettings};

// CLI commands
pub use cli::{LanguageCommand, ResetCommand, StatusCommand, StringsCommand};
