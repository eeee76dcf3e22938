//! Status command.
//!
//! Shows the stored onboarding flags, the gate a fresh session would open
//! on, and the display language.

use serde::Serialize;

use crate::config::Config;
use crate::core::sequencer::initial_gate;
use crate::core::state::{ActiveGate, GateFlag, GateFlags};
use crate::locale::{LanguageContext, Locale};
use crate::storage::{read_flags, LocalStore, ParentSettings};

/// Options for the status command.
#[derive(Debug, Clone, Default)]
pub struct StatusOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the status command.
#[derive(Debug, Clone, Serialize)]
pub struct StatusOutput {
    /// Stored flags.
    pub flags: GateFlags,
    /// Gate a fresh session would open on.
    pub gate: ActiveGate,
    /// Display language.
    pub locale: Locale,
    /// Whether a language has been stored, as opposed to the default.
    pub locale_stored: bool,
    /// Parent sound setting.
    pub sound_enabled: bool,
    /// Set when the store could not be read; flags then show as unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_error: Option<String>,
}

/// The status command implementation.
pub struct StatusCommand<S: LocalStore> {
    store: S,
    config: Config,
}

impl<S: LocalStore> StatusCommand<S> {
    /// Create a new status command.
    pub fn new(store: S, config: Config) -> Self {
        Self { store, config }
    }

    /// Run the status command.
    pub fn run(&self, _options: &StatusOptions) -> StatusOutput {
        let storage_error = self.store.keys().err().map(|e| e.to_string());
        let settings = ParentSettings::load(&self.store);
        let language = LanguageContext::load(&self.store, self.config.locale.default);

        StatusOutput {
            flags: read_flags(&self.store),
            gate: initial_gate(&self.store),
            locale: language.locale(),
            locale_stored: settings.language.is_some(),
            sound_enabled: settings.sound_enabled,
            storage_error,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &StatusOutput, options: &StatusOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    fn format_human_readable(&self, output: &StatusOutput) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Next gate: {}", output.gate));
        let source = if output.locale_stored { "" } else { " (default)" };
        lines.push(format!(
            "Language:  {} {}{}",
            output.locale,
            output.locale.native_name(),
            source
        ));
        lines.push(format!(
            "Sound:     {}",
            if output.sound_enabled { "on" } else { "off" }
        ));
        lines.push(String::new());
        lines.push("Flags:".to_string());
        for flag in GateFlag::ALL {
            let mark = if output.flags.get(flag) { "x" } else { " " };
            lines.push(format!("  [{}] {}", mark, flag.key()));
        }

        if let Some(ref error) = output.storage_error {
            lines.push(String::new());
            lines.push(format!("Warning: storage unreadable: {}", error));
        }

        lines.push(String::new());
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::traits::tests::UnavailableStore;
    use crate::storage::{persist_language, write_flag, MemoryStore};

    #[test]
    fn test_status_fresh_store() {
        let cmd = StatusCommand::new(MemoryStore::new(), Config::default());
        let output = cmd.run(&StatusOptions::default());

        assert_eq!(output.gate, ActiveGate::LanguageSelect);
        assert_eq!(output.flags, GateFlags::default());
        assert_eq!(output.locale, Locale::En);
        assert!(!output.locale_stored);
        assert!(output.sound_enabled);
        assert!(output.storage_error.is_none());
    }

    #[test]
    fn test_status_after_language() {
        let store = MemoryStore::new();
        write_flag(&store, GateFlag::LanguageSetupComplete);
        persist_language(&store, Locale::Ms).unwrap();

        let cmd = StatusCommand::new(store, Config::default());
        let output = cmd.run(&StatusOptions::default());

        assert_eq!(output.gate, ActiveGate::PermissionRequest);
        assert_eq!(output.locale, Locale::Ms);
        assert!(output.locale_stored);
    }

    #[test]
    fn test_status_uses_configured_default_locale() {
        let mut config = Config::default();
        config.locale.default = Locale::Zh;
        let cmd = StatusCommand::new(MemoryStore::new(), config);

        assert_eq!(cmd.run(&StatusOptions::default()).locale, Locale::Zh);
    }

    #[test]
    fn test_status_unavailable_storage() {
        let cmd = StatusCommand::new(UnavailableStore, Config::default());
        let output = cmd.run(&StatusOptions::default());

        assert_eq!(output.gate, ActiveGate::LanguageSelect);
        assert!(output.storage_error.is_some());

        let text = cmd.format_output(&output, &StatusOptions::default());
        assert!(text.contains("storage unreadable"));
    }

    #[test]
    fn test_format_output() {
        let cmd = StatusCommand::new(MemoryStore::new(), Config::default());
        let output = cmd.run(&StatusOptions::default());

        let quiet = StatusOptions {
            quiet: true,
            ..Default::default()
        };
        assert!(cmd.format_output(&output, &quiet).is_empty());

        let json = StatusOptions {
            json: true,
            ..Default::default()
        };
        let value: serde_json::Value =
            serde_json::from_str(&cmd.format_output(&output, &json)).unwrap();
        assert_eq!(value["gate"], "language_select");
        assert_eq!(value["flags"]["permissionsShown"], false);

        let text = cmd.format_output(&output, &StatusOptions::default());
        assert!(text.contains("Next gate: language_select"));
        assert!(text.contains("[ ] tutorialComplete"));
    }
}
