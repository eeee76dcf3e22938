//! Language command.
//!
//! Changes the stored display language the way the parent settings screen
//! does. Onboarding flags are left alone.

use serde::Serialize;

use crate::config::Config;
use crate::error::Result;
use crate::locale::{LanguageContext, Locale};
use crate::storage::LocalStore;

/// Options for the language command.
#[derive(Debug, Clone, Default)]
pub struct LanguageOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the language command.
#[derive(Debug, Clone, Serialize)]
pub struct LanguageOutput {
    /// Whether the new language was stored.
    pub success: bool,
    /// Language before the change.
    pub previous: Locale,
    /// Language after the change.
    pub locale: Locale,
    /// Error message if the change could not be stored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The language command implementation.
pub struct LanguageCommand<S: LocalStore> {
    store: S,
    config: Config,
}

impl<S: LocalStore> LanguageCommand<S> {
    /// Create a new language command.
    pub fn new(store: S, config: Config) -> Self {
        Self { store, config }
    }

    /// Parse `value` as a locale and store it.
    pub fn run(&self, value: &str, options: &LanguageOptions) -> Result<LanguageOutput> {
        let locale: Locale = value.parse()?;
        Ok(self.run_with_locale(locale, options))
    }

    /// Store `locale`.
    pub fn run_with_locale(&self, locale: Locale, _options: &LanguageOptions) -> LanguageOutput {
        let mut context = LanguageContext::load(&self.store, self.config.locale.default);
        let previous = context.locale();

        let error = context
            .change(&self.store, locale)
            .err()
            .map(|e| e.to_string());

        LanguageOutput {
            success: error.is_none(),
            previous,
            locale: context.locale(),
            error,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &LanguageOutput, options: &LanguageOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    fn format_human_readable(&self, output: &LanguageOutput) -> String {
        match output.error {
            Some(ref error) => format!("Could not save language: {}\n", error),
            None if output.previous == output.locale => {
                format!("Language already {}.\n", output.locale.native_name())
            }
            None => format!(
                "Language changed: {} -> {}\n",
                output.previous.native_name(),
                output.locale.native_name()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::GateFlag;
    use crate::storage::traits::tests::UnavailableStore;
    use crate::storage::{read_flag, MemoryStore, ParentSettings};
    use std::sync::Arc;

    #[test]
    fn test_change_language() {
        let store = Arc::new(MemoryStore::new());
        let cmd = LanguageCommand::new(Arc::clone(&store), Config::default());

        let output = cmd.run("MS", &LanguageOptions::default()).unwrap();

        assert!(output.success);
        assert_eq!(output.previous, Locale::En);
        assert_eq!(output.locale, Locale::Ms);
        assert_eq!(ParentSettings::load(&store).language, Some(Locale::Ms));
        // Settings-surface changes never complete the language gate
        assert!(!read_flag(&store, GateFlag::LanguageSetupComplete));
    }

    #[test]
    fn test_unknown_locale_rejected() {
        let cmd = LanguageCommand::new(MemoryStore::new(), Config::default());
        let err = cmd.run("fr", &LanguageOptions::default()).unwrap_err();
        assert!(err.is_caller_error());
    }

    #[test]
    fn test_change_reports_storage_failure() {
        let cmd = LanguageCommand::new(UnavailableStore, Config::default());
        let output = cmd.run_with_locale(Locale::Zh, &LanguageOptions::default());

        assert!(!output.success);
        assert_eq!(output.locale, Locale::Zh);
        assert!(cmd
            .format_output(&output, &LanguageOptions::default())
            .starts_with("Could not save language"));
    }

    #[test]
    fn test_format_output() {
        let cmd = LanguageCommand::new(MemoryStore::new(), Config::default());
        let output = cmd.run_with_locale(Locale::Zh, &LanguageOptions::default());

        let text = cmd.format_output(&output, &LanguageOptions::default());
        assert_eq!(text, "Language changed: English -> 中文\n");

        let json = LanguageOptions {
            json: true,
            ..Default::default()
        };
        let value: serde_json::Value =
            serde_json::from_str(&cmd.format_output(&output, &json)).unwrap();
        assert_eq!(value["locale"], "zh");
    }
}
