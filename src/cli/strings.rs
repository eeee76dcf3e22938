//! Strings command.
//!
//! Prints the display string table for one language.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::Config;
use crate::locale::{Dictionary, LanguageContext, Locale};
use crate::storage::LocalStore;

/// Options for the strings command.
#[derive(Debug, Clone, Default)]
pub struct StringsOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Language to print (default: the stored one).
    pub locale: Option<Locale>,
}

/// Output format for the strings command.
#[derive(Debug, Clone, Serialize)]
pub struct StringsOutput {
    pub locale: Locale,
    pub strings: BTreeMap<&'static str, &'static str>,
}

/// The strings command implementation.
pub struct StringsCommand<S: LocalStore> {
    store: S,
    config: Config,
}

impl<S: LocalStore> StringsCommand<S> {
    /// Create a new strings command.
    pub fn new(store: S, config: Config) -> Self {
        Self { store, config }
    }

    /// Run the strings command.
    pub fn run(&self, options: &StringsOptions) -> StringsOutput {
        let locale = options.locale.unwrap_or_else(|| {
            LanguageContext::load(&self.store, self.config.locale.default).locale()
        });

        StringsOutput {
            locale,
            strings: Dictionary::new(locale).to_map(),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &StringsOutput, options: &StringsOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    fn format_human_readable(&self, output: &StringsOutput) -> String {
        let width = output.strings.keys().map(|k| k.len()).max().unwrap_or(0);

        let mut text = format!(
            "{} ({})\n\n",
            output.locale.native_name(),
            output.locale.tag()
        );
        for (key, value) in &output.strings {
            text.push_str(&format!("{:width$}  {}\n", key, value, width = width));
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::TextKey;
    use crate::storage::{persist_language, MemoryStore};

    #[test]
    fn test_strings_for_explicit_locale() {
        let cmd = StringsCommand::new(MemoryStore::new(), Config::default());
        let output = cmd.run(&StringsOptions {
            locale: Some(Locale::Ms),
            ..Default::default()
        });

        assert_eq!(output.locale, Locale::Ms);
        assert_eq!(output.strings.len(), TextKey::ALL.len());
        assert_eq!(
            output.strings["tutorialWelcomeTitle"],
            "Selamat datang, kawan!"
        );
    }

    #[test]
    fn test_strings_default_to_stored_locale() {
        let store = MemoryStore::new();
        persist_language(&store, Locale::Zh).unwrap();
        let cmd = StringsCommand::new(store, Config::default());

        assert_eq!(cmd.run(&StringsOptions::default()).locale, Locale::Zh);
    }

    #[test]
    fn test_format_output() {
        let cmd = StringsCommand::new(MemoryStore::new(), Config::default());
        let output = cmd.run(&StringsOptions::default());

        let text = cmd.format_output(&output, &StringsOptions::default());
        assert!(text.starts_with("English (en)\n"));
        assert!(text.contains("selectLanguage"));

        let json = StringsOptions {
            json: true,
            ..Default::default()
        };
        let value: serde_json::Value =
            serde_json::from_str(&cmd.format_output(&output, &json)).unwrap();
        assert_eq!(value["locale"], "en");
        assert_eq!(value["strings"]["selectLanguage"], "Select Language");
    }
}
