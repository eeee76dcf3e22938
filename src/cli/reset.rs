//! Reset command.
//!
//! Clears onboarding flags so the gates show again on the next launch. The
//! sequencer itself never clears a flag.

use serde::Serialize;

use crate::core::sequencer::initial_gate;
use crate::core::state::{ActiveGate, GateFlag};
use crate::storage::{clear_flag, LocalStore};

/// Options for the reset command.
#[derive(Debug, Clone, Default)]
pub struct ResetOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Clear only this flag (default: all).
    pub flag: Option<GateFlag>,
}

/// Output format for the reset command.
#[derive(Debug, Clone, Serialize)]
pub struct ResetOutput {
    /// Whether every requested flag was cleared.
    pub success: bool,
    /// Flags cleared.
    pub cleared: Vec<GateFlag>,
    /// Gate the next session will open on.
    pub next_gate: ActiveGate,
    /// Error message if a flag could not be cleared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The reset command implementation.
pub struct ResetCommand<S: LocalStore> {
    store: S,
}

impl<S: LocalStore> ResetCommand<S> {
    /// Create a new reset command.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Run the reset command.
    pub fn run(&self, options: &ResetOptions) -> ResetOutput {
        let targets: Vec<GateFlag> = match options.flag {
            Some(flag) => vec![flag],
            None => GateFlag::ALL.to_vec(),
        };

        let mut cleared = Vec::new();
        let mut error = None;
        for flag in targets {
            match clear_flag(&self.store, flag) {
                Ok(()) => cleared.push(flag),
                Err(e) => {
                    error = Some(format!("{}: {}", flag.key(), e));
                    break;
                }
            }
        }

        ResetOutput {
            success: error.is_none(),
            cleared,
            next_gate: initial_gate(&self.store),
            error,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ResetOutput, options: &ResetOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    fn format_human_readable(&self, output: &ResetOutput) -> String {
        let mut text = String::new();
        for flag in &output.cleared {
            text.push_str(&format!("Cleared {}\n", flag.key()));
        }
        match output.error {
            Some(ref error) => text.push_str(&format!("Reset failed: {}\n", error)),
            None => text.push_str(&format!("Next launch opens on: {}\n", output.next_gate)),
        }
        text
    }
}
