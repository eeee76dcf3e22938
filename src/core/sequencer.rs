//! Onboarding sequencer.
//!
//! Decides which gate stands in front of the main app: language selection,
//! then the permission request, then the tutorial. Each gate is shown until
//! its persisted flag is written, and gates are always considered in that
//! order. Once every gate has passed, the sequencer is done for the session
//! and never reads the flags again.

use std::fmt;

use crate::capability::{AudioOutput, CapabilityReport};
use crate::config::Config;
use crate::core::state::{
    ActiveGate, EventType, GateFlag, GateFlags, SequencerSnapshot, TraceEvent, TutorialAction,
};
use crate::core::tutorial::{default_steps, Progress, TutorialStep, Walkthrough};
use crate::error::{BoundariesError, FailOpen, Result};
use crate::locale::Locale;
use crate::storage::{persist_language, read_flag, read_flags, write_flag, LocalStore};

/// The gate a fresh session would start in, given what is stored.
pub fn initial_gate<S: LocalStore + ?Sized>(store: &S) -> ActiveGate {
    read_flags(store).initial_gate()
}

/// Onboarding state machine.
///
/// Owns the session's gate state. All transitions go through the
/// `complete_*` and `advance_tutorial` methods, which write the gate's flag
/// before moving on.
pub struct Sequencer<S: LocalStore> {
    /// Key-value store holding the gate flags and settings.
    store: S,
    /// The gate currently shown.
    gate: ActiveGate,
    /// Flags as read at startup, updated as gates complete.
    flags: GateFlags,
    /// Tutorial cursor.
    walkthrough: Walkthrough,
    /// Sound output to wake after an audio grant.
    audio: Option<Box<dyn AudioOutput>>,
    /// Whether to wake sound output after an audio grant.
    resume_audio: bool,
    /// Language picked at the language gate this session.
    chosen_locale: Option<Locale>,
    /// Transition log for this session.
    trace: Vec<TraceEvent>,
}

impl<S: LocalStore> Sequencer<S> {
    /// Read the flags and pick the starting gate.
    pub fn new(store: S, steps: Vec<TutorialStep>) -> Self {
        let flags = read_flags(&store);
        let gate = flags.initial_gate();

        tracing::debug!(?flags, gate = %gate, "onboarding start");

        let mut sequencer = Self {
            store,
            gate,
            flags,
            walkthrough: Walkthrough::new(steps),
            audio: None,
            resume_audio: true,
            chosen_locale: None,
            trace: Vec::new(),
        };
        sequencer.record(EventType::SessionStart, Some(format!("gate: {}", gate)));
        sequencer
    }

    /// Build with the default step table.
    pub fn with_default_steps(store: S) -> Self {
        Self::new(store, default_steps())
    }

    /// Build from configuration (step table and audio policy).
    pub fn from_config(store: S, config: &Config) -> Self {
        Self::new(store, config.tutorial.steps.clone())
            .with_resume_audio(config.permissions.resume_audio)
    }

    /// Attach the sound output to wake after an audio grant.
    pub fn with_audio_output(mut self, audio: Box<dyn AudioOutput>) -> Self {
        self.audio = Some(audio);
        self
    }

    /// Enable or disable waking sound output after an audio grant.
    pub fn with_resume_audio(mut self, resume: bool) -> Self {
        self.resume_audio = resume;
        self
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The gate currently shown.
    pub fn active_gate(&self) -> ActiveGate {
        self.gate
    }

    /// Whether onboarding is finished for this session.
    pub fn is_terminal(&self) -> bool {
        self.gate.is_terminal()
    }

    /// Flags as known to this session.
    pub fn flags(&self) -> GateFlags {
        self.flags
    }

    /// Tutorial cursor, while the tutorial is active.
    pub fn step_index(&self) -> Option<usize> {
        (self.gate == ActiveGate::Tutorial).then(|| self.walkthrough.index())
    }

    /// The tutorial step under the cursor, while the tutorial is active.
    pub fn current_step(&self) -> Option<&TutorialStep> {
        if self.gate != ActiveGate::Tutorial {
            return None;
        }
        self.walkthrough.current()
    }

    /// The tutorial step to draw over `screen`, if any.
    pub fn visible_step(&self, screen: &str) -> Option<&TutorialStep> {
        if self.gate != ActiveGate::Tutorial {
            return None;
        }
        self.walkthrough.visible_step(screen)
    }

    /// The tutorial step table.
    pub fn steps(&self) -> &[TutorialStep] {
        self.walkthrough.steps()
    }

    /// Language picked at the language gate this session.
    pub fn chosen_locale(&self) -> Option<Locale> {
        self.chosen_locale
    }

    /// Transition log for this session.
    pub fn trace(&self) -> &[TraceEvent] {
        &self.trace
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Serializable view of the current state.
    pub fn snapshot(&self) -> SequencerSnapshot {
        SequencerSnapshot {
            gate: self.gate,
            step_index: self.step_index(),
            step_count: self.walkthrough.len(),
            flags: self.flags,
            chosen_locale: self.chosen_locale,
        }
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Transition: LanguageSelect → PermissionRequest | Tutorial | None
    ///
    /// Marks the language gate done, persists the language, then continues
    /// the priority chain from the permission gate. A device that already
    /// went through permissions in an earlier session falls straight through.
    pub fn complete_language(&mut self, locale: Locale) -> Result<ActiveGate> {
        self.expect_gate(ActiveGate::LanguageSelect, "complete language selection")?;

        self.mark_complete(GateFlag::LanguageSetupComplete);
        persist_language(&self.store, locale).fail_open_with("persisting chosen language", ());
        self.chosen_locale = Some(locale);
        self.record(EventType::LanguageSelected, Some(format!("locale: {}", locale)));

        let next = if !self.reread(GateFlag::PermissionsShown) {
            ActiveGate::PermissionRequest
        } else if !self.reread(GateFlag::TutorialComplete) {
            ActiveGate::Tutorial
        } else {
            ActiveGate::None
        };
        self.enter(next);
        Ok(next)
    }

    /// Transition: PermissionRequest → Tutorial | None
    ///
    /// The permission screen counts as shown whatever the outcome. When audio
    /// was granted, sound output is woken on a best-effort basis.
    pub fn complete_permission(&mut self, report: &CapabilityReport) -> Result<ActiveGate> {
        self.expect_gate(ActiveGate::PermissionRequest, "complete permission request")?;

        self.mark_complete(GateFlag::PermissionsShown);
        let audio_granted = report.audio_granted();
        self.record(
            EventType::PermissionsCompleted,
            Some(format!("audio_granted: {}", audio_granted)),
        );

        let next = if !self.reread(GateFlag::TutorialComplete) {
            ActiveGate::Tutorial
        } else {
            ActiveGate::None
        };
        self.enter(next);

        if audio_granted {
            self.wake_audio();
        }

        Ok(next)
    }

    /// Transition: PermissionRequest → Tutorial | None, without requesting.
    pub fn skip_permission(&mut self) -> Result<ActiveGate> {
        self.complete_permission(&CapabilityReport::skipped())
    }

    /// Transition: Tutorial → Tutorial (cursor moves) | None (finished)
    ///
    /// `current_screen` is the screen the router is showing; the cursor only
    /// lands on steps for that screen.
    pub fn advance_tutorial(
        &mut self,
        action: TutorialAction,
        current_screen: &str,
    ) -> Result<ActiveGate> {
        self.expect_gate(ActiveGate::Tutorial, "advance tutorial")?;

        match self.walkthrough.advance(action, current_screen) {
            Progress::MovedTo(index) => {
                self.record(EventType::TutorialStep, Some(format!("step: {}", index)));
            }
            Progress::Finished => {
                self.mark_complete(GateFlag::TutorialComplete);
                let event = match action {
                    TutorialAction::Skip => EventType::TutorialSkipped,
                    TutorialAction::Next => EventType::TutorialCompleted,
                };
                self.record(event, None);
                self.enter(ActiveGate::None);
            }
        }

        Ok(self.gate)
    }

    /// Follow a screen change while the tutorial is active. Returns the new
    /// step index if the cursor jumped forward.
    pub fn sync_screen(&mut self, screen: &str) -> Option<usize> {
        if self.gate != ActiveGate::Tutorial {
            return None;
        }
        let moved = self.walkthrough.sync_screen(screen);
        if let Some(index) = moved {
            self.record(
                EventType::TutorialStep,
                Some(format!("step: {} (screen: {})", index, screen)),
            );
        }
        moved
    }

    /// Fail with `InvalidState` unless `expected` is the active gate. Hosts
    /// call this before doing platform work that belongs to one gate.
    pub fn expect_gate(&self, expected: ActiveGate, action: &str) -> Result<()> {
        if self.gate != expected {
            return Err(BoundariesError::invalid_state(format!(
                "Cannot {} in {} state",
                action, self.gate
            )));
        }
        Ok(())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Read a later gate's flag from storage. A flag this session already
    /// wrote counts as set even if the write never reached storage.
    fn reread(&mut self, flag: GateFlag) -> bool {
        let value = self.flags.get(flag) || read_flag(&self.store, flag);
        self.set_known(flag, value);
        value
    }

    fn mark_complete(&mut self, flag: GateFlag) {
        if !write_flag(&self.store, flag) {
            self.record(EventType::FlagWriteFailed, Some(flag.key().to_string()));
        }
        self.set_known(flag, true);
    }

    fn set_known(&mut self, flag: GateFlag, value: bool) {
        match flag {
            GateFlag::LanguageSetupComplete => self.flags.language_setup_complete = value,
            GateFlag::PermissionsShown => self.flags.permissions_shown = value,
            GateFlag::TutorialComplete => self.flags.tutorial_complete = value,
        }
    }

    fn enter(&mut self, gate: ActiveGate) {
        if gate == ActiveGate::Tutorial {
            self.walkthrough.reset();
        }
        tracing::debug!(from = %self.gate, to = %gate, "onboarding gate changed");
        self.record(
            EventType::GateChanged,
            Some(format!("{} -> {}", self.gate, gate)),
        );
        self.gate = gate;
    }

    fn wake_audio(&mut self) {
        if !self.resume_audio {
            return;
        }
        let Some(audio) = self.audio.as_ref() else {
            return;
        };
        match audio.resume() {
            Ok(()) => self.record(EventType::AudioResumed, None),
            Err(e) => {
                tracing::debug!(error = %e, "audio resume failed; continuing");
                self.record(EventType::AudioResumeFailed, Some(e.to_string()));
            }
        }
    }

    fn record(&mut self, event_type: EventType, details: Option<String>) {
        self.trace.push(TraceEvent::new(event_type, details));
    }
}

impl<S: LocalStore + fmt::Debug> fmt::Debug for Sequencer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequencer")
            .field("store", &self.store)
            .field("gate", &self.gate)
            .field("flags", &self.flags)
            .field("walkthrough", &self.walkthrough)
            .field("audio", &self.audio.is_some())
            .field("resume_audio", &self.resume_audio)
            .field("chosen_locale", &self.chosen_locale)
            .finish()
    }
}
