//! Event runner.
//!
//! Owns one onboarding session: the sequencer, the screen router, the
//! language context and the permission requester. Each event is applied and
//! answered with the resulting state.

use std::io::{BufRead, Write};

use crate::capability::{Capability, CapabilityReport, CapabilityRequester, PermissionOutcome};
use crate::core::sequencer::Sequencer;
use crate::core::state::{ActiveGate, TutorialAction};
use crate::error::{BoundariesError, Result};
use crate::events::input::{parse_event, Event};
use crate::events::output::{to_json, EventOutput, PermissionScreenView, StepView};
use crate::locale::{LanguageContext, Locale};
use crate::router::ScreenRouter;
use crate::storage::LocalStore;

/// Event runner context.
pub struct EventRunner<S: LocalStore, R: CapabilityRequester> {
    sequencer: Sequencer<S>,
    requester: R,
    router: ScreenRouter,
    language: LanguageContext,
    /// Statuses from the last request, shown on the permission screen.
    last_report: Option<CapabilityReport>,
}

impl<S: LocalStore, R: CapabilityRequester> EventRunner<S, R> {
    /// Create a new event runner.
    pub fn new(sequencer: Sequencer<S>, requester: R, language: LanguageContext) -> Self {
        Self {
            sequencer,
            requester,
            router: ScreenRouter::new(),
            language,
            last_report: None,
        }
    }

    /// The session's sequencer.
    pub fn sequencer(&self) -> &Sequencer<S> {
        &self.sequencer
    }

    /// The active display language.
    pub fn locale(&self) -> Locale {
        self.language.locale()
    }

    /// Apply one event and describe the result. Rejected events leave the
    /// state untouched and carry the reason in `error`.
    pub fn handle(&mut self, event: Event) -> EventOutput {
        tracing::debug!(
            event = event.name(),
            gate = %self.sequencer.active_gate(),
            "handling event"
        );

        let error = match self.apply(event) {
            Ok(()) => None,
            Err(e) => {
                if !e.is_caller_error() {
                    tracing::warn!("event failed: {}", e);
                }
                Some(e.to_string())
            }
        };
        self.output(error)
    }

    /// Parse and apply one input line.
    pub fn handle_line(&mut self, line: &str) -> EventOutput {
        match parse_event(line) {
            Ok(event) => self.handle(event),
            Err(e) => self.output(Some(e.to_string())),
        }
    }

    /// Process events line by line until input ends. Blank lines are
    /// ignored. Returns the number of events answered.
    pub fn run<I: BufRead, W: Write>(&mut self, input: I, mut output: W) -> Result<usize> {
        let mut answered = 0;

        for line in input.lines() {
            let line = line.map_err(|e| BoundariesError::storage("stdin", e))?;
            if line.trim().is_empty() {
                continue;
            }

            let result = self.handle_line(&line);
            let json = to_json(&result)?;
            writeln!(output, "{}", json).map_err(|e| BoundariesError::storage("stdout", e))?;
            output
                .flush()
                .map_err(|e| BoundariesError::storage("stdout", e))?;
            answered += 1;
        }

        Ok(answered)
    }

    /// Current state without applying anything.
    pub fn status(&self) -> EventOutput {
        self.output(None)
    }

    fn apply(&mut self, event: Event) -> Result<()> {
        match event {
            Event::SelectLanguage { locale } => {
                self.sequencer.complete_language(locale)?;
                self.language.set(locale);
            }
            Event::RequestPermissions => {
                // The platform prompt only belongs to the permission screen
                self.sequencer
                    .expect_gate(ActiveGate::PermissionRequest, "request permissions")?;
                let report = self.request_permissions();
                self.sequencer.complete_permission(&report)?;
                self.last_report = Some(report);
            }
            Event::SkipPermissions => {
                self.sequencer.skip_permission()?;
            }
            Event::TutorialNext => {
                self.sequencer
                    .advance_tutorial(TutorialAction::Next, self.router.current())?;
            }
            Event::TutorialSkip => {
                self.sequencer
                    .advance_tutorial(TutorialAction::Skip, self.router.current())?;
            }
            Event::Navigate { screen } => {
                self.ensure_main_app_visible()?;
                let screen = self.router.navigate(screen).to_string();
                self.sequencer.sync_screen(&screen);
            }
            Event::Back => {
                self.ensure_main_app_visible()?;
                let screen = self.router.back().to_string();
                self.sequencer.sync_screen(&screen);
            }
            Event::ChangeLanguage { locale } => {
                self.language.change(self.sequencer.store(), locale)?;
            }
            Event::Status => {}
        }
        Ok(())
    }

    /// Ask for every capability. A requester that cannot ask at all is
    /// reported as an error for each capability so the screen can say so.
    fn request_permissions(&self) -> CapabilityReport {
        match self.requester.request_all() {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!("permission request failed: {}", e);
                let mut report = CapabilityReport::pending();
                for capability in Capability::ALL {
                    report.record(capability, PermissionOutcome::Error(e.to_string()));
                }
                report
            }
        }
    }

    fn ensure_main_app_visible(&self) -> Result<()> {
        let gate = self.sequencer.active_gate();
        if gate.hides_main_app() {
            return Err(BoundariesError::invalid_state(format!(
                "Cannot navigate while {} is shown",
                gate
            )));
        }
        Ok(())
    }

    fn output(&self, error: Option<String>) -> EventOutput {
        let screen = self.router.current();
        let locale = self.language.locale();
        let step_count = self.sequencer.steps().len();
        let step = self
            .sequencer
            .step_index()
            .zip(self.sequencer.visible_step(screen))
            .map(|(index, step)| StepView::new(index, step_count, step, locale));

        let gate = self.sequencer.active_gate();
        let permission_screen = (gate == ActiveGate::PermissionRequest).then(|| {
            let report = self.last_report.clone().unwrap_or_default();
            PermissionScreenView::new(&report, locale)
        });

        EventOutput {
            gate,
            screen: screen.to_string(),
            locale,
            step,
            permission_screen,
            permissions: self.last_report.clone(),
            error,
        }
    }
}
