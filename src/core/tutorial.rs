//! Tutorial steps and the walkthrough cursor.
//!
//! Each step is tagged with the screen it explains. The cursor only moves
//! forward and never stalls: if no later step fits the screen being shown,
//! the walkthrough is over.

use serde::{Deserialize, Serialize};

use crate::core::state::TutorialAction;
use crate::locale::{Locale, TextKey};

/// Where the tutorial card sits on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StepPosition {
    Top,
    Bottom,
    Left,
    Right,
    #[default]
    Center,
}

/// Which way the pointer arrow faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrowDirection {
    Up,
    Down,
    Left,
    Right,
}

/// One step of the walkthrough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TutorialStep {
    /// Stable step identifier.
    pub id: String,
    /// Screen identifier this step explains.
    pub screen: String,
    /// Card placement.
    #[serde(default)]
    pub position: StepPosition,
    /// Pointer arrow, if the step points at something.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrow: Option<ArrowDirection>,
    /// Title string.
    pub title: TextKey,
    /// Body string.
    pub description: TextKey,
}

impl TutorialStep {
    /// Create a centered step without an arrow.
    pub fn new(
        id: impl Into<String>,
        screen: impl Into<String>,
        title: TextKey,
        description: TextKey,
    ) -> Self {
        Self {
            id: id.into(),
            screen: screen.into(),
            position: StepPosition::Center,
            arrow: None,
            title,
            description,
        }
    }

    /// Place the card and point an arrow.
    pub fn pointing(mut self, position: StepPosition, arrow: ArrowDirection) -> Self {
        self.position = position;
        self.arrow = Some(arrow);
        self
    }

    /// Whether this step belongs on `screen`.
    pub fn applies_to(&self, screen: &str) -> bool {
        self.screen == screen
    }

    /// Localized title.
    pub fn title_text(&self, locale: Locale) -> &'static str {
        crate::locale::lookup(locale, self.title)
    }

    /// Localized description.
    pub fn description_text(&self, locale: Locale) -> &'static str {
        crate::locale::lookup(locale, self.description)
    }
}

/// The built-in walkthrough over the main menu.
pub fn default_steps() -> Vec<TutorialStep> {
    vec![
        TutorialStep::new(
            "welcome",
            "main",
            TextKey::TutorialWelcomeTitle,
            TextKey::TutorialWelcomeDesc,
        ),
        TutorialStep::new(
            "modules",
            "main",
            TextKey::TutorialModulesTitle,
            TextKey::TutorialModulesDesc,
        )
        .pointing(StepPosition::Top, ArrowDirection::Down),
        TutorialStep::new(
            "module1",
            "main",
            TextKey::TutorialModule1Title,
            TextKey::TutorialModule1Desc,
        )
        .pointing(StepPosition::Bottom, ArrowDirection::Up),
        TutorialStep::new(
            "settings",
            "main",
            TextKey::TutorialSettingsTitle,
            TextKey::TutorialSettingsDesc,
        )
        .pointing(StepPosition::Left, ArrowDirection::Right),
        TutorialStep::new(
            "start",
            "main",
            TextKey::TutorialStartTitle,
            TextKey::TutorialStartDesc,
        ),
    ]
}

/// Result of advancing the walkthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// The cursor moved to this step index.
    MovedTo(usize),
    /// The walkthrough is over.
    Finished,
}

/// Cursor over a step table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Walkthrough {
    steps: Vec<TutorialStep>,
    index: usize,
}

impl Walkthrough {
    /// Start at the first step.
    pub fn new(steps: Vec<TutorialStep>) -> Self {
        Self { steps, index: 0 }
    }

    /// Move back to the first step.
    pub fn reset(&mut self) {
        self.index = 0;
    }

    /// Current step index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The step table.
    pub fn steps(&self) -> &[TutorialStep] {
        &self.steps
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The step under the cursor. `None` only for an empty table.
    pub fn current(&self) -> Option<&TutorialStep> {
        self.steps.get(self.index)
    }

    /// Whether the cursor is on the last step.
    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.steps.len()
    }

    /// The current step if it belongs on `screen`; otherwise nothing is shown.
    pub fn visible_step(&self, screen: &str) -> Option<&TutorialStep> {
        self.current().filter(|s| s.applies_to(screen))
    }

    /// First step strictly after the cursor that applies to `screen`.
    fn next_for_screen(&self, screen: &str) -> Option<usize> {
        self.steps
            .iter()
            .enumerate()
            .skip(self.index + 1)
            .find(|(_, s)| s.applies_to(screen))
            .map(|(i, _)| i)
    }

    /// Advance in response to a user action on `screen`.
    ///
    /// Skip and next-on-last finish. Otherwise the cursor jumps to the first
    /// later step for `screen`, or finishes when there is none.
    pub fn advance(&mut self, action: TutorialAction, screen: &str) -> Progress {
        if action == TutorialAction::Skip || self.is_last() {
            return Progress::Finished;
        }

        match self.next_for_screen(screen) {
            Some(next) => {
                self.index = next;
                Progress::MovedTo(next)
            }
            None => Progress::Finished,
        }
    }

    /// Follow a screen change.
    ///
    /// When the current step is for another screen, jump to the first later
    /// step for the new screen if one exists. Otherwise stay put; the card is
    /// just hidden until the user comes back.
    pub fn sync_screen(&mut self, screen: &str) -> Option<usize> {
        let off_screen = self.current().is_some_and(|s| !s.applies_to(screen));
        if !off_screen {
            return None;
        }

        let next = self.next_for_screen(screen)?;
        self.index = next;
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixed_steps() -> Vec<TutorialStep> {
        let step = |id: &str, screen: &str| {
            TutorialStep::new(id, screen, TextKey::TutorialNext, TextKey::TutorialSkip)
        };
        vec![
            step("a", "main"),
            step("b", "module1"),
            step("c", "main"),
            step("d", "module1"),
        ]
    }

    #[test]
    fn test_default_steps_shape() {
        let steps = default_steps();
        let ids: Vec<_> = steps.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["welcome", "modules", "module1", "settings", "start"]);
        assert!(steps.iter().all(|s| s.screen == "main"));
        assert_eq!(steps[1].arrow, Some(ArrowDirection::Down));
        assert_eq!(steps[3].position, StepPosition::Left);
        assert_eq!(steps[4].position, StepPosition::Center);
    }

    #[test]
    fn test_next_walks_default_steps_then_finishes() {
        let mut w = Walkthrough::new(default_steps());
        for expected in 1..5 {
            assert_eq!(
                w.advance(TutorialAction::Next, "main"),
                Progress::MovedTo(expected)
            );
        }
        assert!(w.is_last());
        assert_eq!(w.advance(TutorialAction::Next, "main"), Progress::Finished);
    }

    #[test]
    fn test_skip_finishes_from_any_step() {
        for start in 0..5 {
            let mut w = Walkthrough::new(default_steps());
            for _ in 0..start {
                w.advance(TutorialAction::Next, "main");
            }
            assert_eq!(w.advance(TutorialAction::Skip, "main"), Progress::Finished);
        }
    }

    #[test]
    fn test_next_jumps_to_matching_screen() {
        let mut w = Walkthrough::new(mixed_steps());
        assert_eq!(w.advance(TutorialAction::Next, "main"), Progress::MovedTo(2));
    }

    #[test]
    fn test_next_without_later_match_finishes() {
        let mut w = Walkthrough::new(mixed_steps());
        assert_eq!(w.advance(TutorialAction::Next, "module1"), Progress::MovedTo(1));
        assert_eq!(w.advance(TutorialAction::Next, "module1"), Progress::MovedTo(3));

        let mut w = Walkthrough::new(mixed_steps());
        assert_eq!(w.advance(TutorialAction::Next, "circles"), Progress::Finished);
        assert_eq!(w.index(), 0);
    }

    #[test]
    fn test_empty_table_finishes() {
        let mut w = Walkthrough::new(Vec::new());
        assert!(w.current().is_none());
        assert!(w.visible_step("main").is_none());
        assert_eq!(w.advance(TutorialAction::Next, "main"), Progress::Finished);
    }

    #[test]
    fn test_visible_step_only_on_matching_screen() {
        let w = Walkthrough::new(default_steps());
        assert_eq!(w.visible_step("main").map(|s| s.id.as_str()), Some("welcome"));
        assert!(w.visible_step("module1").is_none());
    }

    #[test]
    fn test_sync_screen_moves_forward_only() {
        let mut w = Walkthrough::new(mixed_steps());
        assert_eq!(w.sync_screen("module1"), Some(1));
        assert_eq!(w.sync_screen("main"), Some(2));
        // Nothing for this screen ahead: stay
        assert_eq!(w.sync_screen("circles"), None);
        assert_eq!(w.index(), 2);
        // Already on a matching step: stay
        assert_eq!(w.sync_screen("main"), None);
        assert_eq!(w.index(), 2);
    }

    #[test]
    fn test_reset() {
        let mut w = Walkthrough::new(default_steps());
        w.advance(TutorialAction::Next, "main");
        w.reset();
        assert_eq!(w.index(), 0);
    }

    #[test]
    fn test_step_text() {
        let step = &default_steps()[0];
        assert_eq!(step.title_text(Locale::En), "Welcome, friend!");
        assert_eq!(step.title_text(Locale::Ms), "Selamat datang, kawan!");
    }

    #[test]
    fn test_step_deserializes_from_toml() {
        let toml_content = r#"
id = "games"
screen = "module1"
position = "top"
arrow = "down"
title = "tutorialModulesTitle"
description = "tutorialModulesDesc"
"#;
        let step: TutorialStep = toml::from_str(toml_content).unwrap();
        assert_eq!(step.screen, "module1");
        assert_eq!(step.arrow, Some(ArrowDirection::Down));
        assert_eq!(step.title, TextKey::TutorialModulesTitle);
    }
}
