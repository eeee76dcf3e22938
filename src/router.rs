//! Screen routing.
//!
//! Screens are opaque identifiers. The router remembers which one is shown
//! and knows where "back" leads from each of the app's own screens.

/// The main menu.
pub const MAIN_SCREEN: &str = "main";

/// Screens the app ships with.
pub const KNOWN_SCREENS: &[&str] = &[
    MAIN_SCREEN,
    "module1",
    "module2",
    "module3",
    "circles",
    "safecontact",
    "privatePublic",
    "scenarioQuiz",
    "safetyScenarios",
    "infoVault",
    "spaceBubble",
    "whatWouldYouDo",
    "parentSettings",
];

/// Whether `screen` is one of the app's own screens.
pub fn is_known(screen: &str) -> bool {
    KNOWN_SCREENS.contains(&screen)
}

/// Where "back" leads from `screen`. `None` for the main menu and for
/// screens the app doesn't know.
pub fn parent_of(screen: &str) -> Option<&'static str> {
    match screen {
        "circles" | "safecontact" => Some("module1"),
        "privatePublic" | "scenarioQuiz" | "safetyScenarios" | "infoVault" => Some("module2"),
        "spaceBubble" | "whatWouldYouDo" => Some("module3"),
        "module1" | "module2" | "module3" | "parentSettings" => Some(MAIN_SCREEN),
        _ => None,
    }
}

/// Tracks the screen currently shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenRouter {
    current: String,
}

impl ScreenRouter {
    /// Start on the main menu.
    pub fn new() -> Self {
        Self {
            current: MAIN_SCREEN.to_string(),
        }
    }

    /// The screen currently shown.
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Show `screen`. Any identifier is accepted.
    pub fn navigate(&mut self, screen: impl Into<String>) -> &str {
        let screen = screen.into();
        if !is_known(&screen) {
            tracing::debug!(screen = %screen, "navigating to unknown screen");
        }
        self.current = screen;
        &self.current
    }

    /// Go back one level. Unknown screens return to the main menu.
    pub fn back(&mut self) -> &str {
        let target = parent_of(&self.current).unwrap_or(MAIN_SCREEN);
        self.current = target.to_string();
        &self.current
    }
}

impl Default for ScreenRouter {
    fn default() -> Self {
        Self::new()
    }
}
