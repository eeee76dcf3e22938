//! JSON-lines event loop.
//!
//! A host shell drives a session by writing one JSON event per line and
//! reading one JSON state line back for each:
//!
//! - **select_language**: finish the language gate
//! - **request_permissions** / **skip_permissions**: finish the permission gate
//! - **tutorial_next** / **tutorial_skip**: move the tutorial along
//! - **navigate** / **back**: change the screen behind the tutorial
//! - **change_language**: settings-surface language change
//! - **status**: report without changing anything

pub mod input;
pub mod output;
pub mod runner;

pub use input::{parse_event, Event};
pub use output::{to_json, EventOutput, PermissionRow, PermissionScreenView, StepView};
pub use runner::EventRunner;
