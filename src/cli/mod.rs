//! CLI commands.
//!
//! Settings-surface commands that work on the stored state directly. The
//! interactive session itself runs through [`crate::events`].

pub mod language;
pub mod reset;
pub mod status;
pub mod strings;

pub use language::LanguageCommand;
pub use reset::ResetCommand;
pub use status::StatusCommand;
pub use strings::StringsCommand;
