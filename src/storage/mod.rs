//! Persistent key-value storage.
//!
//! A string-to-string store with file-based and in-memory backends, plus the
//! gate flag and parent settings views layered on top of it.

pub mod file;
pub mod flags;
pub mod memory;
pub mod settings;
pub mod traits;

pub use file::FileStore;
pub use flags::{clear_flag, read_flag, read_flags, try_read_flag, write_flag};
pub use memory::MemoryStore;
pub use settings::{persist_language, ParentSettings, SETTINGS_KEY};
pub use traits::LocalStore;
