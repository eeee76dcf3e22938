//! Unified error types with a fail-open philosophy.
//!
//! Nothing in onboarding is allowed to take the app down. Storage that cannot
//! be read means a gate is shown again, storage that cannot be written means a
//! gate may reappear next session. Callers degrade through [`FailOpen`] rather
//! than propagating.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for boundaries operations.
#[derive(Error, Debug)]
pub enum BoundariesError {
    /// I/O errors from the key-value store file.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// JSON or TOML parsing/serialization errors.
    #[error("serialization error: {message}")]
    Serde { message: String },

    /// State machine violations (completion delivered to the wrong gate).
    #[error("invalid state: {message}")]
    InvalidState { message: String },

    /// Configuration loading errors.
    #[error("config error: {message}")]
    Config { message: String },

    /// Capability request failures.
    #[error("capability error: {message}")]
    Capability { message: String },

    /// Audio output could not be resumed.
    #[error("audio error: {message}")]
    Audio { message: String },

    /// A locale tag outside the supported set.
    #[error("unknown locale: {value}")]
    UnknownLocale { value: String },
}

/// A specialized Result type for boundaries operations.
pub type Result<T> = std::result::Result<T, BoundariesError>;

impl BoundariesError {
    /// Create a storage error from an I/O error.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Create a serialization error.
    pub fn serde(message: impl Into<String>) -> Self {
        Self::Serde {
            message: message.into(),
        }
    }

    /// Create an invalid state error.
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a capability error.
    pub fn capability(message: impl Into<String>) -> Self {
        Self::Capability {
            message: message.into(),
        }
    }

    /// Create an audio error.
    pub fn audio(message: impl Into<String>) -> Self {
        Self::Audio {
            message: message.into(),
        }
    }

    /// Create an unknown locale error.
    pub fn unknown_locale(value: impl Into<String>) -> Self {
        Self::UnknownLocale {
            value: value.into(),
        }
    }

    /// Whether this error is a caller mistake rather than an infrastructure
    /// failure. Infrastructure failures are degraded through [`FailOpen`];
    /// caller mistakes are reported back to whoever sent the event.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::InvalidState { .. } | Self::UnknownLocale { .. })
    }
}

impl From<io::Error> for BoundariesError {
    fn from(err: io::Error) -> Self {
        Self::Storage {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for BoundariesError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde {
            message: err.to_string(),
        }
    }
}

/// Trait for fail-open error handling.
///
/// Log the error and return a safe default.
pub trait FailOpen<T> {
    /// Handle an error by logging a warning and returning the default value.
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default;

    /// Handle an error by logging a warning and returning the provided fallback.
    fn fail_open_with(self, context: &str, fallback: T) -> T;
}

impl<T> FailOpen<T> for Result<T> {
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default,
    {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (fail-open: using default)", context, err);
                T::default()
            }
        }
    }

    fn fail_open_with(self, context: &str, fallback: T) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (fail-open: using fallback)", context, err);
                fallback
            }
        }
    }
}

/// Exit codes for the boundaries CLI.
pub mod exit_codes {
    /// Command completed.
    pub const OK: i32 = 0;

    /// Command failed (bad arguments, unreadable input).
    pub const ERROR: i32 = 1;

    /// Process panicked.
    pub const CRASH: i32 = 3;
}
