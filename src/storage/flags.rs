//! Gate flags on top of the key-value store.
//!
//! A flag is set when its stored value is exactly `"true"`. Absent values,
//! other strings and read failures all count as unset, so a broken store
//! shows the gate again instead of skipping it. Write failures are logged and
//! dropped.

use crate::core::state::{GateFlag, GateFlags};
use crate::error::{FailOpen, Result};
use crate::storage::LocalStore;

const TRUE: &str = "true";

/// Read a flag strictly, surfacing storage errors.
pub fn try_read_flag<S: LocalStore + ?Sized>(store: &S, flag: GateFlag) -> Result<bool> {
    Ok(store.get(flag.key())?.as_deref() == Some(TRUE))
}

/// Read a flag, treating any failure as unset.
pub fn read_flag<S: LocalStore + ?Sized>(store: &S, flag: GateFlag) -> bool {
    try_read_flag(store, flag).fail_open_with(&format!("reading flag {}", flag.key()), false)
}

/// Read all three gate flags with the fail-open policy.
pub fn read_flags<S: LocalStore + ?Sized>(store: &S) -> GateFlags {
    GateFlags {
        language_setup_complete: read_flag(store, GateFlag::LanguageSetupComplete),
        permissions_shown: read_flag(store, GateFlag::PermissionsShown),
        tutorial_complete: read_flag(store, GateFlag::TutorialComplete),
    }
}

/// Mark a flag as complete. Returns whether the write reached storage.
pub fn write_flag<S: LocalStore + ?Sized>(store: &S, flag: GateFlag) -> bool {
    match store.set(flag.key(), TRUE) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(
                flag = flag.key(),
                error = %e,
                "could not persist gate flag; gate may reappear next session"
            );
            false
        }
    }
}

/// Clear a flag so its gate shows again on the next start.
pub fn clear_flag<S: LocalStore + ?Sized>(store: &S, flag: GateFlag) -> Result<()> {
    store.remove(flag.key())
}
