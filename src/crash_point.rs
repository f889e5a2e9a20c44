//! Crash point injection for testing durability
//!
//! Setting `GEOHUNT_CRASH_POINT=<name>` makes the process abort at the
//! named point: no cleanup, no unwinding, no catching. Used to verify that
//! a restart resumes from the last durable progress record.
//!
//! ```bash
//! GEOHUNT_CRASH_POINT=hunt_after_add_before_persist geohunt simulate ...
//! ```

use std::sync::OnceLock;

static CRASH_POINT: OnceLock<Option<String>> = OnceLock::new();

#[inline]
fn configured_point() -> Option<&'static str> {
    CRASH_POINT
        .get_or_init(|| std::env::var("GEOHUNT_CRASH_POINT").ok())
        .as_deref()
}

/// Returns true if `GEOHUNT_CRASH_POINT` equals `name`.
#[inline]
pub fn crash_point_enabled(name: &str) -> bool {
    configured_point().map(|p| p == name).unwrap_or(false)
}

/// Abort the process if the named crash point is enabled.
#[inline]
pub fn maybe_crash(name: &str) {
    if crash_point_enabled(name) {
        eprintln!("[CRASH] Triggering crash at point: {}", name);
        std::process::abort();
    }
}

/// Defined crash point names
pub mod points {
    /// Progress temp file is fsynced but not yet renamed into place
    pub const PROGRESS_AFTER_FSYNC: &str = "progress_after_fsync";

    /// Backend confirmed the add; progress not yet persisted
    pub const HUNT_AFTER_ADD_BEFORE_PERSIST: &str = "hunt_after_add_before_persist";

    pub fn all() -> &'static [&'static str] {
        &[PROGRESS_AFTER_FSYNC, HUNT_AFTER_ADD_BEFORE_PERSIST]
    }
}
