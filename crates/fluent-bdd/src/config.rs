//! Process-wide settings.
//!
//! Only one switch exists: whether a scenario that skipped steps counts as a
//! failure. An in-process override wins over the `FLUENT_BDD_FAIL_ON_SKIPPED`
//! environment variable, which wins over the default of `false`.

use std::sync::atomic::{AtomicU8, Ordering};

/// Environment variable consulted by [`fail_on_skipped`].
pub const FAIL_ON_SKIPPED_ENV: &str = "FLUENT_BDD_FAIL_ON_SKIPPED";

#[derive(Clone, Copy)]
#[repr(u8)]
enum Override {
    Unset = 0,
    Disabled = 1,
    Enabled = 2,
}

static FAIL_ON_SKIPPED: AtomicU8 = AtomicU8::new(Override::Unset as u8);

fn parse_env_bool(value: &str) -> Option<bool> {
    let value = value.trim();
    let matches = |candidates: &[&str]| {
        candidates
            .iter()
            .any(|candidate| value.eq_ignore_ascii_case(candidate))
    };
    if matches(&["1", "true", "yes", "on"]) {
        Some(true)
    } else if matches(&["0", "false", "no", "off"]) {
        Some(false)
    } else {
        None
    }
}

fn from_env() -> Option<bool> {
    let raw = std::env::var(FAIL_ON_SKIPPED_ENV).ok()?;
    let parsed = parse_env_bool(&raw);
    if parsed.is_none() {
        log::warn!("ignoring unrecognised {FAIL_ON_SKIPPED_ENV} value '{raw}'");
    }
    parsed
}

fn from_override() -> Option<bool> {
    match FAIL_ON_SKIPPED.load(Ordering::Relaxed) {
        x if x == Override::Enabled as u8 => Some(true),
        x if x == Override::Disabled as u8 => Some(false),
        _ => None,
    }
}

/// Whether skipped steps fail a scenario that is not tagged
/// `@allow_skipped`.
#[must_use]
pub fn fail_on_skipped() -> bool {
    from_override().or_else(from_env).unwrap_or(false)
}

/// Override [`fail_on_skipped`] for the whole process.
pub fn set_fail_on_skipped(enabled: bool) {
    let value = if enabled {
        Override::Enabled
    } else {
        Override::Disabled
    };
    FAIL_ON_SKIPPED.store(value as u8, Ordering::Relaxed);
}

/// Drop the in-process override so the environment decides again.
pub fn clear_fail_on_skipped_override() {
    FAIL_ON_SKIPPED.store(Override::Unset as u8, Ordering::Relaxed);
}
