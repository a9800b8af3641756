//! Scenario reporting collector.
//!
//! Every scenario run through [`scenario`](crate::scenario) or
//! [`run_scenario`](crate::run_scenario) leaves a [`ScenarioRecord`] in a
//! global, thread-safe collector. Writers render the collected records for CI
//! tooling without access to the tests themselves.

use std::sync::{Mutex, MutexGuard, PoisonError};

#[cfg(feature = "diagnostics")]
pub mod json;
pub mod junit;
mod record;

pub use record::{
    GroupRecord, ScenarioRecord, ScenarioStatus, SkippedScenario, StepOutcome, StepRecord,
};

static REPORTS: Mutex<Vec<ScenarioRecord>> = Mutex::new(Vec::new());

fn lock_reports() -> MutexGuard<'static, Vec<ScenarioRecord>> {
    REPORTS.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Record a scenario outcome in the shared collector.
///
/// # Examples
///
/// ```
/// use fluent_bdd::reporting::{ScenarioRecord, ScenarioStatus, drain, record};
///
/// record(ScenarioRecord::new("tests/a.rs", "scenario", 1, Vec::new(), ScenarioStatus::Passed));
/// assert!(drain().iter().any(|r| r.scenario_name() == "scenario"));
/// ```
pub fn record(record: ScenarioRecord) {
    log::trace!(
        "recording scenario '{}' as {}",
        record.scenario_name(),
        record.status().label()
    );
    lock_reports().push(record);
}

/// Copy of the recorded scenarios, leaving them in place.
#[must_use]
pub fn snapshot() -> Vec<ScenarioRecord> {
    lock_reports().clone()
}

/// Remove and return every recorded scenario.
#[must_use]
pub fn drain() -> Vec<ScenarioRecord> {
    lock_reports().drain(..).collect()
}
