//! JSON writer for scenario records.
//!
//! Status labels are lowercase so downstream tools can match on them without
//! normalising case.

use std::io::Write;

use serde::Serialize;

use super::{GroupRecord, ScenarioRecord, ScenarioStatus, StepRecord, snapshot};

fn is_empty(values: &&[String]) -> bool {
    values.is_empty()
}

#[derive(Serialize)]
struct JsonReport<'a> {
    scenarios: Vec<JsonScenario<'a>>,
}

#[derive(Serialize)]
struct JsonScenario<'a> {
    source_path: &'a str,
    scenario_name: &'a str,
    line: u32,
    tags: &'a [String],
    status: &'static str,
    #[serde(skip_serializing_if = "is_empty")]
    failures: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    skip: Option<JsonSkip>,
    groups: Vec<JsonGroup<'a>>,
}

#[derive(Serialize)]
struct JsonSkip {
    skipped_steps: usize,
    allow_skipped: bool,
    forced_failure: bool,
}

#[derive(Serialize)]
struct JsonGroup<'a> {
    label: &'a str,
    state: &'static str,
    steps: Vec<JsonStep<'a>>,
    #[serde(skip_serializing_if = "is_empty")]
    disposal_failures: &'a [String],
}

#[derive(Serialize)]
struct JsonStep<'a> {
    keyword: &'static str,
    message: &'a str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<&'a str>,
}

impl<'a> From<&'a StepRecord> for JsonStep<'a> {
    fn from(step: &'a StepRecord) -> Self {
        Self {
            keyword: step.keyword().as_str(),
            message: step.message(),
            status: step.status(),
            detail: step.detail(),
        }
    }
}

impl<'a> From<&'a GroupRecord> for JsonGroup<'a> {
    fn from(group: &'a GroupRecord) -> Self {
        Self {
            label: group.label(),
            state: group.state().label(),
            steps: group.steps().iter().map(JsonStep::from).collect(),
            disposal_failures: group.disposal_failures(),
        }
    }
}

impl<'a> From<&'a ScenarioRecord> for JsonScenario<'a> {
    fn from(record: &'a ScenarioRecord) -> Self {
        let (failures, skip): (&[String], _) = match record.status() {
            ScenarioStatus::Passed => (&[], None),
            ScenarioStatus::Failed { failures } => (failures.as_slice(), None),
            ScenarioStatus::Skipped(details) => (
                &[],
                Some(JsonSkip {
                    skipped_steps: details.skipped_steps(),
                    allow_skipped: details.allow_skipped(),
                    forced_failure: details.forced_failure(),
                }),
            ),
        };
        Self {
            source_path: record.source_path(),
            scenario_name: record.scenario_name(),
            line: record.line(),
            tags: record.tags(),
            status: record.status().label(),
            failures,
            skip,
            groups: record.groups().iter().map(JsonGroup::from).collect(),
        }
    }
}

impl<'a> From<&'a [ScenarioRecord]> for JsonReport<'a> {
    fn from(records: &'a [ScenarioRecord]) -> Self {
        Self {
            scenarios: records.iter().map(JsonScenario::from).collect(),
        }
    }
}

/// Serialise `records` into `writer`.
///
/// # Examples
///
/// ```
/// use fluent_bdd::reporting::{ScenarioRecord, ScenarioStatus, json};
///
/// let records = vec![ScenarioRecord::new(
///     "tests/a.rs",
///     "scenario",
///     1,
///     Vec::new(),
///     ScenarioStatus::Passed,
/// )];
/// let mut buffer = Vec::new();
/// json::write(&mut buffer, &records)?;
/// assert!(String::from_utf8_lossy(&buffer).contains("\"status\":\"passed\""));
/// # Ok::<(), serde_json::Error>(())
/// ```
///
/// # Errors
///
/// Returns an error when serialisation or the underlying write fails.
pub fn write<W: Write>(writer: &mut W, records: &[ScenarioRecord]) -> serde_json::Result<()> {
    serde_json::to_writer(writer, &JsonReport::from(records))
}

/// Serialise the collector snapshot into `writer`.
///
/// # Errors
///
/// Returns an error when serialisation or the underlying write fails.
pub fn write_snapshot<W: Write>(writer: &mut W) -> serde_json::Result<()> {
    write(writer, &snapshot())
}

/// Serialise `records` into a string.
///
/// # Errors
///
/// Returns an error when serialisation fails.
pub fn to_string(records: &[ScenarioRecord]) -> serde_json::Result<String> {
    serde_json::to_string(&JsonReport::from(records))
}

/// Serialise the collector snapshot into a string.
///
/// # Errors
///
/// Returns an error when serialisation fails.
pub fn snapshot_string() -> serde_json::Result<String> {
    to_string(&snapshot())
}
