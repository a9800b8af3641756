//! Owned, thread-safe snapshots of scenario outcomes.
//!
//! Reports hold step bodies indirectly and are tied to the declaring thread;
//! records keep only the text a reporter needs, so the collector can share
//! them across threads.

use fluent_bdd_harness::ScenarioMetadata;

use crate::keyword::StepKeyword;
use crate::report::{GroupReport, GroupState, ScenarioReport, StepReport, StepStatus};

/// Recorded outcome of one step, detached from the step's failure type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The body ran and succeeded.
    Passed,
    /// The body failed; carries the rendered failure.
    Failed(String),
    /// The step was declared as skipped; carries the reason.
    Skipped(String),
    /// An earlier step in the group failed.
    NotExecuted,
}

impl StepOutcome {
    /// Lowercase label: `passed`, `failed`, `skipped` or `not-executed`.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed(_) => "failed",
            Self::Skipped(_) => "skipped",
            Self::NotExecuted => "not-executed",
        }
    }

    /// Failure message for failed steps, reason for skipped ones.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Failed(text) | Self::Skipped(text) => Some(text),
            Self::Passed | Self::NotExecuted => None,
        }
    }
}

impl From<&StepStatus> for StepOutcome {
    fn from(status: &StepStatus) -> Self {
        match status {
            StepStatus::Passed => Self::Passed,
            StepStatus::Failed(failure) => Self::Failed(failure.to_string()),
            StepStatus::Skipped { reason } => Self::Skipped(reason.clone()),
            StepStatus::NotExecuted => Self::NotExecuted,
        }
    }
}

/// Outcome of one step in one group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepRecord {
    keyword: StepKeyword,
    message: String,
    outcome: StepOutcome,
}

impl StepRecord {
    /// Record a step and its outcome.
    #[must_use]
    pub fn new(keyword: StepKeyword, message: impl Into<String>, outcome: StepOutcome) -> Self {
        Self {
            keyword,
            message: message.into(),
            outcome,
        }
    }

    /// Step keyword.
    #[must_use]
    pub const fn keyword(&self) -> StepKeyword {
        self.keyword
    }

    /// Step message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Recorded outcome.
    #[must_use]
    pub const fn outcome(&self) -> &StepOutcome {
        &self.outcome
    }

    /// Lowercase label of the outcome.
    #[must_use]
    pub const fn status(&self) -> &'static str {
        self.outcome.label()
    }

    /// Failure message for failed steps, reason for skipped ones.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        self.outcome.detail()
    }
}

impl From<&StepReport> for StepRecord {
    fn from(step: &StepReport) -> Self {
        Self::new(
            step.keyword(),
            step.message(),
            StepOutcome::from(step.status()),
        )
    }
}

/// Outcome of one execution group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupRecord {
    label: String,
    state: GroupState,
    steps: Vec<StepRecord>,
    disposal_failures: Vec<String>,
}

impl GroupRecord {
    /// Record a group.
    #[must_use]
    pub fn new(
        label: impl Into<String>,
        state: GroupState,
        steps: Vec<StepRecord>,
        disposal_failures: Vec<String>,
    ) -> Self {
        Self {
            label: label.into(),
            state,
            steps,
            disposal_failures,
        }
    }

    /// Group label, e.g. `primary`.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Terminal state of the group.
    #[must_use]
    pub const fn state(&self) -> GroupState {
        self.state
    }

    /// Step outcomes in execution order.
    #[must_use]
    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    /// Rendered release failures.
    #[must_use]
    pub fn disposal_failures(&self) -> &[String] {
        &self.disposal_failures
    }
}

impl From<&GroupReport> for GroupRecord {
    fn from(group: &GroupReport) -> Self {
        Self::new(
            group.label(),
            group.state(),
            group.steps().iter().map(StepRecord::from).collect(),
            group
                .disposal_failures()
                .iter()
                .map(ToString::to_string)
                .collect(),
        )
    }
}

/// Outcome recorded for a single scenario execution.
///
/// # Examples
///
/// ```
/// use fluent_bdd::reporting::{ScenarioRecord, ScenarioStatus};
///
/// let record = ScenarioRecord::new(
///     "tests/basket.rs",
///     "an empty basket",
///     3,
///     vec!["@smoke".into()],
///     ScenarioStatus::Passed,
/// );
/// assert_eq!(record.source_path(), "tests/basket.rs");
/// assert_eq!(record.tags(), ["@smoke"]);
/// assert!(record.groups().is_empty());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScenarioRecord {
    source_path: String,
    scenario_name: String,
    line: u32,
    tags: Vec<String>,
    status: ScenarioStatus,
    groups: Vec<GroupRecord>,
}

impl ScenarioRecord {
    /// Construct a record without group details.
    #[must_use]
    pub fn new(
        source_path: impl Into<String>,
        scenario_name: impl Into<String>,
        line: u32,
        tags: impl Into<Vec<String>>,
        status: ScenarioStatus,
    ) -> Self {
        Self {
            source_path: source_path.into(),
            scenario_name: scenario_name.into(),
            line,
            tags: tags.into(),
            status,
            groups: Vec::new(),
        }
    }

    /// Construct a record from harness metadata.
    #[must_use]
    pub fn from_metadata(metadata: &ScenarioMetadata, status: ScenarioStatus) -> Self {
        Self::new(
            metadata.source_path(),
            metadata.scenario_name(),
            metadata.line(),
            metadata.tags(),
            status,
        )
    }

    /// Summarise an executed scenario.
    ///
    /// Failures take precedence over skips; a scenario with any skipped step
    /// and no failure is recorded as skipped.
    #[must_use]
    pub fn from_report(report: &ScenarioReport) -> Self {
        let skipped_steps = report.skipped_steps().count();
        let status = if report.state() == GroupState::Failed {
            ScenarioStatus::Failed {
                failures: report.failures(),
            }
        } else if skipped_steps > 0 {
            ScenarioStatus::Skipped(SkippedScenario::new(
                skipped_steps,
                report.metadata().allows_skipped(),
                report.forced_failure(),
            ))
        } else {
            ScenarioStatus::Passed
        };
        Self::from_metadata(report.metadata(), status)
            .with_groups(report.groups().iter().map(GroupRecord::from).collect())
    }

    /// Attach per-group details.
    #[must_use]
    pub fn with_groups(mut self, groups: Vec<GroupRecord>) -> Self {
        self.groups = groups;
        self
    }

    /// Path of the file declaring the scenario.
    #[must_use]
    pub fn source_path(&self) -> &str {
        &self.source_path
    }

    /// Scenario name.
    #[must_use]
    pub fn scenario_name(&self) -> &str {
        &self.scenario_name
    }

    /// Line of the declaration.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Scenario tags.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Recorded status.
    #[must_use]
    pub const fn status(&self) -> &ScenarioStatus {
        &self.status
    }

    /// Per-group details, empty for records built with [`new`](Self::new).
    #[must_use]
    pub fn groups(&self) -> &[GroupRecord] {
        &self.groups
    }
}

/// Status of a recorded scenario.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScenarioStatus {
    /// Every group passed and no step was skipped.
    Passed,
    /// A step or a release failed.
    Failed {
        /// One line per failed step or release.
        failures: Vec<String>,
    },
    /// At least one step was skipped and nothing failed.
    Skipped(SkippedScenario),
}

impl ScenarioStatus {
    /// Lowercase label for the status.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed { .. } => "failed",
            Self::Skipped(_) => "skipped",
        }
    }

    /// Whether the scenario counts as a failure in reports.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        match self {
            Self::Passed => false,
            Self::Failed { .. } => true,
            Self::Skipped(details) => details.forced_failure,
        }
    }
}

/// Details captured when a scenario skipped steps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedScenario {
    skipped_steps: usize,
    allow_skipped: bool,
    forced_failure: bool,
}

impl SkippedScenario {
    /// Describe a skip.
    #[must_use]
    pub const fn new(skipped_steps: usize, allow_skipped: bool, forced_failure: bool) -> Self {
        Self {
            skipped_steps,
            allow_skipped,
            forced_failure,
        }
    }

    /// Number of skipped step records across all groups.
    #[must_use]
    pub const fn skipped_steps(&self) -> usize {
        self.skipped_steps
    }

    /// Whether the scenario carried the `@allow_skipped` tag.
    #[must_use]
    pub const fn allow_skipped(&self) -> bool {
        self.allow_skipped
    }

    /// Whether the skip failed the run because skips were configured to fail.
    #[must_use]
    pub const fn forced_failure(&self) -> bool {
        self.forced_failure
    }
}
