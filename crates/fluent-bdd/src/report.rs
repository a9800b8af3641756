//! Per-step, per-group and per-scenario results handed to the host runner.

use std::fmt::Write as _;

use fluent_bdd_harness::ScenarioMetadata;
use thiserror::Error;

use crate::execution::{DisposalFailure, StepFailure};
use crate::keyword::StepKeyword;
use crate::plan::GroupKind;

/// Result of one step within one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    /// The body ran to completion.
    Passed,
    /// The body failed; later steps in the group did not run.
    Failed(StepFailure),
    /// The step was declared skipped and its body never ran.
    Skipped {
        /// Reason given at declaration.
        reason: String,
    },
    /// An earlier step in the same group failed.
    NotExecuted,
}

impl StepStatus {
    /// Lowercase label for reports.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed(_) => "failed",
            Self::Skipped { .. } => "skipped",
            Self::NotExecuted => "not-executed",
        }
    }
}

/// Result of one step within one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    declared_index: usize,
    keyword: StepKeyword,
    message: String,
    status: StepStatus,
}

impl StepReport {
    /// Record the status of the step declared at `declared_index`.
    #[must_use]
    pub fn new(
        declared_index: usize,
        keyword: StepKeyword,
        message: impl Into<String>,
        status: StepStatus,
    ) -> Self {
        Self {
            declared_index,
            keyword,
            message: message.into(),
            status,
        }
    }

    /// Zero-based declaration index of the step.
    #[must_use]
    pub const fn declared_index(&self) -> usize {
        self.declared_index
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

    /// Recorded status.
    #[must_use]
    pub const fn status(&self) -> &StepStatus {
        &self.status
    }

    /// Skip reason when the step was skipped.
    #[must_use]
    pub fn skip_reason(&self) -> Option<&str> {
        match &self.status {
            StepStatus::Skipped { reason } => Some(reason),
            _ => None,
        }
    }

    /// Keyword and message, as shown in reports.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.keyword, self.message)
    }
}

/// Terminal state of one execution group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupState {
    /// Every executed step passed and every release succeeded.
    Passed,
    /// A step or a release failed.
    Failed,
    /// No step ran because every step was skipped.
    Skipped,
}

impl GroupState {
    /// Lowercase label for reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

/// Result of running one execution group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupReport {
    kind: GroupKind,
    label: String,
    steps: Vec<StepReport>,
    disposal_failures: Vec<DisposalFailure>,
    state: GroupState,
}

impl GroupReport {
    /// Assemble a report, deriving the group's terminal state.
    #[must_use]
    pub fn new(
        kind: GroupKind,
        label: impl Into<String>,
        steps: Vec<StepReport>,
        disposal_failures: Vec<DisposalFailure>,
    ) -> Self {
        let state = derive_state(&steps, &disposal_failures);
        Self {
            kind,
            label: label.into(),
            steps,
            disposal_failures,
            state,
        }
    }

    /// Kind of the group that ran.
    #[must_use]
    pub const fn kind(&self) -> GroupKind {
        self.kind
    }

    /// Label of the group that ran.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Per-step results in execution order.
    #[must_use]
    pub fn steps(&self) -> &[StepReport] {
        &self.steps
    }

    /// Releases that failed, in release order.
    #[must_use]
    pub fn disposal_failures(&self) -> &[DisposalFailure] {
        &self.disposal_failures
    }

    /// Terminal state.
    #[must_use]
    pub const fn state(&self) -> GroupState {
        self.state
    }

    /// The step that halted the group, if any.
    #[must_use]
    pub fn failed_step(&self) -> Option<&StepReport> {
        self.steps
            .iter()
            .find(|step| matches!(step.status, StepStatus::Failed(_)))
    }
}

fn derive_state(steps: &[StepReport], disposal_failures: &[DisposalFailure]) -> GroupState {
    let failed = steps
        .iter()
        .any(|step| matches!(step.status, StepStatus::Failed(_)));
    if failed || !disposal_failures.is_empty() {
        return GroupState::Failed;
    }
    let all_skipped = !steps.is_empty()
        && steps
            .iter()
            .all(|step| matches!(step.status, StepStatus::Skipped { .. }));
    if all_skipped {
        GroupState::Skipped
    } else {
        GroupState::Passed
    }
}

/// Result of running every group of one scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioReport {
    metadata: ScenarioMetadata,
    groups: Vec<GroupReport>,
    fail_on_skipped: bool,
}

impl ScenarioReport {
    /// Assemble a scenario report.
    ///
    /// When `fail_on_skipped` is set, skipped steps fail the scenario unless
    /// its metadata allows skipping.
    #[must_use]
    pub fn new(
        metadata: ScenarioMetadata,
        groups: Vec<GroupReport>,
        fail_on_skipped: bool,
    ) -> Self {
        Self {
            metadata,
            groups,
            fail_on_skipped,
        }
    }

    /// Scenario metadata.
    #[must_use]
    pub fn metadata(&self) -> &ScenarioMetadata {
        &self.metadata
    }

    /// Scenario name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.metadata.scenario_name()
    }

    /// Group results in execution order.
    #[must_use]
    pub fn groups(&self) -> &[GroupReport] {
        &self.groups
    }

    /// Aggregate state: failed if any group failed, skipped if every group
    /// skipped, passed otherwise.
    #[must_use]
    pub fn state(&self) -> GroupState {
        if self
            .groups
            .iter()
            .any(|group| group.state == GroupState::Failed)
        {
            GroupState::Failed
        } else if !self.groups.is_empty()
            && self
                .groups
                .iter()
                .all(|group| group.state == GroupState::Skipped)
        {
            GroupState::Skipped
        } else {
            GroupState::Passed
        }
    }

    /// Failed steps paired with the group they ran in.
    pub fn failed_steps(&self) -> impl Iterator<Item = (&GroupReport, &StepReport)> {
        self.groups
            .iter()
            .filter_map(|group| group.failed_step().map(|step| (group, step)))
    }

    /// Failed releases paired with the group they belonged to.
    pub fn disposal_failures(&self) -> impl Iterator<Item = (&GroupReport, &DisposalFailure)> {
        self.groups.iter().flat_map(|group| {
            group
                .disposal_failures
                .iter()
                .map(move |failure| (group, failure))
        })
    }

    /// One line per failed step and failed release, prefixed with the group
    /// label.
    #[must_use]
    pub fn failures(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .failed_steps()
            .filter_map(|(group, step)| match &step.status {
                StepStatus::Failed(failure) => Some(format!(
                    "[{}] {}: {failure}",
                    group.label,
                    step.display_name()
                )),
                _ => None,
            })
            .collect();
        lines.extend(
            self.disposal_failures()
                .map(|(group, failure)| format!("[{}] {failure}", group.label)),
        );
        lines
    }

    /// Skipped steps paired with the group they were recorded in.
    pub fn skipped_steps(&self) -> impl Iterator<Item = (&GroupReport, &StepReport)> {
        self.groups.iter().flat_map(|group| {
            group
                .steps
                .iter()
                .filter(|step| step.skip_reason().is_some())
                .map(move |step| (group, step))
        })
    }

    /// Whether skipped steps fail this scenario under the current
    /// configuration.
    #[must_use]
    pub fn forced_failure(&self) -> bool {
        self.fail_on_skipped
            && !self.metadata.allows_skipped()
            && self.skipped_steps().next().is_some()
    }

    /// Whether the scenario should be reported as successful.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.state() != GroupState::Failed && !self.forced_failure()
    }

    /// Convert into a `Result` suitable for returning from a test.
    ///
    /// # Errors
    ///
    /// Returns a [`ScenarioFailure`] listing every failed step and release,
    /// and any skips that failed the run.
    pub fn into_result(self) -> Result<Self, ScenarioFailure> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ScenarioFailure::from_report(&self))
        }
    }

    /// Panic with the failure summary unless the scenario succeeded.
    ///
    /// # Panics
    ///
    /// Panics when [`is_success`](Self::is_success) is `false`.
    #[track_caller]
    pub fn assert_passed(&self) {
        if !self.is_success() {
            panic!("{}", ScenarioFailure::from_report(self));
        }
    }
}

/// Summary of everything that went wrong in one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("scenario '{scenario}' failed:{}", render_problems(.problems))]
pub struct ScenarioFailure {
    scenario: String,
    problems: Vec<String>,
}

impl ScenarioFailure {
    fn from_report(report: &ScenarioReport) -> Self {
        let mut problems = report.failures();
        if report.forced_failure() {
            problems.extend(report.skipped_steps().map(|(group, step)| {
                format!(
                    "[{}] {} was skipped while skips fail the run: {}",
                    group.label,
                    step.display_name(),
                    step.skip_reason().unwrap_or_default()
                )
            }));
        }
        Self {
            scenario: report.name().to_string(),
            problems,
        }
    }

    /// Name of the failed scenario.
    #[must_use]
    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    /// One line per failed step, failed release, or disallowed skip.
    #[must_use]
    pub fn problems(&self) -> &[String] {
        &self.problems
    }
}

fn render_problems(problems: &[String]) -> String {
    problems.iter().fold(String::new(), |mut out, problem| {
        let _ = write!(out, "\n  - {problem}");
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(index: usize, status: StepStatus) -> StepReport {
        StepReport::new(index, StepKeyword::Then, format!("step {index}"), status)
    }

    fn skipped(index: usize) -> StepReport {
        step(
            index,
            StepStatus::Skipped {
                reason: "pending".into(),
            },
        )
    }

    #[test]
    fn group_state_reflects_steps_and_disposals() {
        let passed = GroupReport::new(
            GroupKind::Primary,
            "primary",
            vec![step(0, StepStatus::Passed)],
            vec![],
        );
        assert_eq!(passed.state(), GroupState::Passed);

        let failed = GroupReport::new(
            GroupKind::Primary,
            "primary",
            vec![
                step(0, StepStatus::Failed(StepFailure::panicked("boom"))),
                step(1, StepStatus::NotExecuted),
            ],
            vec![],
        );
        assert_eq!(failed.state(), GroupState::Failed);
        let failed_index = failed.failed_step().map(StepReport::declared_index);
        assert_eq!(failed_index, Some(0));

        let leaky = GroupReport::new(
            GroupKind::Primary,
            "primary",
            vec![step(0, StepStatus::Passed)],
            vec![DisposalFailure::new(0, "close failed")],
        );
        assert_eq!(leaky.state(), GroupState::Failed);

        let all_skipped = GroupReport::new(
            GroupKind::Primary,
            "primary",
            vec![skipped(0), skipped(1)],
            vec![],
        );
        assert_eq!(all_skipped.state(), GroupState::Skipped);

        let partly_skipped = GroupReport::new(
            GroupKind::Primary,
            "primary",
            vec![step(0, StepStatus::Passed), skipped(1)],
            vec![],
        );
        assert_eq!(partly_skipped.state(), GroupState::Passed);
    }

    #[test]
    fn failure_summary_lists_steps_and_disposals() {
        let group = GroupReport::new(
            GroupKind::Isolated { ordinal: 1 },
            "isolated #1 (Then step 1)",
            vec![
                step(0, StepStatus::Passed),
                step(1, StepStatus::Failed(StepFailure::returned("mismatch"))),
            ],
            vec![DisposalFailure::new(0, "already closed")],
        );
        let metadata = ScenarioMetadata::new("accounts", "tests/a.rs", 1, vec![]);
        let report = ScenarioReport::new(metadata, vec![group], false);

        let Err(failure) = report.into_result() else {
            panic!("a failed group should fail the scenario");
        };
        assert_eq!(failure.scenario(), "accounts");
        assert_eq!(
            failure.to_string(),
            "scenario 'accounts' failed:\n  \
             - [isolated #1 (Then step 1)] Then step 1: step returned an error: mismatch\n  \
             - [isolated #1 (Then step 1)] disposal of resource #0 failed: already closed"
        );
    }

    #[test]
    fn skips_fail_only_when_configured_and_not_allowed() {
        let groups = vec![GroupReport::new(
            GroupKind::Primary,
            "primary",
            vec![step(0, StepStatus::Passed), skipped(1)],
            vec![],
        )];
        let lenient = ScenarioReport::new(ScenarioMetadata::default(), groups.clone(), false);
        assert!(lenient.is_success());

        let strict = ScenarioReport::new(ScenarioMetadata::default(), groups.clone(), true);
        assert!(strict.forced_failure());
        let Err(failure) = strict.into_result() else {
            panic!("skips should fail a strict run");
        };
        assert_eq!(failure.problems().len(), 1);

        let allowed = ScenarioReport::new(
            ScenarioMetadata::default().with_tag(fluent_bdd_harness::ALLOW_SKIPPED_TAG),
            groups,
            true,
        );
        assert!(allowed.is_success());
    }

    #[test]
    #[should_panic(expected = "scenario '<unnamed>' failed")]
    fn assert_passed_panics_with_summary() {
        let group = GroupReport::new(
            GroupKind::Primary,
            "primary",
            vec![step(0, StepStatus::Failed(StepFailure::panicked("boom")))],
            vec![],
        );
        ScenarioReport::new(ScenarioMetadata::default(), vec![group], false)
            .assert_passed();
    }
}
