//! Runs planned execution groups and records their outcome.
//!
//! Each group owns a fresh [`DisposableChain`]. Steps run in order and skipped
//! steps are recorded with their reason without invoking their body, even
//! after a failure. The first failure halts the group and marks the remaining
//! non-skipped steps as not executed. Whatever happens, the chain is released
//! newest first before the group's report is produced.
//!
//! # Key Components
//!
//! - [`run_group`]: run one group to completion.
//! - [`run_plan`]: run every group of a plan sequentially.
//! - [`StepFailure`] and [`DisposalFailure`]: failures captured in reports.

mod error;

use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::disposal::DisposableChain;
use crate::panic::panic_message;
use crate::plan::{ExecutionGroup, ExecutionPlan, PlannedStep};
use crate::report::{GroupReport, StepReport, StepStatus};

pub use error::{DisposalFailure, StepFailure};

/// Invoke one planned step, converting panics into failures.
fn invoke(planned: &PlannedStep) -> Result<crate::step::StepOutput, StepFailure> {
    catch_unwind(AssertUnwindSafe(|| planned.step().invoke())).unwrap_or_else(|payload| {
        let message = panic_message(&*payload);
        Err(StepFailure::panicked(message))
    })
}

fn step_report(planned: &PlannedStep, status: StepStatus) -> StepReport {
    let step = planned.step();
    StepReport::new(
        planned.declared_index(),
        step.keyword(),
        step.message(),
        status,
    )
}

/// Run every step of `group` and release what it acquired.
///
/// Panics raised by step bodies or releases are caught and recorded; this
/// function only unwinds if the logger itself panics.
#[must_use]
pub fn run_group(group: &ExecutionGroup) -> GroupReport {
    let label = group.label();
    log::debug!("running group {label} with {} step(s)", group.len());
    let mut chain = DisposableChain::new();
    let mut steps = Vec::with_capacity(group.len());
    let mut halted = false;

    for planned in group.steps() {
        let step = planned.step();
        if let Some(reason) = step.skip_reason() {
            log::debug!("{label}: skipping {} ({reason})", step.display_name());
            steps.push(step_report(
                planned,
                StepStatus::Skipped {
                    reason: reason.to_string(),
                },
            ));
            continue;
        }
        if halted {
            steps.push(step_report(planned, StepStatus::NotExecuted));
            continue;
        }
        log::trace!("{label}: invoking {}", step.display_name());
        match invoke(planned) {
            Ok(output) => {
                chain.extend(output.into_disposables());
                steps.push(step_report(planned, StepStatus::Passed));
            }
            Err(failure) => {
                log::warn!("{label}: {} failed: {failure}", step.display_name());
                steps.push(step_report(planned, StepStatus::Failed(failure)));
                halted = true;
            }
        }
    }

    log::trace!("{label}: releasing {} resource(s)", chain.len());
    let disposal_failures = chain.release();
    let report = GroupReport::new(group.kind(), label, steps, disposal_failures);
    let state = report.state().label();
    log::debug!("group {} finished: {state}", report.label());
    report
}

/// Run every group of `plan` in order.
///
/// A failure in one group never prevents later groups from running.
#[must_use]
pub fn run_plan(plan: &ExecutionPlan) -> Vec<GroupReport> {
    plan.iter().map(run_group).collect()
}

#[cfg(test)]
mod tests;
