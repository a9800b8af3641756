//! Entry points that declare, plan, execute and record one scenario.

use fluent_bdd_harness::{
    HarnessAdapter, ScenarioMetadata, ScenarioRunRequest, ScenarioRunner, StdHarness,
};

use crate::config;
use crate::context::ScenarioContext;
use crate::execution::run_plan;
use crate::report::ScenarioReport;
use crate::reporting::{self, ScenarioRecord};

/// Run a scenario on the current thread.
///
/// `declare` receives the scenario's context and is also bound as the
/// thread's current scenario, so steps can be declared through either
/// [`Declare`](crate::Declare) or [`StepExt`](crate::StepExt). Once it returns,
/// the steps are planned and executed and the outcome is recorded in the
/// [`reporting`] collector.
///
/// # Examples
///
/// ```
/// use fluent_bdd::{Declare, GroupState, scenario};
///
/// let report = scenario("an empty basket", |s| {
///     s.given("an empty basket", || ())
///         .then("it holds nothing", || ());
/// });
/// assert_eq!(report.state(), GroupState::Passed);
/// ```
///
/// Step failures are reported, not propagated; call
/// [`ScenarioReport::assert_passed`] to fail the surrounding test.
#[track_caller]
pub fn scenario(name: impl Into<String>, declare: impl FnOnce(&ScenarioContext)) -> ScenarioReport {
    run_scenario(&StdHarness::new(), ScenarioMetadata::here(name), declare)
}

/// Run a scenario through `harness` with explicit metadata.
///
/// Tags in `metadata` are honoured when deciding whether skipped steps fail
/// the scenario.
pub fn run_scenario(
    harness: &impl HarnessAdapter,
    metadata: ScenarioMetadata,
    declare: impl FnOnce(&ScenarioContext),
) -> ScenarioReport {
    log::trace!(
        "running scenario '{}' through {}",
        metadata.scenario_name(),
        harness.describe()
    );
    let runner_metadata = metadata.clone();
    let runner = ScenarioRunner::new(move || execute(runner_metadata, declare));
    let report = harness.run(ScenarioRunRequest::new(metadata, runner));
    reporting::record(ScenarioRecord::from_report(&report));
    report
}

fn execute(metadata: ScenarioMetadata, declare: impl FnOnce(&ScenarioContext)) -> ScenarioReport {
    let context = ScenarioContext::new(metadata.scenario_name());
    {
        let _current = context.enter();
        declare(&context);
    }
    let plan = context.plan();
    let groups = run_plan(&plan);
    let report = ScenarioReport::new(metadata, groups, config::fail_on_skipped());
    log::debug!(
        "scenario '{}' finished: {}",
        report.name(),
        if report.is_success() { "ok" } else { "failed" }
    );
    report
}
