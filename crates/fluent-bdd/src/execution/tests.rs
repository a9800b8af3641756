//! Unit tests for group execution.

use std::cell::RefCell;
use std::rc::Rc;

use rstest::{fixture, rstest};

use super::*;
use crate::disposal::Disposable;
use crate::keyword::StepKeyword;
use crate::plan::plan;
use crate::report::GroupState;
use crate::step::Step;

type Journal = Rc<RefCell<Vec<String>>>;

#[fixture]
fn journal() -> Journal {
    Rc::default()
}

fn entries(journal: &Journal) -> Vec<String> {
    journal.borrow().clone()
}

/// A step that logs its invocation and returns a resource logging its release.
fn acquiring(journal: &Journal, keyword: StepKeyword, name: &'static str) -> Step {
    let journal = Rc::clone(journal);
    Step::new(keyword, name, move || {
        journal.borrow_mut().push(format!("acquire {name}"));
        let journal = Rc::clone(&journal);
        Disposable::new(move || journal.borrow_mut().push(format!("release {name}")))
    })
    .unwrap_or_else(|err| panic!("{err}"))
}

fn noting(journal: &Journal, keyword: StepKeyword, name: &'static str) -> Step {
    let journal = Rc::clone(journal);
    let note = move || journal.borrow_mut().push(name.to_string());
    Step::new(keyword, name, note).unwrap_or_else(|err| panic!("{err}"))
}

fn statuses(report: &GroupReport) -> Vec<&'static str> {
    report.steps().iter().map(|step| step.status().label()).collect()
}

#[rstest]
fn resources_are_released_in_reverse_acquisition_order(journal: Journal) {
    let steps = [
        acquiring(&journal, StepKeyword::Given, "A"),
        acquiring(&journal, StepKeyword::And, "B"),
        noting(&journal, StepKeyword::When, "act"),
        noting(&journal, StepKeyword::Then, "assert"),
    ];

    let reports = run_plan(&plan(&steps));

    let [report] = reports.as_slice() else {
        panic!("one group expected");
    };
    assert_eq!(report.state(), GroupState::Passed);
    assert_eq!(
        entries(&journal),
        ["acquire A", "acquire B", "act", "assert", "release B", "release A"]
    );
}

#[rstest]
fn panics_halt_the_group_and_still_release(journal: Journal) {
    let steps = [
        acquiring(&journal, StepKeyword::Given, "A"),
        Step::new(StepKeyword::When, "explode", || -> () { panic!("boom") })
            .unwrap_or_else(|err| panic!("{err}")),
        noting(&journal, StepKeyword::Then, "never"),
    ];

    let reports = run_plan(&plan(&steps));

    let [report] = reports.as_slice() else {
        panic!("one group expected");
    };
    assert_eq!(report.state(), GroupState::Failed);
    assert_eq!(statuses(report), ["passed", "failed", "not-executed"]);
    let Some(failed) = report.failed_step() else {
        panic!("a failed step should be recorded");
    };
    assert_eq!(
        failed.status(),
        &StepStatus::Failed(StepFailure::panicked("boom"))
    );
    assert_eq!(entries(&journal), ["acquire A", "release A"]);
}

#[rstest]
fn returned_errors_fail_the_step(journal: Journal) {
    let steps = [
        acquiring(&journal, StepKeyword::Given, "A"),
        Step::new(StepKeyword::Then, "check", || {
            Err::<(), _>("expected 3, got 4")
        })
        .unwrap_or_else(|err| panic!("{err}")),
    ];

    let reports = run_plan(&plan(&steps));

    let Some(report) = reports.first() else {
        panic!("one group expected");
    };
    assert_eq!(
        report.failed_step().map(StepReport::status),
        Some(&StepStatus::Failed(StepFailure::returned(
            "expected 3, got 4"
        )))
    );
    assert_eq!(entries(&journal), ["acquire A", "release A"]);
}

#[rstest]
fn each_isolated_group_replays_and_disposes_its_own_prefix(journal: Journal) {
    let steps = [
        acquiring(&journal, StepKeyword::Given, "A"),
        noting(&journal, StepKeyword::When, "act"),
        noting(&journal, StepKeyword::Then, "assert1"),
        noting(&journal, StepKeyword::Then, "assert2").isolated(),
    ];

    let reports = run_plan(&plan(&steps));

    assert_eq!(reports.len(), 2);
    assert_eq!(
        entries(&journal),
        [
            "acquire A", "act", "assert1", "assert2", "release A",
            "acquire A", "act", "assert1", "release A",
        ]
    );
}

#[rstest]
fn a_failing_isolated_group_leaves_the_others_untouched(journal: Journal) {
    let steps = [
        acquiring(&journal, StepKeyword::Given, "A"),
        Step::new(StepKeyword::Then, "fails alone", || -> () {
            panic!("isolated boom")
        })
        .unwrap_or_else(|err| panic!("{err}"))
        .isolated(),
        noting(&journal, StepKeyword::Then, "passes"),
    ];

    let reports = run_plan(&plan(&steps));

    let [isolated, primary] = reports.as_slice() else {
        panic!("two groups expected");
    };
    assert_eq!(isolated.state(), GroupState::Failed);
    assert_eq!(primary.state(), GroupState::Passed);
    assert_eq!(statuses(primary), ["passed", "passed"]);
}

#[rstest]
fn skipped_steps_never_run(journal: Journal) {
    let skipped = noting(&journal, StepKeyword::Then, "pending")
        .skipped("awaiting fixture data")
        .unwrap_or_else(|err| panic!("{err}"));
    let steps = [noting(&journal, StepKeyword::Given, "g"), skipped];

    let reports = run_plan(&plan(&steps));

    let Some(report) = reports.first() else {
        panic!("one group expected");
    };
    assert_eq!(statuses(report), ["passed", "skipped"]);
    assert_eq!(report.state(), GroupState::Passed);
    assert_eq!(
        report.steps().get(1).and_then(StepReport::skip_reason),
        Some("awaiting fixture data")
    );
    assert_eq!(entries(&journal), ["g"]);
}

#[rstest]
fn skipped_steps_keep_their_reason_after_a_failure(journal: Journal) {
    let failing = Step::new(StepKeyword::Given, "an account", || Err::<(), _>("boom"))
        .unwrap_or_else(|err| panic!("{err}"));
    let skipped = noting(&journal, StepKeyword::Then, "a receipt")
        .skipped("printer offline")
        .unwrap_or_else(|err| panic!("{err}"));
    let steps = [
        failing,
        skipped,
        noting(&journal, StepKeyword::And, "never"),
    ];

    let reports = run_plan(&plan(&steps));

    let Some(report) = reports.first() else {
        panic!("one group expected");
    };
    assert_eq!(statuses(report), ["failed", "skipped", "not-executed"]);
    assert_eq!(
        report.steps().get(1).and_then(StepReport::skip_reason),
        Some("printer offline")
    );
    assert_eq!(report.state(), GroupState::Failed);
    assert!(entries(&journal).is_empty());
}

#[rstest]
fn disposal_failures_fail_the_group_after_all_steps_pass(journal: Journal) {
    let leaky = Step::new(StepKeyword::Given, "a leaky resource", || {
        Disposable::try_new(|| Err::<(), _>("handle already closed"))
    })
    .unwrap_or_else(|err| panic!("{err}"));
    let steps = [acquiring(&journal, StepKeyword::Given, "A"), leaky];

    let reports = run_plan(&plan(&steps));

    let Some(report) = reports.first() else {
        panic!("one group expected");
    };
    assert_eq!(statuses(report), ["passed", "passed"]);
    assert_eq!(report.state(), GroupState::Failed);
    assert_eq!(
        report.disposal_failures(),
        [DisposalFailure::new(1, "handle already closed")]
    );
    assert_eq!(entries(&journal), ["acquire A", "release A"]);
}

#[test]
fn empty_plan_runs_nothing() {
    assert!(run_plan(&plan(&[])).is_empty());
}
