//! Unit tests for step construction and body output conversion.

use super::*;
use rstest::rstest;
use std::cell::Cell;

fn output_len(value: impl IntoStepOutput) -> usize {
    match value.into_step_output() {
        Ok(output) => output.len(),
        Err(failure) => panic!("conversion should succeed: {failure}"),
    }
}

#[test]
fn unit_and_collections_convert_to_outputs() {
    assert_eq!(output_len(()), 0);
    assert_eq!(output_len(Disposable::noop()), 1);
    assert_eq!(output_len(None::<Disposable>), 0);
    assert_eq!(output_len(Some(Disposable::noop())), 1);
    assert_eq!(
        output_len(vec![
            Disposable::noop(),
            Disposable::noop(),
            Disposable::noop(),
        ]),
        3
    );
    assert_eq!(output_len(Ok::<_, String>(Disposable::noop())), 1);
}

#[test]
fn err_results_become_returned_failures() {
    let result: Result<(), &str> = Err("disk full");
    let Err(failure) = result.into_step_output() else {
        panic!("an Err should convert into a failure");
    };
    assert_eq!(failure, StepFailure::returned("disk full"));
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("\t\n")]
fn blank_messages_are_rejected(#[case] message: &str) {
    let result = Step::new(StepKeyword::Given, message, || ());
    assert!(matches!(
        result,
        Err(DeclarationError::EmptyMessage {
            keyword: StepKeyword::Given
        })
    ));
}

#[test]
fn blank_skip_reasons_are_rejected() {
    let Ok(step) = Step::new(StepKeyword::Then, "the total is 3", || ()) else {
        panic!("valid step should build");
    };
    let Err(err) = step.skipped(" ") else {
        panic!("blank reason should be rejected");
    };
    assert_eq!(
        err.to_string(),
        "Then step 'the total is 3' declared as skipped with an empty reason"
    );
}

#[test]
fn builders_set_isolation_and_skip_reason() {
    let Ok(step) = Step::new(StepKeyword::And, "the log is empty", || ()) else {
        panic!("valid step should build");
    };
    assert!(!step.is_isolated());
    assert_eq!(step.skip_reason(), None);

    let Ok(skipped) = step.isolated().skipped("flaky on CI") else {
        panic!("valid reason should be accepted");
    };
    assert!(skipped.is_isolated());
    assert_eq!(skipped.skip_reason(), Some("flaky on CI"));
    assert_eq!(skipped.keyword(), StepKeyword::And);
    assert_eq!(skipped.message(), "the log is empty");
}

#[test]
fn location_points_at_the_declaration() {
    let Ok(step) = Step::new(StepKeyword::When, "located", || ()) else {
        panic!("valid step should build");
    };
    assert_eq!(step.location().file(), file!());
}

#[test]
fn clones_share_a_body_that_runs_on_every_invoke() {
    let calls = Rc::new(Cell::new(0_u32));
    let seen = Rc::clone(&calls);
    let Ok(step) = Step::new(StepKeyword::Given, "a counter", move || {
        seen.set(seen.get() + 1);
    }) else {
        panic!("valid step should build");
    };
    let copy = step.clone();
    assert!(copy.shares_body_with(&step));

    assert!(step.invoke().is_ok());
    assert!(copy.invoke().is_ok());
    assert_eq!(calls.get(), 2);
}
