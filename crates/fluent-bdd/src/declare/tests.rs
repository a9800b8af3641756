//! Tests for the explicit and ambient declaration layers.

use super::*;
use rstest::{fixture, rstest};

#[fixture]
fn ctx() -> ScenarioContext {
    ScenarioContext::new("declarations")
}

fn summary(ctx: &ScenarioContext) -> Vec<(StepKeyword, String, bool, Option<String>)> {
    ctx.steps()
        .iter()
        .map(|step| {
            (
                step.keyword(),
                step.message().to_string(),
                step.is_isolated(),
                step.skip_reason().map(str::to_string),
            )
        })
        .collect()
}

#[rstest]
fn chained_declarations_append_in_order(ctx: ScenarioContext) {
    let last = ctx
        .given("g", || ())
        .when("w", || ())
        .then("t", || ())
        .then_in_isolation("ti", || ())
        .then_skip("ts", "later", || ())
        .and("a", || ())
        .and_in_isolation("ai", || ())
        .and_skip("as", "later", || ())
        .but("b", || ())
        .but_in_isolation("bi", || ())
        .but_skip("bs", "later", || ())
        .step(StepKeyword::Given, "explicit", || ());

    assert_eq!(last.index(), 11);
    let skip = Some(String::from("later"));
    assert_eq!(
        summary(&ctx),
        [
            (StepKeyword::Given, String::from("g"), false, None),
            (StepKeyword::When, String::from("w"), false, None),
            (StepKeyword::Then, String::from("t"), false, None),
            (StepKeyword::Then, String::from("ti"), true, None),
            (StepKeyword::Then, String::from("ts"), false, skip.clone()),
            (StepKeyword::And, String::from("a"), false, None),
            (StepKeyword::And, String::from("ai"), true, None),
            (StepKeyword::And, String::from("as"), false, skip.clone()),
            (StepKeyword::But, String::from("b"), false, None),
            (StepKeyword::But, String::from("bi"), true, None),
            (StepKeyword::But, String::from("bs"), false, skip),
            (StepKeyword::Given, String::from("explicit"), false, None),
        ]
    );
}

#[rstest]
#[should_panic(expected = "Given step declared with an empty message")]
fn empty_messages_panic_at_declaration(ctx: ScenarioContext) {
    ctx.given("  ", || ());
}

#[rstest]
#[should_panic(expected = "declared as skipped with an empty reason")]
fn empty_skip_reasons_panic_at_declaration(ctx: ScenarioContext) {
    ctx.given("g", || ()).then_skip("t", "", || ());
}

#[rstest]
fn rejected_steps_never_enter_the_context(ctx: ScenarioContext) {
    let attempt = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        ctx.when("", || ());
    }));
    assert!(attempt.is_err());
    assert!(ctx.is_empty());
}

#[rstest]
fn declarations_record_the_caller_location(ctx: ScenarioContext) {
    ctx.given("located", || ());
    let steps = ctx.steps();
    let Some(step) = steps.first() else {
        panic!("one step declared");
    };
    assert_eq!(step.location().file(), file!());
}

#[rstest]
fn teardown_runs_after_arrange_outputs_are_pushed(ctx: ScenarioContext) {
    let journal = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    let (arrange, inner, teardown) = (
        std::rc::Rc::clone(&journal),
        std::rc::Rc::clone(&journal),
        std::rc::Rc::clone(&journal),
    );
    ctx.given_with_teardown(
        "a resource with teardown",
        move || {
            arrange.borrow_mut().push("arrange");
            let inner = std::rc::Rc::clone(&inner);
            Disposable::new(move || inner.borrow_mut().push("release returned"))
        },
        move || teardown.borrow_mut().push("teardown"),
    );

    let steps = ctx.steps();
    let Some(step) = steps.first() else {
        panic!("one step declared");
    };
    let output = step.invoke().unwrap_or_else(|failure| panic!("{failure}"));
    let mut chain = crate::disposal::DisposableChain::new();
    chain.extend(output.into_disposables());
    assert!(chain.release().is_empty());

    assert_eq!(
        *journal.borrow(),
        ["arrange", "teardown", "release returned"]
    );
}

#[rstest]
fn teardown_is_not_registered_when_arrange_fails(ctx: ScenarioContext) {
    let torn_down = std::rc::Rc::new(std::cell::Cell::new(false));
    let flag = std::rc::Rc::clone(&torn_down);
    ctx.given_with_teardown(
        "a failing arrangement",
        || Err::<(), _>("no database"),
        move || flag.set(true),
    );

    let steps = ctx.steps();
    let Some(step) = steps.first() else {
        panic!("one step declared");
    };
    let Err(failure) = step.invoke() else {
        panic!("arrange failure should propagate");
    };
    assert_eq!(failure, StepFailure::returned("no database"));
    assert!(!torn_down.get());
}

#[test]
fn string_receivers_use_the_bound_scenario() {
    let ctx = ScenarioContext::new("ambient");
    {
        let _guard = ctx.enter();
        "a calculator".given(|| ());
        "adding".when(|| ()).then("the sum is shown", || ());
        "the history".and_in_isolation(|| ());
        "the memory".but_skip("not implemented", || ());
    }

    let messages: Vec<_> = summary(&ctx).into_iter().map(|(_, m, _, _)| m).collect();
    assert_eq!(
        messages,
        ["a calculator", "adding", "the sum is shown", "the history", "the memory"]
    );
}

#[test]
#[should_panic(expected = "Then step 'orphan' declared outside of a scenario")]
fn string_receivers_panic_without_a_bound_scenario() {
    "orphan".then(|| ());
}
