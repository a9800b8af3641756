//! The fluent declaration API.
//!
//! [`Declare`] is implemented by [`ScenarioContext`] and [`StepHandle`], so a
//! scenario is written as one chain starting from the context:
//!
//! ```
//! use fluent_bdd::{Declare, Disposable, scenario};
//!
//! let report = scenario("closing an account", |s| {
//!     s.given("an open account", || Disposable::new(|| ()))
//!         .when("the owner closes it", || ())
//!         .then("the balance is zero", || ())
//!         .then_in_isolation("the owner is notified", || ())
//!         .but_skip("the audit trail is archived", "archive not wired up yet", || ());
//! });
//! assert_eq!(report.groups().len(), 2);
//! ```
//!
//! [`StepExt`] offers the same family with the message as the receiver,
//! resolving the scenario bound to the current thread.

use std::rc::Rc;

use crate::context::{ScenarioContext, StepHandle};
use crate::disposal::Disposable;
use crate::execution::StepFailure;
use crate::keyword::StepKeyword;
use crate::step::{DeclarationError, IntoStepOutput, Step, StepBody, StepOutput};

enum Mode {
    Run,
    Isolated,
    Skipped(String),
}

#[track_caller]
fn declare(
    context: &ScenarioContext,
    step: Result<Step, DeclarationError>,
    mode: Mode,
) -> StepHandle {
    let step = step.and_then(|step| match mode {
        Mode::Run => Ok(step),
        Mode::Isolated => Ok(step.isolated()),
        Mode::Skipped(reason) => step.skipped(reason),
    });
    match step {
        Ok(step) => context.enqueue(step),
        Err(err) => panic!("{err}"),
    }
}

#[track_caller]
fn declare_fn<F, R>(
    context: &ScenarioContext,
    keyword: StepKeyword,
    message: impl Into<String>,
    body: F,
    mode: Mode,
) -> StepHandle
where
    F: Fn() -> R + 'static,
    R: IntoStepOutput,
{
    declare(context, Step::new(keyword, message, body), mode)
}

/// Arrange through `arrange`, then defer `teardown` until the group ends.
///
/// The teardown is registered only once `arrange` succeeds and is released
/// before anything `arrange` itself returned.
fn with_teardown<F, R, D>(arrange: F, teardown: D) -> StepBody
where
    F: Fn() -> R + 'static,
    R: IntoStepOutput,
    D: Fn() + 'static,
{
    let teardown = Rc::new(teardown);
    Rc::new(move || -> Result<StepOutput, StepFailure> {
        let mut output = arrange().into_step_output()?;
        let teardown = Rc::clone(&teardown);
        output.push(Disposable::new(move || (*teardown)()));
        Ok(output)
    })
}

/// Declaration family shared by everything that knows its scenario.
///
/// Every method validates its arguments immediately and panics at the caller
/// on a violated precondition: an empty message, an empty skip reason, or a
/// scenario that has already begun executing.
pub trait Declare {
    /// The scenario steps are appended to.
    fn scenario_context(&self) -> ScenarioContext;

    /// Declare a step with an explicit keyword.
    #[track_caller]
    fn step<F, R>(&self, keyword: StepKeyword, message: impl Into<String>, body: F) -> StepHandle
    where
        F: Fn() -> R + 'static,
        R: IntoStepOutput,
    {
        let context = self.scenario_context();
        declare_fn(&context, keyword, message, body, Mode::Run)
    }

    /// Declare a `Given` step.
    #[track_caller]
    fn given<F, R>(&self, message: impl Into<String>, body: F) -> StepHandle
    where
        F: Fn() -> R + 'static,
        R: IntoStepOutput,
    {
        let context = self.scenario_context();
        declare_fn(&context, StepKeyword::Given, message, body, Mode::Run)
    }

    /// Declare a `Given` step whose `teardown` runs when its group ends.
    ///
    /// ```
    /// use std::cell::RefCell;
    /// use std::rc::Rc;
    /// use fluent_bdd::{Declare, scenario};
    ///
    /// let log = Rc::new(RefCell::new(Vec::new()));
    /// let (open, close) = (Rc::clone(&log), Rc::clone(&log));
    /// scenario("teardown", |s| {
    ///     s.given_with_teardown(
    ///         "a connection",
    ///         move || open.borrow_mut().push("open"),
    ///         move || close.borrow_mut().push("close"),
    ///     );
    /// })
    /// .assert_passed();
    /// assert_eq!(*log.borrow(), ["open", "close"]);
    /// ```
    #[track_caller]
    fn given_with_teardown<F, R, D>(
        &self,
        message: impl Into<String>,
        arrange: F,
        teardown: D,
    ) -> StepHandle
    where
        F: Fn() -> R + 'static,
        R: IntoStepOutput,
        D: Fn() + 'static,
    {
        let body = with_teardown(arrange, teardown);
        let step = Step::from_body(StepKeyword::Given, message, body);
        declare(&self.scenario_context(), step, Mode::Run)
    }

    /// Declare a `When` step.
    #[track_caller]
    fn when<F, R>(&self, message: impl Into<String>, body: F) -> StepHandle
    where
        F: Fn() -> R + 'static,
        R: IntoStepOutput,
    {
        let context = self.scenario_context();
        declare_fn(&context, StepKeyword::When, message, body, Mode::Run)
    }

    /// Declare a `Then` step.
    #[track_caller]
    fn then<F, R>(&self, message: impl Into<String>, body: F) -> StepHandle
    where
        F: Fn() -> R + 'static,
        R: IntoStepOutput,
    {
        let context = self.scenario_context();
        declare_fn(&context, StepKeyword::Then, message, body, Mode::Run)
    }

    /// Declare a `Then` step verified against a fresh replay of the steps
    /// before it.
    #[track_caller]
    fn then_in_isolation<F, R>(&self, message: impl Into<String>, body: F) -> StepHandle
    where
        F: Fn() -> R + 'static,
        R: IntoStepOutput,
    {
        let context = self.scenario_context();
        declare_fn(&context, StepKeyword::Then, message, body, Mode::Isolated)
    }

    /// Declare a `Then` step that is reported as skipped and never run.
    #[track_caller]
    fn then_skip<F, R>(
        &self,
        message: impl Into<String>,
        reason: impl Into<String>,
        body: F,
    ) -> StepHandle
    where
        F: Fn() -> R + 'static,
        R: IntoStepOutput,
    {
        let mode = Mode::Skipped(reason.into());
        let context = self.scenario_context();
        declare_fn(&context, StepKeyword::Then, message, body, mode)
    }

    /// Declare an `And` step.
    #[track_caller]
    fn and<F, R>(&self, message: impl Into<String>, body: F) -> StepHandle
    where
        F: Fn() -> R + 'static,
        R: IntoStepOutput,
    {
        let context = self.scenario_context();
        declare_fn(&context, StepKeyword::And, message, body, Mode::Run)
    }

    /// Declare an isolated `And` step.
    #[track_caller]
    fn and_in_isolation<F, R>(&self, message: impl Into<String>, body: F) -> StepHandle
    where
        F: Fn() -> R + 'static,
        R: IntoStepOutput,
    {
        let context = self.scenario_context();
        declare_fn(&context, StepKeyword::And, message, body, Mode::Isolated)
    }

    /// Declare a skipped `And` step.
    #[track_caller]
    fn and_skip<F, R>(
        &self,
        message: impl Into<String>,
        reason: impl Into<String>,
        body: F,
    ) -> StepHandle
    where
        F: Fn() -> R + 'static,
        R: IntoStepOutput,
    {
        let mode = Mode::Skipped(reason.into());
        let context = self.scenario_context();
        declare_fn(&context, StepKeyword::And, message, body, mode)
    }

    /// Declare a `But` step.
    #[track_caller]
    fn but<F, R>(&self, message: impl Into<String>, body: F) -> StepHandle
    where
        F: Fn() -> R + 'static,
        R: IntoStepOutput,
    {
        let context = self.scenario_context();
        declare_fn(&context, StepKeyword::But, message, body, Mode::Run)
    }

    /// Declare an isolated `But` step.
    #[track_caller]
    fn but_in_isolation<F, R>(&self, message: impl Into<String>, body: F) -> StepHandle
    where
        F: Fn() -> R + 'static,
        R: IntoStepOutput,
    {
        let context = self.scenario_context();
        declare_fn(&context, StepKeyword::But, message, body, Mode::Isolated)
    }

    /// Declare a skipped `But` step.
    #[track_caller]
    fn but_skip<F, R>(
        &self,
        message: impl Into<String>,
        reason: impl Into<String>,
        body: F,
    ) -> StepHandle
    where
        F: Fn() -> R + 'static,
        R: IntoStepOutput,
    {
        let mode = Mode::Skipped(reason.into());
        let context = self.scenario_context();
        declare_fn(&context, StepKeyword::But, message, body, mode)
    }
}

impl Declare for ScenarioContext {
    fn scenario_context(&self) -> ScenarioContext {
        self.clone()
    }
}

impl Declare for StepHandle {
    fn scenario_context(&self) -> ScenarioContext {
        self.context().clone()
    }
}

#[track_caller]
fn ambient(keyword: StepKeyword, message: &str) -> ScenarioContext {
    ScenarioContext::current().unwrap_or_else(|| {
        panic!(
            "{}",
            DeclarationError::NoCurrentScenario {
                keyword,
                message: message.to_string(),
            }
        )
    })
}

/// Declarations with the step message as the receiver.
///
/// Steps are appended to the scenario bound to the current thread by
/// [`ScenarioContext::enter`], which [`scenario`](crate::scenario) does for the
/// duration of its declaration closure.
///
/// ```
/// use fluent_bdd::{StepExt, scenario};
///
/// let report = scenario("calculator", |_| {
///     "a calculator".given(|| ());
///     "adding 1 and 2".when(|| ());
///     "the result is 3".then(|| assert_eq!(1 + 2, 3));
/// });
/// report.assert_passed();
/// ```
///
/// # Panics
///
/// Every method panics at the caller when no scenario is bound, or on the same
/// preconditions as [`Declare`].
pub trait StepExt {
    /// Declare a `Given` step.
    #[track_caller]
    fn given<F, R>(&self, body: F) -> StepHandle
    where
        F: Fn() -> R + 'static,
        R: IntoStepOutput;

    /// Declare a `Given` step whose `teardown` runs when its group ends.
    #[track_caller]
    fn given_with_teardown<F, R, D>(&self, arrange: F, teardown: D) -> StepHandle
    where
        F: Fn() -> R + 'static,
        R: IntoStepOutput,
        D: Fn() + 'static;

    /// Declare a `When` step.
    #[track_caller]
    fn when<F, R>(&self, body: F) -> StepHandle
    where
        F: Fn() -> R + 'static,
        R: IntoStepOutput;

    /// Declare a `Then` step.
    #[track_caller]
    fn then<F, R>(&self, body: F) -> StepHandle
    where
        F: Fn() -> R + 'static,
        R: IntoStepOutput;

    /// Declare an isolated `Then` step.
    #[track_caller]
    fn then_in_isolation<F, R>(&self, body: F) -> StepHandle
    where
        F: Fn() -> R + 'static,
        R: IntoStepOutput;

    /// Declare a skipped `Then` step.
    #[track_caller]
    fn then_skip<F, R>(&self, reason: impl Into<String>, body: F) -> StepHandle
    where
        F: Fn() -> R + 'static,
        R: IntoStepOutput;

    /// Declare an `And` step.
    #[track_caller]
    fn and<F, R>(&self, body: F) -> StepHandle
    where
        F: Fn() -> R + 'static,
        R: IntoStepOutput;

    /// Declare an isolated `And` step.
    #[track_caller]
    fn and_in_isolation<F, R>(&self, body: F) -> StepHandle
    where
        F: Fn() -> R + 'static,
        R: IntoStepOutput;

    /// Declare a skipped `And` step.
    #[track_caller]
    fn and_skip<F, R>(&self, reason: impl Into<String>, body: F) -> StepHandle
    where
        F: Fn() -> R + 'static,
        R: IntoStepOutput;

    /// Declare a `But` step.
    #[track_caller]
    fn but<F, R>(&self, body: F) -> StepHandle
    where
        F: Fn() -> R + 'static,
        R: IntoStepOutput;

    /// Declare an isolated `But` step.
    #[track_caller]
    fn but_in_isolation<F, R>(&self, body: F) -> StepHandle
    where
        F: Fn() -> R + 'static,
        R: IntoStepOutput;

    /// Declare a skipped `But` step.
    #[track_caller]
    fn but_skip<F, R>(&self, reason: impl Into<String>, body: F) -> StepHandle
    where
        F: Fn() -> R + 'static,
        R: IntoStepOutput;
}

impl StepExt for str {
    #[track_caller]
    fn given<F, R>(&self, body: F) -> StepHandle
    where
        F: Fn() -> R + 'static,
        R: IntoStepOutput,
    {
        ambient(StepKeyword::Given, self).given(self, body)
    }

    #[track_caller]
    fn given_with_teardown<F, R, D>(&self, arrange: F, teardown: D) -> StepHandle
    where
        F: Fn() -> R + 'static,
        R: IntoStepOutput,
        D: Fn() + 'static,
    {
        ambient(StepKeyword::Given, self)
            .given_with_teardown(self, arrange, teardown)
    }

    #[track_caller]
    fn when<F, R>(&self, body: F) -> StepHandle
    where
        F: Fn() -> R + 'static,
        R: IntoStepOutput,
    {
        ambient(StepKeyword::When, self).when(self, body)
    }

    #[track_caller]
    fn then<F, R>(&self, body: F) -> StepHandle
    where
        F: Fn() -> R + 'static,
        R: IntoStepOutput,
    {
        ambient(StepKeyword::Then, self).then(self, body)
    }

    #[track_caller]
    fn then_in_isolation<F, R>(&self, body: F) -> StepHandle
    where
        F: Fn() -> R + 'static,
        R: IntoStepOutput,
    {
        ambient(StepKeyword::Then, self)
            .then_in_isolation(self, body)
    }

    #[track_caller]
    fn then_skip<F, R>(&self, reason: impl Into<String>, body: F) -> StepHandle
    where
        F: Fn() -> R + 'static,
        R: IntoStepOutput,
    {
        ambient(StepKeyword::Then, self)
            .then_skip(self, reason, body)
    }

    #[track_caller]
    fn and<F, R>(&self, body: F) -> StepHandle
    where
        F: Fn() -> R + 'static,
        R: IntoStepOutput,
    {
        ambient(StepKeyword::And, self).and(self, body)
    }

    #[track_caller]
    fn and_in_isolation<F, R>(&self, body: F) -> StepHandle
    where
        F: Fn() -> R + 'static,
        R: IntoStepOutput,
    {
        ambient(StepKeyword::And, self).and_in_isolation(self, body)
    }

    #[track_caller]
    fn and_skip<F, R>(&self, reason: impl Into<String>, body: F) -> StepHandle
    where
        F: Fn() -> R + 'static,
        R: IntoStepOutput,
    {
        ambient(StepKeyword::And, self).and_skip(self, reason, body)
    }

    #[track_caller]
    fn but<F, R>(&self, body: F) -> StepHandle
    where
        F: Fn() -> R + 'static,
        R: IntoStepOutput,
    {
        ambient(StepKeyword::But, self).but(self, body)
    }

    #[track_caller]
    fn but_in_isolation<F, R>(&self, body: F) -> StepHandle
    where
        F: Fn() -> R + 'static,
        R: IntoStepOutput,
    {
        ambient(StepKeyword::But, self).but_in_isolation(self, body)
    }

    #[track_caller]
    fn but_skip<F, R>(&self, reason: impl Into<String>, body: F) -> StepHandle
    where
        F: Fn() -> R + 'static,
        R: IntoStepOutput,
    {
        ambient(StepKeyword::But, self).but_skip(self, reason, body)
    }
}

#[cfg(test)]
mod tests;
