//! Declared steps and the values their bodies produce.
//!
//! A [`Step`] is one Given/When/Then/And/But declaration: a keyword, a
//! message, a body, an isolation flag and an optional skip reason. Steps are
//! immutable once built and cheap to clone; every clone shares the same body,
//! which is why bodies are `Fn` rather than `FnOnce`: a step preceding an
//! isolated step is invoked once per execution group that replays it.

use std::fmt;
use std::panic::Location;
use std::rc::Rc;

use thiserror::Error;

use crate::disposal::Disposable;
use crate::execution::StepFailure;
use crate::keyword::StepKeyword;

/// Shared, re-invocable step body.
pub type StepBody = Rc<dyn Fn() -> Result<StepOutput, StepFailure>>;

/// Disposables produced by one invocation of a step body.
#[derive(Debug, Default)]
#[must_use]
pub struct StepOutput {
    disposables: Vec<Disposable>,
}

impl StepOutput {
    /// Output holding no resources.
    pub fn none() -> Self {
        Self::default()
    }

    /// Output holding a single resource.
    pub fn single(disposable: Disposable) -> Self {
        Self {
            disposables: vec![disposable],
        }
    }

    /// Output holding a collection acquired in enumeration order.
    pub fn many(disposables: impl IntoIterator<Item = Disposable>) -> Self {
        Self {
            disposables: disposables.into_iter().collect(),
        }
    }

    /// Append a resource acquired after those already held.
    pub fn push(&mut self, disposable: Disposable) {
        self.disposables.push(disposable);
    }

    /// Number of held resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.disposables.len()
    }

    /// Whether no resources are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.disposables.is_empty()
    }

    /// Surrender the resources in acquisition order.
    #[must_use]
    pub fn into_disposables(self) -> Vec<Disposable> {
        self.disposables
    }
}

/// Conversion from a step body's return value into a [`StepOutput`].
///
/// Bodies may return `()`, a [`Disposable`], an optional or a collection of
/// disposables, or a `Result` wrapping any of these. An `Err` becomes a
/// [`StepFailure::Returned`] carrying the error's display text.
pub trait IntoStepOutput {
    /// Perform the conversion.
    ///
    /// # Errors
    ///
    /// Returns a [`StepFailure`] when the value represents a failed step.
    fn into_step_output(self) -> Result<StepOutput, StepFailure>;
}

impl IntoStepOutput for () {
    fn into_step_output(self) -> Result<StepOutput, StepFailure> {
        Ok(StepOutput::none())
    }
}

impl IntoStepOutput for StepOutput {
    fn into_step_output(self) -> Result<StepOutput, StepFailure> {
        Ok(self)
    }
}

impl IntoStepOutput for Disposable {
    fn into_step_output(self) -> Result<StepOutput, StepFailure> {
        Ok(StepOutput::single(self))
    }
}

impl IntoStepOutput for Option<Disposable> {
    fn into_step_output(self) -> Result<StepOutput, StepFailure> {
        Ok(StepOutput::many(self))
    }
}

impl IntoStepOutput for Vec<Disposable> {
    fn into_step_output(self) -> Result<StepOutput, StepFailure> {
        Ok(StepOutput::many(self))
    }
}

impl<T, E> IntoStepOutput for Result<T, E>
where
    T: IntoStepOutput,
    E: fmt::Display,
{
    fn into_step_output(self) -> Result<StepOutput, StepFailure> {
        self.map_err(|err| StepFailure::returned(err.to_string()))?
            .into_step_output()
    }
}

/// Wrap a typed closure as a shared [`StepBody`].
pub fn body<F, R>(body: F) -> StepBody
where
    F: Fn() -> R + 'static,
    R: IntoStepOutput,
{
    Rc::new(move || body().into_step_output())
}

/// Precondition violated while declaring a step.
///
/// Raised synchronously at the declaration site; the offending step never
/// enters a scenario context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DeclarationError {
    /// The step message was empty or whitespace.
    #[error("{keyword} step declared with an empty message")]
    EmptyMessage {
        /// Keyword of the rejected step.
        keyword: StepKeyword,
    },
    /// A skipped step was declared without a reason.
    #[error("{keyword} step '{message}' declared as skipped with an empty reason")]
    EmptySkipReason {
        /// Keyword of the rejected step.
        keyword: StepKeyword,
        /// Message of the rejected step.
        message: String,
    },
    /// A step was declared with no scenario bound to the current thread.
    #[error("{keyword} step '{message}' declared outside of a scenario")]
    NoCurrentScenario {
        /// Keyword of the rejected step.
        keyword: StepKeyword,
        /// Message of the rejected step.
        message: String,
    },
    /// A step was declared after the scenario began executing.
    #[error("{keyword} step '{message}' declared after scenario '{scenario}' began executing")]
    ExecutionStarted {
        /// Name of the scenario.
        scenario: String,
        /// Keyword of the rejected step.
        keyword: StepKeyword,
        /// Message of the rejected step.
        message: String,
    },
}

/// One declared step.
///
/// # Examples
///
/// ```
/// use fluent_bdd::{Step, StepKeyword};
///
/// let step = Step::new(StepKeyword::Then, "the total is 3", || assert_eq!(1 + 2, 3))
///     .unwrap_or_else(|err| panic!("{err}"))
///     .isolated();
/// assert!(step.is_isolated());
/// assert_eq!(step.display_name(), "Then the total is 3");
/// assert!(step.invoke().is_ok());
/// ```
#[derive(Clone)]
pub struct Step {
    keyword: StepKeyword,
    message: Rc<str>,
    body: StepBody,
    isolated: bool,
    skip_reason: Option<Rc<str>>,
    location: &'static Location<'static>,
}

impl Step {
    /// Build a step from a typed closure.
    ///
    /// # Errors
    ///
    /// Returns [`DeclarationError::EmptyMessage`] when `message` is empty or
    /// whitespace.
    #[track_caller]
    pub fn new<F, R>(
        keyword: StepKeyword,
        message: impl Into<String>,
        body: F,
    ) -> Result<Self, DeclarationError>
    where
        F: Fn() -> R + 'static,
        R: IntoStepOutput,
    {
        Self::from_body(keyword, message, self::body(body))
    }

    /// Build a step from an already shared body.
    ///
    /// # Errors
    ///
    /// Returns [`DeclarationError::EmptyMessage`] when `message` is empty or
    /// whitespace.
    #[track_caller]
    pub fn from_body(
        keyword: StepKeyword,
        message: impl Into<String>,
        body: StepBody,
    ) -> Result<Self, DeclarationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(DeclarationError::EmptyMessage { keyword });
        }
        Ok(Self {
            keyword,
            message: message.into(),
            body,
            isolated: false,
            skip_reason: None,
            location: Location::caller(),
        })
    }

    /// Mark the step to run in its own execution group.
    #[must_use]
    pub fn isolated(mut self) -> Self {
        self.isolated = true;
        self
    }

    /// Mark the step as skipped for `reason`.
    ///
    /// # Errors
    ///
    /// Returns [`DeclarationError::EmptySkipReason`] when `reason` is empty or
    /// whitespace.
    pub fn skipped(mut self, reason: impl Into<String>) -> Result<Self, DeclarationError> {
        let reason = reason.into();
        if reason.trim().is_empty() {
            return Err(DeclarationError::EmptySkipReason {
                keyword: self.keyword,
                message: self.message.to_string(),
            });
        }
        self.skip_reason = Some(reason.into());
        Ok(self)
    }

    /// The step keyword.
    #[must_use]
    pub const fn keyword(&self) -> StepKeyword {
        self.keyword
    }

    /// The step message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether the step runs in its own execution group.
    #[must_use]
    pub const fn is_isolated(&self) -> bool {
        self.isolated
    }

    /// Reason the step is skipped, if it is.
    #[must_use]
    pub fn skip_reason(&self) -> Option<&str> {
        self.skip_reason.as_deref()
    }

    /// Source location of the declaration.
    #[must_use]
    pub const fn location(&self) -> &'static Location<'static> {
        self.location
    }

    /// Keyword and message, as shown in reports.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.keyword, self.message)
    }

    /// Invoke the body once.
    ///
    /// Panics raised by the body propagate; the executor is responsible for
    /// catching them.
    ///
    /// # Errors
    ///
    /// Returns the [`StepFailure`] produced by the body.
    pub fn invoke(&self) -> Result<StepOutput, StepFailure> {
        (self.body)()
    }

    #[cfg(test)]
    pub(crate) fn shares_body_with(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.body, &other.body)
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("keyword", &self.keyword)
            .field("message", &self.message)
            .field("isolated", &self.isolated)
            .field("skip_reason", &self.skip_reason)
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
