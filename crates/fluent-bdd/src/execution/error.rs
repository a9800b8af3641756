//! Failure types captured while executing a group.

use thiserror::Error;

/// Failure raised by a step body.
///
/// Captured per step; it halts the remaining steps of the owning group only.
///
/// # Examples
///
/// ```
/// use fluent_bdd::StepFailure;
///
/// let failure = StepFailure::returned("connection refused");
/// assert_eq!(failure.message(), "connection refused");
/// assert!(!failure.is_panic());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum StepFailure {
    /// The body returned an error.
    #[error("step returned an error: {0}")]
    Returned(String),
    /// The body panicked, typically from a failed assertion.
    #[error("step panicked: {0}")]
    Panicked(String),
}

impl StepFailure {
    /// Failure for an error value returned by a body.
    #[must_use]
    pub fn returned(message: impl Into<String>) -> Self {
        Self::Returned(message.into())
    }

    /// Failure for a panic unwinding out of a body.
    #[must_use]
    pub fn panicked(message: impl Into<String>) -> Self {
        Self::Panicked(message.into())
    }

    /// The underlying message without the failure-kind prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Returned(message) | Self::Panicked(message) => message,
        }
    }

    /// Whether the failure came from a panic.
    #[must_use]
    pub fn is_panic(&self) -> bool {
        matches!(self, Self::Panicked(_))
    }
}

/// Failure raised while releasing one disposable.
///
/// Recorded alongside, never instead of, any step failure in the same group.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("disposal of resource #{position} failed: {message}")]
pub struct DisposalFailure {
    position: usize,
    message: String,
}

impl DisposalFailure {
    /// Create a failure for the resource acquired at `position`.
    #[must_use]
    pub fn new(position: usize, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }

    /// Zero-based acquisition position of the resource within its group.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Message produced by the failed release.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}
