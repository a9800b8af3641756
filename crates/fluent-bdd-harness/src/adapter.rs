//! The seam between scenario execution and the host test runner.

use crate::runner::ScenarioRunRequest;

/// Executes one scenario's runner in whatever environment a host needs.
///
/// An adapter receives the scenario's metadata and a runner that declares,
/// plans and executes every step. It may wrap the call with thread-local
/// setup, a runtime, or a timeout; the engine imposes no timeout of its own.
/// The runner must be invoked at most once and its value returned unchanged.
///
/// # Examples
///
/// ```
/// use fluent_bdd_harness::{HarnessAdapter, ScenarioMetadata, ScenarioRunRequest, ScenarioRunner};
///
/// struct Announcing;
///
/// impl HarnessAdapter for Announcing {
///     fn run<T>(&self, request: ScenarioRunRequest<'_, T>) -> T {
///         assert_eq!(request.metadata().scenario_name(), "adding numbers");
///         request.run()
///     }
/// }
///
/// let request = ScenarioRunRequest::new(
///     ScenarioMetadata::new("adding numbers", "tests/calculator.rs", 3, vec![]),
///     ScenarioRunner::new(|| 5 + 5),
/// );
/// assert_eq!(Announcing.run(request), 10);
/// assert!(Announcing.describe().ends_with("Announcing"));
/// ```
pub trait HarnessAdapter {
    /// Run `request` and return what its runner produced.
    fn run<T>(&self, request: ScenarioRunRequest<'_, T>) -> T;

    /// Name used when logging which adapter ran a scenario.
    fn describe(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
