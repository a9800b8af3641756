//! Default synchronous harness implementation.

use crate::adapter::HarnessAdapter;
use crate::runner::ScenarioRunRequest;

/// Runs the scenario on the calling thread with no extra environment.
///
/// Scenario declaration and execution are strictly sequential, so the runner
/// is invoked exactly once and its result returned unchanged. Panics escaping
/// the runner propagate to the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdHarness;

impl StdHarness {
    /// Creates a new synchronous harness.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl HarnessAdapter for StdHarness {
    fn run<T>(&self, request: ScenarioRunRequest<'_, T>) -> T {
        request.run()
    }
}

#[cfg(test)]
mod tests {
    use super::StdHarness;
    use crate::{HarnessAdapter, ScenarioMetadata, ScenarioRunRequest, ScenarioRunner};

    #[test]
    fn std_harness_runs_request() {
        let request = ScenarioRunRequest::new(
            ScenarioMetadata::new("doubling", "tests/simple.rs", 4, vec!["@sync".to_string()]),
            ScenarioRunner::new(|| 21 * 2),
        );
        assert_eq!(StdHarness::new().run(request), 42);
    }
}
