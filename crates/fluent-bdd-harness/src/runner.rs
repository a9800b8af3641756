//! Scenario metadata and the runner closure handed to harnesses.

use std::panic::Location;

/// Tag permitting a scenario to skip steps even when skips are configured to
/// fail the run.
pub const ALLOW_SKIPPED_TAG: &str = "@allow_skipped";

/// Describes one scenario for harnesses and reporters.
///
/// # Examples
///
/// ```
/// use fluent_bdd_harness::ScenarioMetadata;
///
/// let metadata = ScenarioMetadata::new(
///     "pushing onto a stack",
///     "tests/stack.rs",
///     12,
///     vec!["@smoke".to_string()],
/// );
/// assert_eq!(metadata.scenario_name(), "pushing onto a stack");
/// assert_eq!(metadata.source_path(), "tests/stack.rs");
/// assert_eq!(metadata.line(), 12);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScenarioMetadata {
    scenario_name: String,
    source_path: String,
    line: u32,
    tags: Vec<String>,
}

impl ScenarioMetadata {
    /// Creates metadata for one scenario run.
    #[must_use]
    pub fn new(
        scenario_name: impl Into<String>,
        source_path: impl Into<String>,
        line: u32,
        tags: Vec<String>,
    ) -> Self {
        Self {
            scenario_name: scenario_name.into(),
            source_path: source_path.into(),
            line,
            tags,
        }
    }

    /// Creates metadata whose source location is the caller's.
    ///
    /// ```
    /// use fluent_bdd_harness::ScenarioMetadata;
    ///
    /// let metadata = ScenarioMetadata::here("located");
    /// assert!(metadata.source_path().ends_with(".rs"));
    /// assert!(metadata.line() > 0);
    /// ```
    #[must_use]
    #[track_caller]
    pub fn here(scenario_name: impl Into<String>) -> Self {
        let location = Location::caller();
        Self::new(scenario_name, location.file(), location.line(), Vec::new())
    }

    /// Returns a copy of the metadata with `tag` appended.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Returns the scenario name.
    #[must_use]
    pub fn scenario_name(&self) -> &str {
        &self.scenario_name
    }

    /// Returns the path of the source file declaring the scenario.
    #[must_use]
    pub fn source_path(&self) -> &str {
        &self.source_path
    }

    /// Returns the one-based line where the scenario is declared.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Returns the scenario tags.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Whether the scenario carries [`ALLOW_SKIPPED_TAG`].
    #[must_use]
    pub fn allows_skipped(&self) -> bool {
        self.tags.iter().any(|tag| tag == ALLOW_SKIPPED_TAG)
    }
}

impl Default for ScenarioMetadata {
    fn default() -> Self {
        Self::new("<unnamed>", "<unknown>", 1, Vec::new())
    }
}

/// A callable scenario runner closure owned by a harness.
///
/// # Examples
///
/// ```
/// use fluent_bdd_harness::ScenarioRunner;
///
/// let runner = ScenarioRunner::new(|| 41 + 1);
/// assert_eq!(runner.run(), 42);
/// ```
pub struct ScenarioRunner<'a, T> {
    inner: Box<dyn FnOnce() -> T + 'a>,
}

impl<'a, T> ScenarioRunner<'a, T> {
    /// Wraps a closure as a scenario runner.
    #[must_use]
    pub fn new(inner: impl FnOnce() -> T + 'a) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }

    /// Executes the wrapped closure.
    #[must_use]
    pub fn run(self) -> T {
        (self.inner)()
    }
}

/// A harness execution request for one scenario.
pub struct ScenarioRunRequest<'a, T> {
    metadata: ScenarioMetadata,
    runner: ScenarioRunner<'a, T>,
}

impl<'a, T> ScenarioRunRequest<'a, T> {
    /// Creates a request from metadata and a runner.
    #[must_use]
    pub fn new(metadata: ScenarioMetadata, runner: ScenarioRunner<'a, T>) -> Self {
        Self { metadata, runner }
    }

    /// Returns the metadata for diagnostics or harness setup.
    #[must_use]
    pub fn metadata(&self) -> &ScenarioMetadata {
        &self.metadata
    }

    /// Consumes the request and returns metadata and runner separately.
    #[must_use]
    pub fn into_parts(self) -> (ScenarioMetadata, ScenarioRunner<'a, T>) {
        (self.metadata, self.runner)
    }

    /// Executes the runner directly.
    #[must_use]
    pub fn run(self) -> T {
        self.runner.run()
    }
}
