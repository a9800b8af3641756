//! Host-runner adapter contracts for `fluent-bdd`.
//!
//! The engine never talks to a test framework directly. It wraps the work of
//! declaring, planning and executing one scenario in a [`ScenarioRunner`] and
//! hands it, together with the scenario's [`ScenarioMetadata`], to a
//! [`HarnessAdapter`]. The adapter decides what environment the runner executes
//! in; [`StdHarness`] simply calls it on the current thread.

mod adapter;
mod runner;
mod std_harness;

pub use adapter::HarnessAdapter;
pub use runner::{ALLOW_SKIPPED_TAG, ScenarioMetadata, ScenarioRunRequest, ScenarioRunner};
pub use std_harness::StdHarness;
