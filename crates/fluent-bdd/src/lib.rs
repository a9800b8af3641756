//! Fluent Given/When/Then steps for plain Rust tests.
//!
//! A scenario is declared as a chain of steps, each a message plus a closure.
//! Declaring does not run anything: once the chain is complete the steps are
//! planned into execution groups and each group runs in order, releasing the
//! resources its steps returned in reverse order of acquisition.
//!
//! Steps declared `in_isolation` get a group of their own in which every
//! preceding non-isolated step is invoked again from scratch, so an assertion
//! never observes side effects produced for another.
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use fluent_bdd::{Declare, Disposable, scenario};
//!
//! let log = Rc::new(RefCell::new(Vec::new()));
//! let (open, act) = (Rc::clone(&log), Rc::clone(&log));
//!
//! let report = scenario("withdrawing cash", move |s| {
//!     s.given("an account with 100", move || {
//!         open.borrow_mut().push("open");
//!         let close = Rc::clone(&open);
//!         Disposable::new(move || close.borrow_mut().push("close"))
//!     })
//!     .when("20 is withdrawn", move || act.borrow_mut().push("withdraw"))
//!     .then("the balance is 80", || ())
//!     .then_in_isolation("a receipt is printed", || ());
//! });
//!
//! report.assert_passed();
//! assert_eq!(
//!     *log.borrow(),
//!     ["open", "withdraw", "close", "open", "withdraw", "close"]
//! );
//! ```

pub mod config;
mod context;
mod declare;
mod disposal;
pub mod execution;
mod keyword;
mod panic;
pub mod plan;
mod report;
pub mod reporting;
mod scenario;
pub mod state;
mod step;

pub use context::{CurrentScenarioGuard, ScenarioContext, StepHandle};
pub use declare::{Declare, StepExt};
pub use disposal::{Disposable, DisposableChain};
pub use execution::{DisposalFailure, StepFailure, run_group, run_plan};
pub use keyword::{StepKeyword, StepKeywordParseError};
pub use panic::panic_message;
pub use plan::{ExecutionGroup, ExecutionPlan, GroupKind, PlannedStep, plan};
pub use report::{GroupReport, GroupState, ScenarioFailure, ScenarioReport, StepReport, StepStatus};
pub use scenario::{run_scenario, scenario};
pub use state::{ScenarioState, Slot};
pub use step::{DeclarationError, IntoStepOutput, Step, StepBody, StepOutput, body};

pub use fluent_bdd_harness::{
    ALLOW_SKIPPED_TAG, HarnessAdapter, ScenarioMetadata, ScenarioRunRequest, ScenarioRunner,
    StdHarness,
};
