//! Per-scenario step queue and the thread's current-scenario binding.
//!
//! A [`ScenarioContext`] owns the ordered, append-only list of steps declared
//! for one scenario. It is a cheap `Rc` handle and `!Send`: a
//! scenario is declared and executed on one thread and never shared with
//! another. Declarations either receive the context explicitly (through the
//! [`Declare`](crate::Declare) trait) or resolve it from the thread's current
//! binding, installed with [`ScenarioContext::enter`].

use std::cell::{Cell, RefCell};
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::keyword::StepKeyword;
use crate::plan::{ExecutionPlan, plan};
use crate::step::{DeclarationError, Step};

thread_local! {
    static CURRENT: RefCell<Vec<ScenarioContext>> = const { RefCell::new(Vec::new()) };
}

struct ContextInner {
    name: String,
    steps: RefCell<Vec<Step>>,
    executing: Cell<bool>,
}

/// Handle to one scenario's step list.
///
/// # Examples
///
/// ```
/// use fluent_bdd::{Declare, ScenarioContext};
///
/// let ctx = ScenarioContext::new("stack");
/// ctx.given("an empty stack", || ()).when("a value is pushed", || ());
/// assert_eq!(ctx.len(), 2);
/// ```
#[derive(Clone)]
pub struct ScenarioContext {
    inner: Rc<ContextInner>,
}

impl ScenarioContext {
    /// Create an empty context for the named scenario.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(ContextInner {
                name: name.into(),
                steps: RefCell::new(Vec::new()),
                executing: Cell::new(false),
            }),
        }
    }

    /// Name of the scenario.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Append `step`, returning a handle for further chaining.
    ///
    /// # Panics
    ///
    /// Panics at the caller when the scenario has already begun executing.
    #[track_caller]
    pub fn enqueue(&self, step: Step) -> StepHandle {
        self.try_enqueue(step).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Append `step` unless the scenario has begun executing.
    ///
    /// # Errors
    ///
    /// Returns [`DeclarationError::ExecutionStarted`] once [`plan`](Self::plan)
    /// has been called.
    pub fn try_enqueue(&self, step: Step) -> Result<StepHandle, DeclarationError> {
        if self.is_executing() {
            return Err(DeclarationError::ExecutionStarted {
                scenario: self.name().to_string(),
                keyword: step.keyword(),
                message: step.message().to_string(),
            });
        }
        let mut steps = self.inner.steps.borrow_mut();
        let handle = StepHandle {
            context: self.clone(),
            index: steps.len(),
            keyword: step.keyword(),
            message: step.message().into(),
        };
        log::trace!(
            "scenario '{}' declared step {}: {}",
            self.name(),
            handle.index,
            step.display_name()
        );
        steps.push(step);
        Ok(handle)
    }

    /// Snapshot of the declared steps in declaration order.
    #[must_use]
    pub fn steps(&self) -> Vec<Step> {
        self.inner.steps.borrow().clone()
    }

    /// Number of declared steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.steps.borrow().len()
    }

    /// Whether no step has been declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the declaration phase has ended.
    #[must_use]
    pub fn is_executing(&self) -> bool {
        self.inner.executing.get()
    }

    /// End the declaration phase and plan the declared steps.
    ///
    /// After this call the step list is frozen and further declarations are
    /// rejected.
    #[must_use]
    pub fn plan(&self) -> ExecutionPlan {
        self.inner.executing.set(true);
        let plan = plan(&self.inner.steps.borrow());
        log::debug!(
            "scenario '{}' planned {} step(s) into {} group(s)",
            self.name(),
            self.len(),
            plan.len()
        );
        plan
    }

    /// Bind this context as the current thread's scenario until the guard
    /// drops. Bindings nest; dropping a guard removes only its own binding,
    /// so the most recent remaining one becomes current again.
    pub fn enter(&self) -> CurrentScenarioGuard {
        CURRENT.with(|stack| stack.borrow_mut().push(self.clone()));
        CurrentScenarioGuard {
            context: self.clone(),
            _not_send_or_sync: PhantomData,
        }
    }

    /// The context bound to the current thread, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.with(|stack| stack.borrow().last().cloned())
    }

    /// Whether both handles refer to the same scenario.
    #[must_use]
    pub fn same_scenario(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for ScenarioContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScenarioContext")
            .field("name", &self.inner.name)
            .field("steps", &self.len())
            .field("executing", &self.is_executing())
            .finish()
    }
}

/// RAII guard keeping a context bound as the thread's current scenario.
#[must_use = "the scenario is unbound as soon as the guard drops"]
#[derive(Debug)]
pub struct CurrentScenarioGuard {
    context: ScenarioContext,
    _not_send_or_sync: PhantomData<Rc<()>>,
}

impl CurrentScenarioGuard {
    /// The bound context.
    #[must_use]
    pub fn context(&self) -> &ScenarioContext {
        &self.context
    }
}

impl Drop for CurrentScenarioGuard {
    fn drop(&mut self) {
        CURRENT.with(|stack| {
            let mut stack = stack.borrow_mut();
            // Guards dropped out of order unbind their own entry only.
            if let Some(position) = stack
                .iter()
                .rposition(|ctx| ctx.same_scenario(&self.context))
            {
                stack.remove(position);
            }
        });
    }
}

/// Identity of one enqueued step, usable to keep declaring on its scenario.
#[derive(Clone)]
pub struct StepHandle {
    context: ScenarioContext,
    index: usize,
    keyword: StepKeyword,
    message: Rc<str>,
}

impl StepHandle {
    /// Zero-based declaration index of the step.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Keyword of the step.
    #[must_use]
    pub const fn keyword(&self) -> StepKeyword {
        self.keyword
    }

    /// Message of the step.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Scenario the step belongs to.
    #[must_use]
    pub fn context(&self) -> &ScenarioContext {
        &self.context
    }
}

impl fmt::Debug for StepHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepHandle")
            .field("scenario", &self.context.name())
            .field("index", &self.index)
            .field("keyword", &self.keyword)
            .field("message", &self.message)
            .finish()
    }
}
