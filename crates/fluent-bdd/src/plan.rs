//! Expansion of a scenario's declared steps into execution groups.
//!
//! Walking the steps in declaration order, every non-isolated step joins the
//! primary group and a running prefix. Every isolated step produces a group of
//! its own holding a copy of the prefix followed by the isolated step; when
//! that group runs, the prefix bodies are invoked again so nothing acquired by
//! another group is shared. Isolated groups are emitted as their step is
//! reached and the primary group comes last.

use std::fmt;

use crate::step::Step;

/// Which kind of replay an execution group represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    /// Every non-isolated step in declaration order.
    Primary,
    /// A fresh replay of the preceding non-isolated steps plus one isolated
    /// step.
    Isolated {
        /// One-based position among the scenario's isolated steps.
        ordinal: usize,
    },
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => f.write_str("primary"),
            Self::Isolated { ordinal } => write!(f, "isolated #{ordinal}"),
        }
    }
}

/// A step placed in a group, remembering where it was declared.
#[derive(Debug, Clone)]
pub struct PlannedStep {
    declared_index: usize,
    step: Step,
}

impl PlannedStep {
    /// Zero-based index of the step in the scenario's declaration order.
    #[must_use]
    pub const fn declared_index(&self) -> usize {
        self.declared_index
    }

    /// The declared step.
    #[must_use]
    pub const fn step(&self) -> &Step {
        &self.step
    }
}

/// One independently disposed, linear run of steps.
#[derive(Debug, Clone)]
pub struct ExecutionGroup {
    kind: GroupKind,
    steps: Vec<PlannedStep>,
}

impl ExecutionGroup {
    /// The group's kind.
    #[must_use]
    pub const fn kind(&self) -> GroupKind {
        self.kind
    }

    /// Whether the group replays an isolated step.
    #[must_use]
    pub const fn is_isolated(&self) -> bool {
        matches!(self.kind, GroupKind::Isolated { .. })
    }

    /// Steps in execution order.
    #[must_use]
    pub fn steps(&self) -> &[PlannedStep] {
        &self.steps
    }

    /// Number of steps in the group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the group holds no steps. Planned groups never are.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Declaration index of the isolated step this group replays.
    #[must_use]
    pub fn isolated_index(&self) -> Option<usize> {
        match self.kind {
            GroupKind::Primary => None,
            GroupKind::Isolated { .. } => self.steps.last().map(PlannedStep::declared_index),
        }
    }

    /// Label used in reports, e.g. `primary` or
    /// `isolated #2 (Then the balance is unchanged)`.
    #[must_use]
    pub fn label(&self) -> String {
        match (self.kind, self.steps.last()) {
            (GroupKind::Isolated { .. }, Some(last)) => {
                format!("{} ({})", self.kind, last.step.display_name())
            }
            _ => self.kind.to_string(),
        }
    }
}

/// Ordered groups derived from one scenario.
#[derive(Debug, Clone, Default)]
pub struct ExecutionPlan {
    groups: Vec<ExecutionGroup>,
}

impl ExecutionPlan {
    /// Groups in execution order.
    #[must_use]
    pub fn groups(&self) -> &[ExecutionGroup] {
        &self.groups
    }

    /// Number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether the scenario declared no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// The primary group, absent when every step is isolated.
    #[must_use]
    pub fn primary(&self) -> Option<&ExecutionGroup> {
        self.groups
            .iter()
            .find(|group| group.kind == GroupKind::Primary)
    }

    /// Iterate over the groups in execution order.
    pub fn iter(&self) -> std::slice::Iter<'_, ExecutionGroup> {
        self.groups.iter()
    }
}

impl<'a> IntoIterator for &'a ExecutionPlan {
    type Item = &'a ExecutionGroup;
    type IntoIter = std::slice::Iter<'a, ExecutionGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Partition `steps` into execution groups.
///
/// # Examples
///
/// ```
/// use fluent_bdd::{GroupKind, Step, StepKeyword, plan};
///
/// let step = |keyword: StepKeyword, message: &str| {
///     Step::new(keyword, message, || ()).unwrap_or_else(|err| panic!("{err}"))
/// };
/// let steps = [
///     step(StepKeyword::Given, "an account"),
///     step(StepKeyword::When, "it is closed"),
///     step(StepKeyword::Then, "no balance remains"),
///     step(StepKeyword::Then, "the owner is notified").isolated(),
/// ];
///
/// let plan = plan(&steps);
/// let kinds: Vec<_> = plan.iter().map(|group| group.kind()).collect();
/// assert_eq!(kinds, [GroupKind::Isolated { ordinal: 1 }, GroupKind::Primary]);
/// let replay: Vec<_> = plan.groups()[0]
///     .steps()
///     .iter()
///     .map(|planned| planned.declared_index())
///     .collect();
/// assert_eq!(replay, [0, 1, 2, 3]);
/// ```
#[must_use]
pub fn plan(steps: &[Step]) -> ExecutionPlan {
    let mut prefix: Vec<PlannedStep> = Vec::with_capacity(steps.len());
    let mut groups = Vec::new();
    let mut ordinal = 0;
    for (declared_index, step) in steps.iter().enumerate() {
        let planned = PlannedStep {
            declared_index,
            step: step.clone(),
        };
        if step.is_isolated() {
            ordinal += 1;
            let mut replay = prefix.clone();
            replay.push(planned);
            groups.push(ExecutionGroup {
                kind: GroupKind::Isolated { ordinal },
                steps: replay,
            });
        } else {
            prefix.push(planned);
        }
    }
    if !prefix.is_empty() {
        groups.push(ExecutionGroup {
            kind: GroupKind::Primary,
            steps: prefix,
        });
    }
    ExecutionPlan { groups }
}
