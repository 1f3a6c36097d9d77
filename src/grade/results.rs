#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt::Display;

use bon::Builder;
use serde::{Deserialize, Serialize};

use super::requirement::{Evaluation, Requirement};

/// Scales `satisfied / total` to `max_marks`, rounding half up.
///
/// Integer arithmetic keeps `7.5` at exactly `8`. A task without requirements
/// earns nothing.
pub fn earned_marks(max_marks: u32, satisfied: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let satisfied = satisfied.min(total) as u128;
    let total = total as u128;
    let scaled = (2 * u128::from(max_marks) * satisfied + total) / (2 * total);
    u32::try_from(scaled).unwrap_or(max_marks)
}

/// Outcome of one requirement, as shown to the student.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(on(String, into))]
pub struct RequirementOutcome {
    /// Selector the requirement targets.
    pub selector:           String,
    /// Requirement label.
    pub label:              String,
    /// Whether it held.
    #[builder(default)]
    pub satisfied:          bool,
    /// Whether a rule for the selector was found.
    #[builder(default)]
    pub matched_rule_found: bool,
    /// How to fix it, if it failed.
    pub hint:               Option<String>,
}

impl RequirementOutcome {
    /// Pairs a requirement with its evaluation.
    pub fn new(requirement: &Requirement, evaluation: Evaluation) -> Self {
        Self {
            selector:           requirement.selector().to_string(),
            label:              requirement.label().to_string(),
            satisfied:          evaluation.satisfied,
            matched_rule_found: evaluation.matched_rule_found,
            hint:               requirement.hint(&evaluation),
        }
    }
}

/// Marks earned by one catalog task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResult {
    /// Catalog id, eg. `TODO 1`.
    pub task_id:         String,
    /// Task title.
    pub name:            String,
    /// Marks earned, between 0 and `max_marks`.
    pub earned_marks:    u32,
    /// Marks available.
    pub max_marks:       u32,
    /// Number of requirements that held.
    pub satisfied_count: usize,
    /// Number of requirements checked.
    pub total_count:     usize,
    /// Per requirement outcomes, in catalog order.
    pub outcomes:        Vec<RequirementOutcome>,
}

impl TaskResult {
    /// Aggregates requirement outcomes into a task result.
    pub fn from_outcomes(
        task_id: impl Into<String>,
        name: impl Into<String>,
        max_marks: u32,
        outcomes: Vec<RequirementOutcome>,
    ) -> Self {
        let task_id = task_id.into();
        let total_count = outcomes.len();
        let satisfied_count = outcomes.iter().filter(|o| o.satisfied).count();

        if total_count == 0 {
            tracing::warn!(
                "Task `{task_id}` has no requirements; scoring it 0. This is a catalog error."
            );
        }

        Self {
            earned_marks: earned_marks(max_marks, satisfied_count, total_count),
            task_id,
            name: name.into(),
            max_marks,
            satisfied_count,
            total_count,
            outcomes,
        }
    }

    /// Same result with its marks forced to zero.
    pub fn suppressed(mut self) -> Self {
        self.earned_marks = 0;
        self
    }

    /// Whether every requirement held.
    pub fn is_complete(&self) -> bool {
        self.total_count > 0 && self.satisfied_count == self.total_count
    }
}

impl Display for TaskResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} ({}/{})", self.task_id, self.name, self.earned_marks, self.max_marks)
    }
}
