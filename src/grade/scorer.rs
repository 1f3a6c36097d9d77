#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt;

use serde::{Deserialize, Serialize};

use super::results::TaskResult;
use crate::constants::{LATE_SUBMISSION_MARKS, ON_TIME_SUBMISSION_MARKS, TOTAL_MARKS};

/// Outcome code of a submission, as written to the grade record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Submitted before the cutoff.
    OnTime,
    /// Submitted after the cutoff.
    Late,
    /// Nothing gradable: no stylesheet, or one that implements no requirement.
    Ungradable,
}

impl Status {
    /// Numeric code: 0 on time, 1 late, 2 ungradable.
    pub fn code(self) -> u8 {
        match self {
            Status::OnTime => 0,
            Status::Late => 1,
            Status::Ungradable => 2,
        }
    }

    /// Short explanation for feedback.
    pub fn description(self) -> &'static str {
        match self {
            Status::OnTime => "on time",
            Status::Late => "late",
            Status::Ungradable => "no gradable submission or no tasks implemented",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Final grade of one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeReport {
    /// Who was graded.
    pub student_id:       String,
    /// Per task marks, in catalog order.
    pub task_results:     Vec<TaskResult>,
    /// Marks for handing in, based on timeliness.
    pub submission_marks: u32,
    /// Task marks plus submission marks, capped at 100.
    pub total_marks:      u32,
    /// Outcome code.
    pub status:           Status,
}

impl GradeReport {
    /// Sum of earned task marks, saturating at `u32::MAX`.
    pub fn obtained_task_marks(&self) -> u32 {
        self.task_results
            .iter()
            .fold(0u32, |sum, t| sum.saturating_add(t.earned_marks))
    }

    /// Upper bound of `total_marks`.
    pub fn max_marks(&self) -> u32 {
        TOTAL_MARKS
    }

    /// Number of requirements satisfied across all tasks.
    pub fn satisfied_requirements(&self) -> usize {
        self.task_results.iter().map(|t| t.satisfied_count).sum()
    }
}

/// Combines task results with the submission signals into a report.
///
/// Without a submission every task is forced to zero and the status is
/// ungradable. A submission that satisfies no requirement at all is also
/// reported ungradable, but still receives its timeliness marks.
pub fn score(
    student_id: impl Into<String>,
    task_results: Vec<TaskResult>,
    submission_present: bool,
    is_late: bool,
) -> GradeReport {
    let student_id = student_id.into();

    if !submission_present {
        tracing::info!("No gradable stylesheet for `{student_id}`; all marks are 0.");
        return GradeReport {
            student_id,
            task_results: task_results.into_iter().map(TaskResult::suppressed).collect(),
            submission_marks: 0,
            total_marks: 0,
            status: Status::Ungradable,
        };
    }

    let submission_marks = if is_late {
        LATE_SUBMISSION_MARKS
    } else {
        ON_TIME_SUBMISSION_MARKS
    };

    let satisfied: usize = task_results.iter().map(|t| t.satisfied_count).sum();
    let status = if satisfied == 0 {
        Status::Ungradable
    } else if is_late {
        Status::Late
    } else {
        Status::OnTime
    };

    let raw_total: u64 = task_results
        .iter()
        .map(|t| u64::from(t.earned_marks))
        .sum::<u64>()
        + u64::from(submission_marks);
    if raw_total > u64::from(TOTAL_MARKS) {
        tracing::warn!(
            "Marks add up to {raw_total} which is over {TOTAL_MARKS}; the catalog is probably misconfigured."
        );
    }
    let total_marks = u32::try_from(raw_total).map_or(TOTAL_MARKS, |t| t.min(TOTAL_MARKS));

    GradeReport {
        student_id,
        task_results,
        submission_marks,
        total_marks,
        status,
    }
}
