#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Rendering a [`GradeReport`] for people and pipelines.
//!
//! Nothing rendered here depends on the wall clock, so grading the same
//! submission twice writes byte-identical files.

use std::{
    fs::{self, OpenOptions},
    io::Write as _,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use itertools::Itertools;
use serde::Serialize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Panel, Style, Width, object::Rows},
};

use crate::{
    constants::{CSV_HEADER, ON_TIME_SUBMISSION_MARKS, UNKNOWN_COMMIT_TIME},
    grade::{GradeReport, RequirementOutcome, Status},
    submission::Stylesheet,
};

/// Title used for the feedback summary.
const SUMMARY_TITLE: &str = "Lab | 3-2 More CSS | Autograding Summary";

/// Facts about the run that are reported but not graded.
#[derive(Debug, Clone, Serialize)]
pub struct RunContext {
    /// Stylesheet that was graded, relative to the submission root if
    /// possible.
    pub stylesheet:  Option<PathBuf>,
    /// Whether the stylesheet had any content.
    pub gradable:    bool,
    /// Late cutoff.
    pub due:         DateTime<FixedOffset>,
    /// Commit time that decided lateness.
    pub commit_time: Option<DateTime<Utc>>,
    /// Catalog version graded with.
    pub catalog:     String,
}

impl RunContext {
    /// Describes a run over `stylesheet` found below `root`.
    pub fn new(
        root: &Path,
        stylesheet: Option<&Stylesheet>,
        due: DateTime<FixedOffset>,
        commit_time: Option<DateTime<Utc>>,
        catalog: impl Into<String>,
    ) -> Self {
        Self {
            stylesheet: stylesheet
                .map(|s| s.path.strip_prefix(root).unwrap_or(&s.path).to_path_buf()),
            gradable: stylesheet.is_some_and(Stylesheet::is_gradable),
            due,
            commit_time,
            catalog: catalog.into(),
        }
    }

    /// Line describing how the stylesheet was loaded.
    pub fn load_note(&self, report: &GradeReport) -> String {
        let task_marks = report
            .task_results
            .iter()
            .fold(0u32, |sum, t| sum.saturating_add(t.max_marks));
        match &self.stylesheet {
            Some(path) if self.gradable => format!("✅ Found `{}`.", path.display()),
            Some(path) => format!(
                "❌ `{}` is empty → tasks cannot be detected (0/{task_marks}).",
                path.display()
            ),
            None => format!("❌ No stylesheet found → tasks cannot be detected (0/{task_marks})."),
        }
    }

    /// Commit time as rendered, or `unknown`.
    pub fn commit_time_text(&self) -> String {
        self.commit_time
            .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_else(|| UNKNOWN_COMMIT_TIME.to_string())
    }
}

/// Replaces characters that would split a CSV field or row with `_`.
fn csv_field(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|c| if c == ',' || c == '"' || c.is_control() { '_' } else { c })
        .collect()
}

/// The persisted grade record: fixed header and exactly one data row.
pub fn csv_record(report: &GradeReport) -> String {
    format!(
        "{CSV_HEADER}\n{},{},{},{}\n",
        csv_field(&report.student_id),
        report.total_marks,
        report.max_marks(),
        report.status.code()
    )
}

/// Sentence explaining the submission marks.
fn submission_note(report: &GradeReport, context: &RunContext) -> String {
    if !context.gradable {
        return format!("No gradable stylesheet: submission marks = 0/{ON_TIME_SUBMISSION_MARKS}.");
    }
    match report.submission_marks {
        ON_TIME_SUBMISSION_MARKS => format!(
            "On-time submission via latest commit time: \
             {ON_TIME_SUBMISSION_MARKS}/{ON_TIME_SUBMISSION_MARKS}."
        ),
        marks => format!(
            "Late submission detected via latest commit time: \
             {marks}/{ON_TIME_SUBMISSION_MARKS}."
        ),
    }
}

/// Joins labels, or a dash if there are none.
fn join_or_dash<'a>(labels: impl Iterator<Item = &'a str>) -> String {
    let joined = labels.collect::<Vec<_>>().join(", ");
    if joined.is_empty() { "—".to_string() } else { joined }
}

/// Feedback lines for one task, grouped by consecutive selector.
pub fn task_feedback(outcomes: &[RequirementOutcome]) -> Vec<String> {
    let mut lines = Vec::new();

    for (selector, group) in &outcomes.iter().chunk_by(|o| o.selector.clone()) {
        let group: Vec<&RequirementOutcome> = group.collect();
        let missing = || group.iter().filter(|o| !o.satisfied).map(|o| o.label.as_str());

        if !group.iter().any(|o| o.matched_rule_found) {
            lines.push(format!("- ❌ Missing rule for selector `{selector}`"));
            lines.push(format!("  - Required: {}", join_or_dash(missing())));
            continue;
        }

        lines.push(format!("- ✅ Selector `{selector}`"));
        lines.push(format!(
            "  - Implemented: {}",
            join_or_dash(group.iter().filter(|o| o.satisfied).map(|o| o.label.as_str()))
        ));
        lines.push(format!("  - Missing: {}", join_or_dash(missing())));
        for hint in group.iter().filter_map(|o| o.hint.as_deref()) {
            lines.push(format!("  - Hint: {hint}"));
        }
    }

    lines
}

/// Markdown feedback for the student and the CI step summary.
pub fn markdown_summary(report: &GradeReport, context: &RunContext) -> String {
    let load_note = context.load_note(report);

    let mut lines = vec![
        format!("# {SUMMARY_TITLE}"),
        String::new(),
        format!("- Student: `{}`", report.student_id),
        format!("- {load_note}"),
        format!("- {}", submission_note(report, context)),
        format!("- Late Due: `{}`", context.due.to_rfc3339()),
        format!("- Commit time: `{}`", context.commit_time_text()),
        format!("- Catalog: `{}`", context.catalog),
        format!(
            "- Status: **{}** (0=on time, 1=late, 2=no gradable submission or no tasks implemented)",
            report.status.code()
        ),
    ];

    lines.extend([
        String::new(),
        "## Marks Breakdown".to_string(),
        String::new(),
        "| Item | Marks |".to_string(),
        "|------|------:|".to_string(),
    ]);
    lines.extend(report.task_results.iter().map(|task| {
        format!(
            "| {}: {} | {}/{} |",
            task.task_id, task.name, task.earned_marks, task.max_marks
        )
    }));
    lines.push(format!(
        "| Submission | {}/{ON_TIME_SUBMISSION_MARKS} |",
        report.submission_marks
    ));

    lines.extend([
        String::new(),
        "## Total Marks".to_string(),
        String::new(),
        format!("**{} / {}**", report.total_marks, report.max_marks()),
    ]);

    lines.push(String::new());
    lines.push("## Detailed Feedback (Implemented vs Missed)".to_string());
    for task in &report.task_results {
        lines.push(String::new());
        lines.push(format!("### {}: {}", task.task_id, task.name));
        if context.gradable {
            lines.extend(task_feedback(&task.outcomes));
        } else {
            lines.push(load_note.clone());
        }
    }

    if report.status == Status::Ungradable {
        lines.push(String::new());
        lines.push(
            "⚠️ **Status=2:** No gradable submission was detected, or none of the required \
             selectors/properties for the lab tasks were found."
                .to_string(),
        );
    }

    lines.join("\n") + "\n"
}

/// One row of the terminal overview.
#[derive(Tabled)]
struct OverviewRow {
    #[tabled(rename = "Task")]
    /// * `task`: task id and name
    task:         String,
    #[tabled(rename = "Marks")]
    /// * `marks`: earned/max
    marks:        String,
    #[tabled(rename = "Requirements")]
    /// * `requirements`: satisfied/total
    requirements: String,
}

/// A table of task marks for the terminal.
pub fn overview_table(report: &GradeReport) -> String {
    let mut rows: Vec<OverviewRow> = report
        .task_results
        .iter()
        .map(|t| OverviewRow {
            task:         format!("{}: {}", t.task_id, t.name),
            marks:        format!("{}/{}", t.earned_marks, t.max_marks),
            requirements: format!("{}/{}", t.satisfied_count, t.total_count),
        })
        .collect();
    rows.push(OverviewRow {
        task:         "Submission".to_string(),
        marks:        format!("{}/{ON_TIME_SUBMISSION_MARKS}", report.submission_marks),
        requirements: String::new(),
    });

    Table::new(&rows)
        .with(Panel::header("Grading Overview"))
        .with(Panel::footer(format!(
            "Total: {}/{} (status {})",
            report.total_marks,
            report.max_marks(),
            report.status.code()
        )))
        .with(Modify::new(Rows::new(1..)).with(Width::wrap(48).keep_words(true)))
        .with(
            Modify::new(Rows::first())
                .with(Alignment::center())
                .with(Alignment::center_vertical()),
        )
        .with(
            Modify::new(Rows::last())
                .with(Alignment::center())
                .with(Alignment::center_vertical()),
        )
        .with(Style::modern())
        .to_string()
}

/// Writes `grade.csv` and `feedback/README.md` below `artifacts_dir`, and
/// appends the summary to `step_summary` when given.
pub fn write_artifacts(
    artifacts_dir: &Path,
    report: &GradeReport,
    context: &RunContext,
    step_summary: Option<&Path>,
) -> Result<()> {
    let feedback_dir = artifacts_dir.join("feedback");
    fs::create_dir_all(&feedback_dir)
        .with_context(|| format!("Could not create {}", feedback_dir.display()))?;

    let summary = markdown_summary(report, context);

    let csv_path = artifacts_dir.join("grade.csv");
    fs::write(&csv_path, csv_record(report))
        .with_context(|| format!("Could not write {}", csv_path.display()))?;

    let readme_path = feedback_dir.join("README.md");
    fs::write(&readme_path, &summary)
        .with_context(|| format!("Could not write {}", readme_path.display()))?;

    if let Some(path) = step_summary {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut f| f.write_all(summary.as_bytes()))
            .with_context(|| format!("Could not append to step summary {}", path.display()))?;
    }

    tracing::info!("Wrote {} and {}", csv_path.display(), readme_path.display());
    Ok(())
}
