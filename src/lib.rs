//! # cssgrade
//!
//! An autograder for a CSS coursework lab. It parses the student's
//! stylesheet into flat selector/declaration pairs, checks a catalog of
//! tasks for the presence of required selectors and properties (values are
//! never inspected), and produces a score out of 100 with feedback.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Run configuration
pub mod config;
/// A module defining a bunch of constant values to be used throughout
pub mod constants;
/// Stylesheet parsing and property matching
pub mod css;
/// For all things related to grading
pub mod grade;
/// Resolving who is being graded
pub mod identity;
/// CSV, Markdown and terminal output
pub mod report;
/// Locating the submitted stylesheet
pub mod submission;
/// Submission time and lateness
pub mod timing;
/// Utility functions for convenience
pub mod util;

use config::GraderConfig;
use grade::{Catalog, GradeReport, score};
use report::RunContext;
use serde::Serialize;
use submission::locate_stylesheet;
use timing::{CommitTimestampProvider, assess_timeliness};

/// A finished grading run: the report plus what is needed to explain it.
#[derive(Debug, Clone, Serialize)]
pub struct GradingRun {
    /// The grade.
    pub report:  GradeReport,
    /// Facts about the run shown alongside the grade.
    pub context: RunContext,
}

/// Grades stylesheet text with `catalog`.
///
/// `None` or blank text means nothing was submitted. This is the whole
/// grading core: no IO, and the same inputs always give the same report.
pub fn grade_stylesheet(
    catalog: &Catalog,
    student_id: &str,
    stylesheet: Option<&str>,
    is_late: bool,
) -> GradeReport {
    let text = stylesheet.filter(|text| !text.trim().is_empty());
    let rules = text.map(css::parse).unwrap_or_default();
    tracing::debug!("Grading {} rules with catalog {}", rules.len(), catalog.version);

    score(student_id, catalog.grade(&rules), text.is_some(), is_late)
}

/// Loads the configured catalog, falling back to the built-in one for the
/// configured version if an external catalog cannot be used.
pub fn load_catalog(config: &GraderConfig) -> Catalog {
    let catalog = match config.load_catalog() {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!("{e}; grading with built-in catalog {}", config.catalog_version());
            Catalog::builtin(config.catalog_version())
        }
    };

    if let Err(errors) = catalog.validate() {
        for e in errors {
            tracing::warn!("Catalog {}: {e}", catalog.version);
        }
    }
    catalog
}

/// Grades the submission below `config.root_dir()`.
///
/// Never fails: a missing stylesheet, unreadable history or a broken
/// external catalog all degrade to a (possibly pessimistic) report.
pub fn grade_workspace<F>(
    config: &GraderConfig,
    provider: &dyn CommitTimestampProvider,
    lookup: F,
) -> GradingRun
where
    F: Fn(&str) -> Option<String>,
{
    let student_id = identity::resolve_student_id(lookup);
    tracing::info!("Grading submission of `{student_id}`");

    let catalog = load_catalog(config);
    let stylesheet = locate_stylesheet(config.root_dir(), config.default_file_name());
    if let Some(sheet) = &stylesheet {
        tracing::info!("Grading `{}` (found via {}).", sheet.path.display(), sheet.origin);
    }
    let timeliness = assess_timeliness(provider, config.due_utc());

    let report = grade_stylesheet(
        &catalog,
        &student_id,
        stylesheet.as_ref().map(|s| s.text.as_str()),
        timeliness.late,
    );
    let context = RunContext::new(
        config.root_dir(),
        stylesheet.as_ref(),
        config.due(),
        timeliness.commit_time,
        catalog.version.clone(),
    );

    GradingRun { report, context }
}
