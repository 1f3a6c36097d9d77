#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # cssgrade
//! ## Introduction
//!
//! Grades a CSS lab submission: finds the stylesheet, checks it for the
//! required selectors and properties, and writes `artifacts/grade.csv` and
//! `artifacts/feedback/README.md`.
//!
//! Meant to run inside the student's repository in CI, eg. as a GitHub
//! Classroom autograding step. Settings can also come from a `.env` file.

use std::{collections::HashMap, path::PathBuf};

use anyhow::{Context, Result};
use bpaf::*;
use colored::Colorize;
use cssgrade::{
    config::GraderConfig,
    css,
    grade::{Catalog, CatalogVersion, Status},
    grade_workspace, report,
    timing::GitHistory,
};
use dotenvy::dotenv;
use tracing::{Level, metadata::LevelFilter};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Options of the `grade` subcommand.
#[derive(Debug, Clone)]
struct GradeArgs {
    /// Submission directory
    root:         Option<PathBuf>,
    /// Stylesheet file name tried first
    stylesheet:   Option<String>,
    /// Built-in catalog version
    catalog:      Option<String>,
    /// External catalog file
    catalog_file: Option<PathBuf>,
    /// Late cutoff, RFC 3339
    due:          Option<String>,
    /// Student identifier override
    student:      Option<String>,
    /// Output directory
    artifacts:    Option<PathBuf>,
    /// Print the report as JSON instead of a table
    json:         bool,
}

impl GradeArgs {
    /// Command line values keyed by the environment variable they override.
    fn overrides(&self) -> HashMap<&'static str, String> {
        let path = |p: &Option<PathBuf>| p.as_ref().map(|p| p.display().to_string());
        [
            ("CSSGRADE_ROOT", path(&self.root)),
            ("CSSGRADE_STYLESHEET", self.stylesheet.clone()),
            ("CSSGRADE_CATALOG", self.catalog.clone()),
            ("CSSGRADE_CATALOG_PATH", path(&self.catalog_file)),
            ("CSSGRADE_DUE", self.due.clone()),
            ("STUDENT_USERNAME", self.student.clone()),
            ("CSSGRADE_ARTIFACTS_DIR", path(&self.artifacts)),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
        .collect()
    }
}

/// Top-level CLI commands.
#[derive(Debug, Clone)]
enum Cmd {
    /// Grade a submission
    Grade(GradeArgs),
    /// Print the rules parsed from a stylesheet
    Parse(PathBuf),
    /// Print a built-in catalog
    Catalog(Option<String>),
}

/// Parse the command line arguments and return a `Cmd` enum
fn options() -> Cmd {
    /// parses the built-in catalog version
    fn catalog_version() -> impl Parser<Option<String>> {
        long("catalog")
            .help("Built-in catalog version (v1 or v2)")
            .argument::<String>("VERSION")
            .optional()
    }

    let root = long("root")
        .help("Directory holding the submission")
        .argument::<PathBuf>("DIR")
        .optional();
    let stylesheet = long("stylesheet")
        .help("Stylesheet file name to try first")
        .argument::<String>("FILE")
        .optional();
    let catalog_file = long("catalog-file")
        .help("JSON catalog to grade with instead of a built-in one")
        .argument::<PathBuf>("PATH")
        .optional();
    let due = long("due")
        .help("Late cutoff as RFC 3339, eg. 2025-10-09T23:59:00+03:00")
        .argument::<String>("INSTANT")
        .optional();
    let student = long("student")
        .help("Student identifier to report")
        .argument::<String>("ID")
        .optional();
    let artifacts = long("artifacts")
        .help("Directory grade.csv and feedback are written to")
        .argument::<PathBuf>("DIR")
        .optional();
    let json = long("json").help("Print the report as JSON").switch();
    let catalog = catalog_version();

    let grade = construct!(GradeArgs {
        root,
        stylesheet,
        catalog,
        catalog_file,
        due,
        student,
        artifacts,
        json
    })
    .map(Cmd::Grade)
    .to_options()
    .command("grade")
    .help("Grade the submission and write artifacts");

    let parse = positional::<PathBuf>("FILE")
        .help("Stylesheet to parse")
        .map(Cmd::Parse)
        .to_options()
        .command("parse")
        .help("Prints a JSON description of the rules as parsed");

    let print_catalog = catalog_version()
        .map(Cmd::Catalog)
        .to_options()
        .command("catalog")
        .help("Prints a built-in catalog as JSON");

    construct!([grade, parse, print_catalog])
        .to_options()
        .descr("Autograder for CSS labs")
        .run()
}

/// Grades the submission and writes its artifacts.
fn grade(args: GradeArgs) -> Result<()> {
    let overrides = args.overrides();
    let lookup = |key: &str| {
        overrides
            .get(key)
            .cloned()
            .or_else(|| std::env::var(key).ok())
    };

    let config = GraderConfig::from_lookup(lookup);

    let history = GitHistory::new(config.root_dir());
    let run = grade_workspace(&config, &history, lookup);

    let step_summary = std::env::var_os("GITHUB_STEP_SUMMARY").map(PathBuf::from);
    if let Err(e) = report::write_artifacts(
        config.artifacts_dir(),
        &run.report,
        &run.context,
        step_summary.as_deref(),
    ) {
        tracing::error!("{e:#}");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&run)?);
    } else {
        eprintln!("{}", report::overview_table(&run.report));
    }

    let line = format!(
        "✔ Lab graded: {}/{} (status={}, {})",
        run.report.total_marks,
        run.report.max_marks(),
        run.report.status.code(),
        run.report.status.description()
    );
    match run.report.status {
        Status::OnTime => eprintln!("{}", line.green()),
        Status::Late => eprintln!("{}", line.yellow()),
        Status::Ungradable => eprintln!("{}", line.red()),
    }

    Ok(())
}

fn main() -> Result<()> {
    dotenv().ok();

    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);
    let filter_layer = LevelFilter::from_level(Level::INFO);
    tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .init();

    match options() {
        Cmd::Grade(args) => grade(args)?,
        Cmd::Parse(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Could not read {}", path.display()))?;
            println!("{}", serde_json::to_string_pretty(&css::parse(&text))?);
        }
        Cmd::Catalog(version) => {
            let version = version
                .map(|v| v.parse::<CatalogVersion>())
                .transpose()?
                .unwrap_or_default();
            println!("{}", serde_json::to_string_pretty(&Catalog::builtin(version))?);
        }
    };

    Ok(())
}
