#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Deciding whether a submission is late from its commit history.

use std::{
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Field separator used in the `git log` format string.
const FIELD_SEPARATOR: char = '\u{1f}';

/// Author names of commits made by automation.
const AUTOMATED_AUTHORS: &[&str] = &["github-actions", "github classroom", "github-classroom"];

/// Errors raised while reading commit history.
#[derive(thiserror::Error, Debug)]
pub enum TimingError {
    /// `git` could not be started.
    #[error("Could not run git: {0}")]
    Spawn(#[from] std::io::Error),
    /// `git log` exited with an error.
    #[error("git log failed ({status}): {stderr}")]
    GitFailed {
        /// Exit status as displayed by the OS.
        status: String,
        /// What git printed to stderr.
        stderr: String,
    },
    /// A line of `git log` output could not be understood.
    #[error("Unexpected git log line: `{0}`")]
    Unparseable(String),
}

/// One commit as far as lateness is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commit {
    /// Commit time.
    pub timestamp:    DateTime<Utc>,
    /// Author name.
    pub author_name:  String,
    /// Author email.
    pub author_email: String,
}

impl Commit {
    /// Whether the commit was made by a bot or a CI workflow rather than the
    /// student.
    pub fn is_automated(&self) -> bool {
        let name = self.author_name.to_lowercase();
        let email = self.author_email.to_lowercase();
        name.ends_with("[bot]")
            || AUTOMATED_AUTHORS.contains(&name.as_str())
            || email.contains("[bot]@")
            || email == "action@github.com"
    }
}

/// Source of commit history.
pub trait CommitTimestampProvider {
    /// All commits of the submission, in any order.
    fn history(&self) -> Result<Vec<Commit>, TimingError>;
}

/// Reads history by running `git log` in a repository.
#[derive(Debug, Clone)]
pub struct GitHistory {
    /// Repository working directory.
    repo_dir: PathBuf,
}

impl GitHistory {
    /// History of the repository at `repo_dir`.
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
        }
    }

    /// Repository working directory.
    pub fn repo_dir(&self) -> &Path {
        &self.repo_dir
    }
}

/// Parses `git log --format=%ct%x1f%an%x1f%ae` output.
pub fn parse_git_log(output: &str) -> Result<Vec<Commit>, TimingError> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let mut fields = line.split(FIELD_SEPARATOR);
            let timestamp = fields
                .next()
                .and_then(|secs| secs.trim().parse::<i64>().ok())
                .and_then(|secs| DateTime::from_timestamp(secs, 0))
                .ok_or_else(|| TimingError::Unparseable(line.to_string()))?;
            Ok(Commit {
                timestamp,
                author_name: fields.next().unwrap_or_default().trim().to_string(),
                author_email: fields.next().unwrap_or_default().trim().to_string(),
            })
        })
        .collect()
}

impl CommitTimestampProvider for GitHistory {
    fn history(&self) -> Result<Vec<Commit>, TimingError> {
        let output = Command::new("git")
            .args(["log", "--format=%ct%x1f%an%x1f%ae"])
            .current_dir(&self.repo_dir)
            .stdin(Stdio::null())
            .output()?;

        if !output.status.success() {
            return Err(TimingError::GitFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_git_log(&String::from_utf8_lossy(&output.stdout))
    }
}

/// The time a submission counts as handed in: the latest commit by a human,
/// or the latest commit overall if every commit is automated.
pub fn submission_time(commits: &[Commit]) -> Option<DateTime<Utc>> {
    commits
        .iter()
        .filter(|c| !c.is_automated())
        .map(|c| c.timestamp)
        .max()
        .or_else(|| commits.iter().map(|c| c.timestamp).max())
}

/// Whether a submission is late, and the commit time that decided it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Timeliness {
    /// Deciding commit time, `None` if it could not be determined.
    pub commit_time: Option<DateTime<Utc>>,
    /// Whether it is after the cutoff.
    pub late:        bool,
}

/// Compares the submission time from `provider` with `due`.
///
/// If history cannot be read or is empty the submission is treated as on
/// time.
pub fn assess_timeliness(provider: &dyn CommitTimestampProvider, due: DateTime<Utc>) -> Timeliness {
    let commits = match provider.history() {
        Ok(commits) => commits,
        Err(e) => {
            tracing::warn!("Could not read commit history, assuming on time: {e}");
            return Timeliness::default();
        }
    };

    match submission_time(&commits) {
        Some(commit_time) => {
            let late = commit_time > due;
            tracing::info!("Submission time {commit_time} (late: {late}).");
            Timeliness {
                commit_time: Some(commit_time),
                late,
            }
        }
        None => {
            tracing::warn!("No commits found, assuming on time.");
            Timeliness::default()
        }
    }
}
