#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::{Path, PathBuf};

use bon::Builder;
use chrono::{DateTime, FixedOffset, Utc};

use crate::{
    constants::{ARTIFACTS_DIR, DEFAULT_DUE, DEFAULT_STYLESHEET},
    grade::{Catalog, CatalogError, CatalogVersion},
};

/// Errors raised while reading configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The due instant is not RFC 3339.
    #[error("`{value}` is not a valid RFC 3339 due date: {source}")]
    InvalidDue {
        /// The rejected value.
        value:  String,
        /// Why chrono rejected it.
        source: chrono::ParseError,
    },
    /// The catalog version is unknown.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Parses an RFC 3339 instant, eg. `2025-10-09T23:59:00+03:00`.
pub fn parse_due(value: &str) -> Result<DateTime<FixedOffset>, ConfigError> {
    DateTime::parse_from_rfc3339(value.trim()).map_err(|source| ConfigError::InvalidDue {
        value: value.to_string(),
        source,
    })
}

/// The built-in late cutoff.
fn default_due() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(DEFAULT_DUE).unwrap_or_default()
}

/// Settings for one grading run. Built once, never mutated.
#[derive(Debug, Clone, Builder)]
#[builder(on(PathBuf, into), on(String, into))]
pub struct GraderConfig {
    /// Commits after this instant are late.
    #[builder(default = default_due())]
    due:               DateTime<FixedOffset>,
    /// Built-in catalog to grade with.
    #[builder(default)]
    catalog_version:   CatalogVersion,
    /// External catalog file, takes precedence over `catalog_version`.
    catalog_path:      Option<PathBuf>,
    /// Stylesheet file name tried first.
    #[builder(default = DEFAULT_STYLESHEET.to_string())]
    default_file_name: String,
    /// Directory holding the submission.
    #[builder(default = PathBuf::from("."))]
    root_dir:          PathBuf,
    /// Where grade records and feedback are written.
    #[builder(default = PathBuf::from(ARTIFACTS_DIR))]
    artifacts_dir:     PathBuf,
}

impl Default for GraderConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl GraderConfig {
    /// Reads overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads overrides through `lookup`. Unset or blank values keep their
    /// defaults, and so does any value that does not parse. Every other
    /// override still applies.
    ///
    /// * `CSSGRADE_DUE`: RFC 3339 late cutoff
    /// * `CSSGRADE_CATALOG`: `v1` or `v2`
    /// * `CSSGRADE_CATALOG_PATH`: JSON catalog file
    /// * `CSSGRADE_STYLESHEET`: stylesheet file name tried first
    /// * `CSSGRADE_ROOT`: submission directory
    /// * `CSSGRADE_ARTIFACTS_DIR`: output directory
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let (config, errors) = Self::read_lookup(lookup);
        for e in errors {
            tracing::error!("{e}; keeping the default for this setting");
        }
        config
    }

    /// Like [`GraderConfig::from_lookup`], but fails on the first value that
    /// does not parse.
    pub fn try_from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (config, mut errors) = Self::read_lookup(lookup);
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors.remove(0))
        }
    }

    /// Builds the config field by field, collecting the values that were
    /// rejected.
    fn read_lookup<F>(lookup: F) -> (Self, Vec<ConfigError>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };
        let mut errors = Vec::new();

        let due = get("CSSGRADE_DUE").and_then(|v| parse_due(&v).map_err(|e| errors.push(e)).ok());
        let catalog_version = get("CSSGRADE_CATALOG").and_then(|v| {
            v.parse::<CatalogVersion>()
                .map_err(|e| errors.push(ConfigError::from(e)))
                .ok()
        });

        let config = Self::builder()
            .maybe_due(due)
            .maybe_catalog_version(catalog_version)
            .maybe_catalog_path(get("CSSGRADE_CATALOG_PATH").map(PathBuf::from))
            .maybe_default_file_name(get("CSSGRADE_STYLESHEET"))
            .maybe_root_dir(get("CSSGRADE_ROOT").map(PathBuf::from))
            .maybe_artifacts_dir(get("CSSGRADE_ARTIFACTS_DIR").map(PathBuf::from))
            .build();
        (config, errors)
    }

    /// Late cutoff.
    pub fn due(&self) -> DateTime<FixedOffset> {
        self.due
    }

    /// Late cutoff in UTC.
    pub fn due_utc(&self) -> DateTime<Utc> {
        self.due.with_timezone(&Utc)
    }

    /// Built-in catalog version.
    pub fn catalog_version(&self) -> CatalogVersion {
        self.catalog_version
    }

    /// External catalog file, if any.
    pub fn catalog_path(&self) -> Option<&Path> {
        self.catalog_path.as_deref()
    }

    /// Stylesheet file name tried first.
    pub fn default_file_name(&self) -> &str {
        &self.default_file_name
    }

    /// Submission directory.
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Output directory.
    pub fn artifacts_dir(&self) -> &Path {
        &self.artifacts_dir
    }

    /// Loads the catalog this run grades with.
    pub fn load_catalog(&self) -> Result<Catalog, CatalogError> {
        match &self.catalog_path {
            Some(path) => Catalog::from_json_file(path),
            None => Ok(Catalog::builtin(self.catalog_version)),
        }
    }
}
