#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Finding the stylesheet a student handed in.

use std::{
    fmt,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;

use crate::{constants::HTML_ENTRY_POINT, util::find_files};

/// Matches a whole `<link ...>` tag.
static LINK_TAG: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?is)<link\b[^>]*>").ok());
/// Matches the `rel` attribute of a tag.
static REL_ATTR: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"(?i)\brel\s*=\s*["']?([^"'>]+)"#).ok());
/// Matches the `href` attribute of a tag.
static HREF_ATTR: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"(?i)\bhref\s*=\s*["']([^"']+)["']"#).ok());

/// Directories never searched for stray stylesheets.
const SKIPPED_DIRS: &[&str] = &["node_modules", "artifacts", ".git"];

/// How a stylesheet was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StylesheetOrigin {
    /// The expected file name at the submission root.
    DefaultFile,
    /// Linked from the HTML entry point.
    HtmlLink,
    /// The first `.css` file found anywhere in the submission.
    DirectoryScan,
}

impl fmt::Display for StylesheetOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StylesheetOrigin::DefaultFile => write!(f, "default file name"),
            StylesheetOrigin::HtmlLink => write!(f, "link in `{HTML_ENTRY_POINT}`"),
            StylesheetOrigin::DirectoryScan => write!(f, "directory scan"),
        }
    }
}

/// A located stylesheet and its contents.
#[derive(Debug, Clone, Serialize)]
pub struct Stylesheet {
    /// Where it was read from.
    pub path:   PathBuf,
    /// How it was found.
    pub origin: StylesheetOrigin,
    /// Its text.
    #[serde(skip)]
    pub text:   String,
}

impl Stylesheet {
    /// Reads the stylesheet at `path`.
    pub fn read(path: &Path, origin: StylesheetOrigin) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read stylesheet {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            origin,
            text,
        })
    }

    /// A stylesheet with only whitespace in it is not a submission.
    pub fn is_gradable(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// Stylesheet hrefs linked from an HTML document, in document order.
/// Remote and data URLs are skipped.
pub fn linked_stylesheets(html: &str) -> Vec<String> {
    let (Some(link), Some(rel), Some(href)) =
        (LINK_TAG.as_ref(), REL_ATTR.as_ref(), HREF_ATTR.as_ref())
    else {
        return Vec::new();
    };

    link.find_iter(html)
        .map(|tag| tag.as_str())
        .filter(|tag| {
            rel.captures(tag)
                .and_then(|c| c.get(1))
                .is_some_and(|r| {
                    r.as_str()
                        .split_whitespace()
                        .any(|v| v.eq_ignore_ascii_case("stylesheet"))
                })
        })
        .filter_map(|tag| href.captures(tag).and_then(|c| c.get(1)))
        .map(|m| m.as_str().trim().to_string())
        .filter(|h| !h.is_empty() && !is_remote(h))
        .collect()
}

/// Whether an href points outside the submission.
fn is_remote(href: &str) -> bool {
    let lower = href.to_ascii_lowercase();
    lower.starts_with("http://")
        || lower.starts_with("https://")
        || lower.starts_with("//")
        || lower.starts_with("data:")
}

/// Resolves an href against the submission root, dropping query strings and
/// fragments.
fn resolve_href(root: &Path, href: &str) -> PathBuf {
    let path = href
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_start_matches("./")
        .trim_start_matches('/');
    root.join(path)
}

/// Whether `path` sits below a directory that is never searched.
fn in_skipped_dir(root: &Path, path: &Path) -> bool {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .any(|c| SKIPPED_DIRS.iter().any(|d| c.as_os_str() == *d))
}

/// Reads a candidate, logging and discarding read failures.
fn try_read(path: &Path, origin: StylesheetOrigin) -> Option<Stylesheet> {
    match Stylesheet::read(path, origin) {
        Ok(sheet) => Some(sheet),
        Err(e) => {
            tracing::warn!("{e:#}");
            None
        }
    }
}

/// Finds the student's stylesheet below `root`.
///
/// Tries `default_file_name`, then the stylesheets linked from
/// `index.html`, then the shallowest `.css` file anywhere in the tree.
/// Returns `None` when nothing readable is found.
pub fn locate_stylesheet(root: &Path, default_file_name: &str) -> Option<Stylesheet> {
    let default = root.join(default_file_name);
    if default.is_file() {
        tracing::info!("Found `{}`.", default.display());
        if let Some(sheet) = try_read(&default, StylesheetOrigin::DefaultFile) {
            return Some(sheet);
        }
    }

    let html_path = root.join(HTML_ENTRY_POINT);
    if let Ok(html) = std::fs::read_to_string(&html_path) {
        for href in linked_stylesheets(&html) {
            let candidate = resolve_href(root, &href);
            if candidate.is_file() {
                tracing::info!("Using `{}` linked from {HTML_ENTRY_POINT}.", candidate.display());
                if let Some(sheet) = try_read(&candidate, StylesheetOrigin::HtmlLink) {
                    return Some(sheet);
                }
            } else {
                tracing::debug!("Linked stylesheet `{href}` does not exist.");
            }
        }
    }

    let mut found = match find_files("css", 1, root) {
        Ok(files) => files,
        Err(e) => {
            tracing::warn!("Could not search {} for stylesheets: {e:#}", root.display());
            Vec::new()
        }
    };
    found.retain(|p| !in_skipped_dir(root, p));
    found.sort_by_key(|p| (p.components().count(), p.clone()));

    let sheet = found
        .iter()
        .find_map(|p| try_read(p, StylesheetOrigin::DirectoryScan));
    match &sheet {
        Some(s) => tracing::info!("Falling back to `{}`.", s.path.display()),
        None => tracing::warn!("No stylesheet found under {}.", root.display()),
    }
    sheet
}
