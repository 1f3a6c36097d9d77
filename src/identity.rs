#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use crate::constants::FALLBACK_STUDENT_ID;

/// Resolves the student identifier from CI metadata read through `lookup`.
///
/// Order: `STUDENT_USERNAME`, the suffix after the last `-` of the repository
/// name in `GITHUB_REPOSITORY` (classroom repos end with the username),
/// `GITHUB_ACTOR`, the repository name, then `"student"`. Blank values are
/// skipped.
pub fn resolve_student_id<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| {
        lookup(key)
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
    };

    let repo_name = get("GITHUB_REPOSITORY").map(|full| match full.split_once('/') {
        Some((_, name)) => name.to_string(),
        None => full,
    });
    let repo_suffix = repo_name
        .as_deref()
        .and_then(|name| name.rsplit_once('-'))
        .map(|(_, suffix)| suffix.to_string())
        .filter(|suffix| !suffix.is_empty());

    get("STUDENT_USERNAME")
        .or(repo_suffix)
        .or_else(|| get("GITHUB_ACTOR"))
        .or(repo_name.filter(|name| !name.is_empty()))
        .unwrap_or_else(|| FALLBACK_STUDENT_ID.to_string())
}

/// Resolves the student identifier from the process environment.
pub fn student_id_from_env() -> String {
    resolve_student_id(|key| std::env::var(key).ok())
}
