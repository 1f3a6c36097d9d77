use std::collections::HashMap;

use cssgrade::identity::resolve_student_id;

fn resolve(vars: &[(&str, &str)]) -> String {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    resolve_student_id(|key| vars.get(key).cloned())
}

#[test]
fn explicit_username_wins() {
    let id = resolve(&[
        ("STUDENT_USERNAME", "alice"),
        ("GITHUB_REPOSITORY", "course/lab-3-2-bob"),
        ("GITHUB_ACTOR", "carol"),
    ]);
    assert_eq!(id, "alice");
}

#[test]
fn classroom_repository_suffix_is_next() {
    let id = resolve(&[("GITHUB_REPOSITORY", "course/lab-3-2-bob"), ("GITHUB_ACTOR", "carol")]);
    assert_eq!(id, "bob");
}

#[test]
fn actor_is_used_when_repository_has_no_suffix() {
    let id = resolve(&[("GITHUB_REPOSITORY", "course/lab"), ("GITHUB_ACTOR", "carol")]);
    assert_eq!(id, "carol");
}

#[test]
fn repository_name_then_fallback() {
    assert_eq!(resolve(&[("GITHUB_REPOSITORY", "course/lab")]), "lab");
    assert_eq!(resolve(&[]), "student");
}

#[test]
fn blank_values_are_skipped() {
    let id = resolve(&[("STUDENT_USERNAME", "   "), ("GITHUB_REPOSITORY", "course/lab-"), ("GITHUB_ACTOR", " dana ")]);
    assert_eq!(id, "dana");
}
