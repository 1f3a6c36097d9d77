use std::{fs, path::PathBuf};

use chrono::DateTime;
use cssgrade::{
    grade::{Catalog, CatalogVersion, GradeReport, RequirementOutcome},
    grade_stylesheet,
    report::{RunContext, csv_record, markdown_summary, overview_table, task_feedback, write_artifacts},
};
use uuid::Uuid;

fn context(gradable: bool) -> RunContext {
    RunContext {
        stylesheet: gradable.then(|| PathBuf::from("styles.css")),
        gradable,
        due: DateTime::parse_from_rfc3339("2025-10-09T23:59:00+03:00").expect("valid due"),
        commit_time: None,
        catalog: "v2".to_string(),
    }
}

fn graded(css: Option<&str>, late: bool) -> GradeReport {
    grade_stylesheet(&Catalog::builtin(CatalogVersion::V2), "alice", css, late)
}

#[test]
fn csv_record_has_fixed_header_and_one_row() {
    let report = graded(Some(":root { --brand: red }"), true);

    assert_eq!(
        csv_record(&report),
        "student_username,obtained_marks,total_marks,status\nalice,13,100,1\n"
    );
}

#[test]
fn csv_record_for_missing_submission() {
    assert_eq!(
        csv_record(&graded(None, false)),
        "student_username,obtained_marks,total_marks,status\nalice,0,100,2\n"
    );
}

#[test]
fn csv_record_keeps_one_row_for_awkward_student_ids() {
    let mut report = graded(None, false);
    report.student_id = " a,b\nc\r\"d\" ".to_string();

    let csv = csv_record(&report);
    assert_eq!(
        csv,
        "student_username,obtained_marks,total_marks,status\na_b_c__d_,0,100,2\n"
    );
    assert_eq!(csv.lines().count(), 2);
}

#[test]
fn feedback_groups_outcomes_by_selector() {
    let outcomes = vec![
        RequirementOutcome::builder()
            .selector(".card")
            .label("box-shadow")
            .satisfied(true)
            .matched_rule_found(true)
            .build(),
        RequirementOutcome::builder()
            .selector(".card")
            .label("color")
            .matched_rule_found(true)
            .hint("Declare `color` inside `.card`".to_string())
            .build(),
        RequirementOutcome::builder()
            .selector(".tagline")
            .label("color")
            .hint("Add a rule for selector `.tagline`".to_string())
            .build(),
    ];

    assert_eq!(task_feedback(&outcomes), vec![
        "- ✅ Selector `.card`",
        "  - Implemented: box-shadow",
        "  - Missing: color",
        "  - Hint: Declare `color` inside `.card`",
        "- ❌ Missing rule for selector `.tagline`",
        "  - Required: color",
    ]);
}

#[test]
fn fully_implemented_selector_has_no_missing_items() {
    let outcomes = vec![
        RequirementOutcome::builder()
            .selector("*")
            .label("box-sizing")
            .satisfied(true)
            .matched_rule_found(true)
            .build(),
    ];

    assert_eq!(task_feedback(&outcomes), vec![
        "- ✅ Selector `*`",
        "  - Implemented: box-sizing",
        "  - Missing: —",
    ]);
}

#[test]
fn summary_lists_every_task_and_the_total() {
    let report = graded(Some("* { box-sizing: border-box }"), false);
    let summary = markdown_summary(&report, &context(true));

    assert!(summary.contains("- Student: `alice`"));
    assert!(summary.contains("✅ Found `styles.css`."));
    assert!(summary.contains("| TODO 1: CSS Variables + Global Box-Sizing Reset | 3/10 |"));
    assert!(summary.contains("| Submission | 20/20 |"));
    assert!(summary.contains("**23 / 100**"));
    assert!(summary.contains("- Commit time: `unknown`"));
    assert!(summary.contains("- ❌ Missing rule for selector `:root`"));
    assert!(!summary.contains("Status=2"));
}

#[test]
fn summary_sections_are_separated_by_blank_lines() {
    let summary = markdown_summary(&graded(Some(":root { --brand: red }"), false), &context(true));

    assert!(summary.starts_with("# Lab | 3-2 More CSS | Autograding Summary\n\n- Student: `alice`\n"));
    assert!(summary.contains("\n\n## Marks Breakdown\n\n| Item | Marks |\n|------|------:|\n| TODO 1:"));
    assert!(summary.contains("| Submission | 20/20 |\n\n## Total Marks\n\n**"));
    assert!(summary.contains("\n\n## Detailed Feedback (Implemented vs Missed)\n\n### TODO 1:"));
    assert!(summary.ends_with('\n'));
    assert!(!summary.ends_with("\n\n"));
}

#[test]
fn summary_explains_missing_submission() {
    let report = graded(None, false);
    let summary = markdown_summary(&report, &context(false));

    assert!(summary.contains("❌ No stylesheet found → tasks cannot be detected (0/80)."));
    assert!(summary.contains("No gradable stylesheet: submission marks = 0/20."));
    assert!(summary.contains("⚠️ **Status=2:**"));
}

#[test]
fn overview_table_shows_totals() {
    let table = overview_table(&graded(Some("* { box-sizing: border-box }"), true));

    assert!(table.contains("Grading Overview"));
    assert!(table.contains("Total: 13/100 (status 1)"));
    assert!(table.contains("Submission"));
}

#[test]
fn artifacts_are_written_and_summary_appended() {
    let root = std::env::temp_dir().join(format!("cssgrade-report-{}", Uuid::new_v4()));
    let step_summary = root.join("step-summary.md");
    fs::create_dir_all(&root).expect("create temp root");
    fs::write(&step_summary, "previous step\n").expect("seed step summary");

    let report = graded(Some("* { box-sizing: border-box }"), false);
    let ctx = context(true);
    write_artifacts(&root.join("artifacts"), &report, &ctx, Some(&step_summary))
        .expect("write artifacts");

    let csv = fs::read_to_string(root.join("artifacts/grade.csv")).expect("read csv");
    let readme =
        fs::read_to_string(root.join("artifacts/feedback/README.md")).expect("read feedback");
    let appended = fs::read_to_string(&step_summary).expect("read step summary");

    assert_eq!(csv, csv_record(&report));
    assert_eq!(readme, markdown_summary(&report, &ctx));
    assert_eq!(appended, format!("previous step\n{readme}"));

    let _ = fs::remove_dir_all(root);
}
