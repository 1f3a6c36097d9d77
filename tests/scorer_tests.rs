use cssgrade::grade::{RequirementOutcome, Status, TaskResult, score};

fn outcome(satisfied: bool) -> RequirementOutcome {
    RequirementOutcome::builder()
        .selector(".a")
        .label("color")
        .satisfied(satisfied)
        .matched_rule_found(true)
        .build()
}

fn task(id: &str, max_marks: u32, satisfied: usize, total: usize) -> TaskResult {
    let outcomes = (0..total).map(|i| outcome(i < satisfied)).collect();
    TaskResult::from_outcomes(id, "Task", max_marks, outcomes)
}

#[test]
fn three_of_four_rounds_up_to_eight() {
    assert_eq!(task("T", 10, 3, 4).earned_marks, 8);
}

#[test]
fn absent_submission_zeroes_everything() {
    let report = score("alice", vec![task("T1", 10, 4, 4), task("T2", 10, 2, 4)], false, false);

    assert_eq!(report.status, Status::Ungradable);
    assert_eq!(report.status.code(), 2);
    assert_eq!(report.submission_marks, 0);
    assert_eq!(report.total_marks, 0);
    assert!(report.task_results.iter().all(|t| t.earned_marks == 0));
    assert_eq!(report.task_results[0].satisfied_count, 4);
}

#[test]
fn on_time_submission_earns_twenty() {
    let report = score("alice", vec![task("T1", 10, 4, 4), task("T2", 10, 0, 3)], true, false);

    assert_eq!(report.status, Status::OnTime);
    assert_eq!(report.submission_marks, 20);
    assert_eq!(report.obtained_task_marks(), 10);
    assert_eq!(report.total_marks, 30);
}

#[test]
fn late_submission_earns_ten() {
    let report = score("alice", vec![task("T1", 10, 1, 2)], true, true);

    assert_eq!(report.status, Status::Late);
    assert_eq!(report.status.code(), 1);
    assert_eq!(report.submission_marks, 10);
    assert_eq!(report.total_marks, 15);
}

#[test]
fn nothing_implemented_is_ungradable_but_keeps_submission_marks() {
    let late = score("bob", vec![task("T1", 10, 0, 3)], true, true);
    assert_eq!(late.status, Status::Ungradable);
    assert_eq!(late.submission_marks, 10);
    assert_eq!(late.total_marks, 10);

    let on_time = score("bob", vec![task("T1", 10, 0, 3)], true, false);
    assert_eq!(on_time.status, Status::Ungradable);
    assert_eq!(on_time.total_marks, 20);
}

#[test]
fn total_never_exceeds_one_hundred() {
    let tasks = (1..=10).map(|n| task(&format!("T{n}"), 10, 1, 1)).collect();
    let report = score("carol", tasks, true, false);

    assert_eq!(report.obtained_task_marks(), 100);
    assert_eq!(report.total_marks, 100);
    assert_eq!(report.max_marks(), 100);
}

#[test]
fn inflated_task_marks_clamp_instead_of_overflowing() {
    let huge = u32::MAX / 2;
    let tasks = vec![task("T1", huge, 1, 1), task("T2", huge, 1, 1), task("T3", huge, 1, 1)];
    let report = score("carol", tasks, true, false);

    assert_eq!(report.task_results[0].earned_marks, huge);
    assert_eq!(report.obtained_task_marks(), u32::MAX);
    assert_eq!(report.total_marks, 100);
    assert_eq!(report.status, Status::OnTime);
}

#[test]
fn status_displays_as_its_code() {
    assert_eq!(Status::OnTime.to_string(), "0");
    assert_eq!(Status::Late.to_string(), "1");
    assert_eq!(Status::Ungradable.to_string(), "2");
}
