use std::{fs, path::PathBuf};

use cssgrade::{
    css::parse,
    grade::{Catalog, CatalogError, CatalogVersion, Check, TaskDefinition, TaskResult},
};
use uuid::Uuid;

fn temp_root() -> PathBuf {
    let root = std::env::temp_dir().join(format!("cssgrade-catalog-{}", Uuid::new_v4()));
    fs::create_dir_all(&root).expect("create temp root");
    root
}

fn task<'a>(results: &'a [TaskResult], id: &str) -> &'a TaskResult {
    results
        .iter()
        .find(|t| t.task_id == id)
        .expect("task present")
}

#[test]
fn builtin_catalogs_are_well_formed() {
    for version in [CatalogVersion::V1, CatalogVersion::V2] {
        let catalog = Catalog::builtin(version);

        assert!(catalog.validate().is_ok(), "{version}");
        assert_eq!(catalog.tasks.len(), 8);
        assert_eq!(catalog.max_task_marks(), 80);
        assert_eq!(catalog.version, version.to_string());
    }
}

#[test]
fn task_order_is_stable() {
    let ids: Vec<String> = Catalog::builtin(CatalogVersion::V2)
        .tasks
        .into_iter()
        .map(|t| t.id)
        .collect();

    assert_eq!(ids, (1..=8).map(|n| format!("TODO {n}")).collect::<Vec<_>>());
}

#[test]
fn versions_parse_from_strings() {
    assert_eq!("v1".parse::<CatalogVersion>().ok(), Some(CatalogVersion::V1));
    assert_eq!(" V2 ".parse::<CatalogVersion>().ok(), Some(CatalogVersion::V2));
    assert_eq!("2".parse::<CatalogVersion>().ok(), Some(CatalogVersion::V2));
    assert!(matches!("v9".parse::<CatalogVersion>(), Err(CatalogError::UnknownVersion(v)) if v == "v9"));
    assert_eq!(CatalogVersion::default(), CatalogVersion::V2);
}

#[test]
fn empty_stylesheet_satisfies_nothing() {
    let results = Catalog::builtin(CatalogVersion::V2).grade(&[]);

    assert_eq!(results.len(), 8);
    for result in &results {
        assert_eq!(result.earned_marks, 0, "{result}");
        assert_eq!(result.satisfied_count, 0);
        assert!(result.total_count > 0);
        assert!(result.outcomes.iter().all(|o| !o.matched_rule_found));
    }
}

#[test]
fn root_variables_and_reset_complete_the_first_task() {
    let rules = parse(":root { --brand: #000; --card: #fff; --muted: #999; } * { box-sizing: border-box; }");
    let results = Catalog::builtin(CatalogVersion::V1).grade(&rules);

    let first = task(&results, "TODO 1");
    assert_eq!(first.total_count, 4);
    assert!(first.is_complete());
    assert_eq!(first.earned_marks, 10);
}

#[test]
fn v2_accepts_alias_groups_that_v1_rejects() {
    let rules = parse(".bg-sample { max-width: 10rem; min-height: 4rem; background: teal }");

    let v1 = Catalog::builtin(CatalogVersion::V1).grade(&rules);
    let v2 = Catalog::builtin(CatalogVersion::V2).grade(&rules);

    assert_eq!(task(&v1, "TODO 3").satisfied_count, 1);
    assert_eq!(task(&v2, "TODO 3").satisfied_count, 3);
    assert_eq!(task(&v2, "TODO 3").total_count, task(&v1, "TODO 3").total_count);
}

#[test]
fn v2_discovers_extra_box_variants() {
    let rules = parse(".b1 { border: 1px solid } .b4 { background: red } .b10 {} .bx { color: red }");

    let v1 = Catalog::builtin(CatalogVersion::V1).grade(&rules);
    let v2 = Catalog::builtin(CatalogVersion::V2).grade(&rules);

    let variant_selectors = |result: &TaskResult| -> Vec<String> {
        result
            .outcomes
            .iter()
            .filter(|o| o.label == "unique style: background OR background-color OR border OR border-style")
            .map(|o| o.selector.clone())
            .collect()
    };

    assert_eq!(variant_selectors(task(&v1, "TODO 6")), vec![".b1", ".b2", ".b3"]);
    assert_eq!(
        variant_selectors(task(&v2, "TODO 6")),
        vec![".b1", ".b2", ".b3", ".b4", ".b10"]
    );

    let satisfied: Vec<bool> = task(&v2, "TODO 6")
        .outcomes
        .iter()
        .filter(|o| o.selector.starts_with(".b") && o.selector != ".box")
        .map(|o| o.satisfied)
        .collect();
    assert_eq!(satisfied, vec![true, false, false, true, false]);
}

#[test]
fn requirements_expand_deterministically() {
    let catalog = Catalog::builtin(CatalogVersion::V2);
    let rules = parse(".b5 { border: 0 } .box { width: 1px }");

    assert_eq!(catalog.grade(&rules), catalog.grade(&rules));
}

#[test]
fn catalog_round_trips_through_a_json_file() {
    let root = temp_root();
    let path = root.join("catalog.json");
    let catalog = Catalog::builtin(CatalogVersion::V2);

    fs::write(&path, serde_json::to_string_pretty(&catalog).expect("serialize catalog"))
        .expect("write catalog");
    let loaded = Catalog::from_json_file(&path).expect("load catalog");

    assert_eq!(loaded, catalog);
    let _ = fs::remove_dir_all(root);
}

#[test]
fn handwritten_catalog_without_aliases_loads() {
    let json = r#"{
        "version": "custom",
        "tasks": [
            {
                "id": "T1",
                "name": "Header",
                "max_marks": 50,
                "checks": [
                    { "check": "rule", "selector": "header" },
                    { "check": "properties", "selector": "header", "properties": ["color"] }
                ]
            }
        ]
    }"#;

    let catalog = Catalog::from_json(json, std::path::Path::new("inline.json")).expect("parse");
    assert!(catalog.aliases.is_empty());
    assert_eq!(catalog.tasks[0].checks[0], Check::rule("header"));

    let results = catalog.grade(&parse("header { background: red }"));
    assert_eq!(results[0].satisfied_count, 1);
    assert_eq!(results[0].earned_marks, 25);
}

#[test]
fn unreadable_and_invalid_catalog_files_are_reported() {
    let root = temp_root();

    let missing = Catalog::from_json_file(&root.join("missing.json"));
    assert!(matches!(missing, Err(CatalogError::Read { .. })));

    let broken = root.join("broken.json");
    fs::write(&broken, "{ not json").expect("write broken catalog");
    assert!(matches!(Catalog::from_json_file(&broken), Err(CatalogError::Parse { .. })));

    let _ = fs::remove_dir_all(root);
}

#[test]
fn validation_collects_every_problem() {
    let catalog = Catalog {
        version: "broken".to_string(),
        tasks:   vec![
            TaskDefinition::new("T1", "Empty", 10, vec![]),
            TaskDefinition::new("T1", "Dup", 10, vec![Check::rule(".a")]),
            TaskDefinition::new("T2", "No props", 10, vec![Check::any_of(".a", &[], "x")]),
        ],
        aliases: Default::default(),
    };

    let errors = catalog.validate().expect_err("catalog is broken");
    assert_eq!(errors.len(), 3);
    assert!(matches!(errors[0], CatalogError::EmptyTask(_)));
    assert!(matches!(errors[1], CatalogError::DuplicateTask(_)));
    assert!(matches!(errors[2], CatalogError::InvalidRequirement { .. }));

    let results = catalog.grade(&parse(".a { color: red }"));
    assert_eq!(results[0].earned_marks, 0);
    assert_eq!(results[0].total_count, 0);
}
