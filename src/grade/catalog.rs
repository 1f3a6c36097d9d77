#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! The graded tasks of the "More CSS" lab.
//!
//! A catalog is reviewed data: changing it changes grades. Tasks are built
//! from [`Check`] recipes which expand into [`Requirement`]s once the
//! stylesheet is known, so the same sheet always yields the same list.

use std::{
    collections::{BTreeMap, BTreeSet, HashSet},
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use super::{
    requirement::{Requirement, RequirementError, evaluate},
    results::{RequirementOutcome, TaskResult},
};
use crate::css::{StyleRule, normalize_selector};

/// Property name to the names accepted in its place.
pub type AliasTable = BTreeMap<String, Vec<String>>;

/// Errors raised while loading or checking a catalog.
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    /// Version string that names no built-in catalog.
    #[error("Unknown catalog version `{0}` (expected `v1` or `v2`).")]
    UnknownVersion(String),
    /// The catalog file could not be read.
    #[error("Could not read catalog file `{path}`: {source}")]
    Read {
        /// Path that was read.
        path:   PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// The catalog file is not a valid catalog.
    #[error("Could not parse catalog file `{path}`: {source}")]
    Parse {
        /// Path that was parsed.
        path:   PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
    /// A task expands to no requirements.
    #[error("Task `{0}` has no requirements.")]
    EmptyTask(String),
    /// Two tasks share an id.
    #[error("Task id `{0}` appears more than once.")]
    DuplicateTask(String),
    /// A task contains a malformed requirement.
    #[error("Task `{task}` contains an invalid requirement: {source}")]
    InvalidRequirement {
        /// Id of the task.
        task:   String,
        /// What is wrong with the requirement.
        source: RequirementError,
    },
}

/// A recipe for one or more requirements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum Check {
    /// A rule for the selector must exist.
    Rule {
        /// Target selector.
        selector: String,
    },
    /// Each property must be declared by a rule for the selector. One
    /// requirement per property.
    Properties {
        /// Target selector.
        selector:   String,
        /// Required properties.
        properties: Vec<String>,
    },
    /// At least one of the properties must be declared. One requirement.
    AnyOf {
        /// Target selector.
        selector:   String,
        /// Accepted properties.
        properties: Vec<String>,
        /// Name of the effect being checked for.
        label:      String,
    },
    /// `:root` must define each custom property. Names are given without
    /// their leading dashes.
    RootVariables {
        /// Required custom properties.
        names: Vec<String>,
    },
    /// Numbered variant classes (`.b1`, `.b2`, ...) each need one of the
    /// properties. Variants `1..=minimum` are always required, further ones
    /// only when the stylesheet has a rule for them.
    VariantFamily {
        /// Selector prefix the variant number is appended to.
        prefix:     String,
        /// Number of variants always required.
        minimum:    u32,
        /// Accepted properties.
        properties: Vec<String>,
        /// Name of the effect being checked for.
        label:      String,
    },
}

impl Check {
    /// See [`Check::Rule`].
    pub fn rule(selector: &str) -> Self {
        Check::Rule {
            selector: selector.to_string(),
        }
    }

    /// See [`Check::Properties`].
    pub fn properties(selector: &str, properties: &[&str]) -> Self {
        Check::Properties {
            selector:   selector.to_string(),
            properties: to_strings(properties),
        }
    }

    /// See [`Check::AnyOf`].
    pub fn any_of(selector: &str, properties: &[&str], label: &str) -> Self {
        Check::AnyOf {
            selector:   selector.to_string(),
            properties: to_strings(properties),
            label:      label.to_string(),
        }
    }

    /// See [`Check::RootVariables`].
    pub fn root_variables(names: &[&str]) -> Self {
        Check::RootVariables {
            names: to_strings(names),
        }
    }

    /// See [`Check::VariantFamily`].
    pub fn variant_family(prefix: &str, minimum: u32, properties: &[&str], label: &str) -> Self {
        Check::VariantFamily {
            prefix: prefix.to_string(),
            minimum,
            properties: to_strings(properties),
            label: label.to_string(),
        }
    }

    /// Expands the recipe into concrete requirements for `rules`.
    pub fn expand(&self, rules: &[StyleRule], aliases: &AliasTable) -> Vec<Requirement> {
        match self {
            Check::Rule { selector } => vec![Requirement::rule_exists(selector)],
            Check::Properties {
                selector,
                properties,
            } => properties
                .iter()
                .map(|property| match aliases.get(property.as_str()) {
                    Some(group) if !group.is_empty() => {
                        Requirement::aliased(selector, property, group)
                    }
                    _ => Requirement::property_present(selector, property),
                })
                .collect(),
            Check::AnyOf {
                selector,
                properties,
                label,
            } => vec![Requirement::any_of(selector, properties, label)],
            Check::RootVariables { names } => names
                .iter()
                .map(|name| Requirement::variable_defined(name))
                .collect(),
            Check::VariantFamily {
                prefix,
                minimum,
                properties,
                label,
            } => variant_numbers(rules, prefix, *minimum)
                .into_iter()
                .map(|n| Requirement::any_of(&format!("{prefix}{n}"), properties, label))
                .collect(),
        }
    }
}

/// Owned copies of a static list of names.
fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Variant numbers to check: `1..=minimum` plus every `{prefix}{n}` selector
/// present in `rules`, ascending.
fn variant_numbers(rules: &[StyleRule], prefix: &str, minimum: u32) -> BTreeSet<u32> {
    let prefix = normalize_selector(prefix);
    let mut numbers: BTreeSet<u32> = (1..=minimum).collect();
    numbers.extend(rules.iter().filter_map(|rule| {
        let suffix = rule.selector().strip_prefix(prefix.as_str())?;
        if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        suffix.parse::<u32>().ok().filter(|n| *n > 0)
    }));
    numbers
}

/// One graded task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDefinition {
    /// Short id, eg. `TODO 3`.
    pub id:        String,
    /// Title shown in feedback.
    pub name:      String,
    /// Marks available for the task.
    pub max_marks: u32,
    /// Requirement recipes, in feedback order.
    pub checks:    Vec<Check>,
}

impl TaskDefinition {
    /// Creates a task.
    pub fn new(id: &str, name: &str, max_marks: u32, checks: Vec<Check>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            max_marks,
            checks,
        }
    }

    /// Concrete requirements of this task for the given stylesheet.
    pub fn requirements(&self, rules: &[StyleRule], aliases: &AliasTable) -> Vec<Requirement> {
        self.checks
            .iter()
            .flat_map(|check| check.expand(rules, aliases))
            .collect()
    }

    /// Evaluates every requirement and aggregates the marks.
    pub fn grade(&self, rules: &[StyleRule], aliases: &AliasTable) -> TaskResult {
        let outcomes = self
            .requirements(rules, aliases)
            .iter()
            .map(|requirement| {
                if let Err(e) = requirement.validate() {
                    tracing::warn!("Task `{}`: {e}", self.id);
                }
                RequirementOutcome::new(requirement, evaluate(rules, requirement))
            })
            .collect();

        TaskResult::from_outcomes(&self.id, &self.name, self.max_marks, outcomes)
    }
}

/// Built-in catalog versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogVersion {
    /// Exact property names, fixed `.b1`-`.b3` box variants.
    V1,
    /// Documented alias groups and any number of `.bN` box variants.
    #[default]
    V2,
}

impl fmt::Display for CatalogVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogVersion::V1 => write!(f, "v1"),
            CatalogVersion::V2 => write!(f, "v2"),
        }
    }
}

impl FromStr for CatalogVersion {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v1" | "1" => Ok(CatalogVersion::V1),
            "v2" | "2" => Ok(CatalogVersion::V2),
            other => Err(CatalogError::UnknownVersion(other.to_string())),
        }
    }
}

/// An ordered list of tasks plus the alias groups they are graded with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Version tag, reported alongside grades.
    pub version: String,
    /// Tasks in report order.
    pub tasks:   Vec<TaskDefinition>,
    /// Alias groups applied to [`Check::Properties`].
    #[serde(default)]
    pub aliases: AliasTable,
}

impl Catalog {
    /// Returns a built-in catalog.
    pub fn builtin(version: CatalogVersion) -> Self {
        match version {
            CatalogVersion::V1 => Self {
                version: version.to_string(),
                tasks:   more_css_tasks(BoxVariants::Fixed),
                aliases: AliasTable::new(),
            },
            CatalogVersion::V2 => Self {
                version: version.to_string(),
                tasks:   more_css_tasks(BoxVariants::Discovered),
                aliases: default_aliases(),
            },
        }
    }

    /// Parses a catalog from JSON.
    pub fn from_json(json: &str, origin: &Path) -> Result<Self, CatalogError> {
        serde_json::from_str(json).map_err(|source| CatalogError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Reads and parses a catalog file.
    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json, path)
    }

    /// Sum of the marks of all tasks.
    pub fn max_task_marks(&self) -> u32 {
        self.tasks
            .iter()
            .fold(0u32, |sum, t| sum.saturating_add(t.max_marks))
    }

    /// Reports every structural problem in the catalog. Checked against an
    /// empty stylesheet, so only the statically required part of a variant
    /// family counts.
    pub fn validate(&self) -> Result<(), Vec<CatalogError>> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for task in &self.tasks {
            if !seen.insert(task.id.as_str()) {
                errors.push(CatalogError::DuplicateTask(task.id.clone()));
            }

            let requirements = task.requirements(&[], &self.aliases);
            if requirements.is_empty() {
                errors.push(CatalogError::EmptyTask(task.id.clone()));
            }
            errors.extend(requirements.iter().filter_map(|r| {
                r.validate()
                    .err()
                    .map(|source| CatalogError::InvalidRequirement {
                        task: task.id.clone(),
                        source,
                    })
            }));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Grades every task against `rules`, in catalog order.
    pub fn grade(&self, rules: &[StyleRule]) -> Vec<TaskResult> {
        self.tasks
            .iter()
            .map(|task| task.grade(rules, &self.aliases))
            .collect()
    }
}

/// How the `.box` variants of TODO 6 are checked.
#[derive(Debug, Clone, Copy)]
enum BoxVariants {
    /// Exactly `.b1`, `.b2`, `.b3`.
    Fixed,
    /// `.b1`-`.b3` plus any further `.bN` in the sheet.
    Discovered,
}

/// Properties accepted as a box variant's unique style.
const UNIQUE_STYLE: &[&str] = &["background", "background-color", "border", "border-style"];

/// Alias groups of the v2 catalog.
fn default_aliases() -> AliasTable {
    let groups: [(&str, &[&str]); 7] = [
        ("width", &["width", "max-width", "min-width", "inline-size"]),
        ("height", &["height", "min-height", "max-height", "block-size"]),
        ("background", &["background", "background-color"]),
        ("background-color", &["background-color", "background"]),
        ("border", &["border", "border-width", "border-style", "border-color"]),
        ("padding", &["padding", "padding-inline", "padding-block"]),
        ("gap", &["gap", "row-gap", "column-gap"]),
    ];
    groups
        .into_iter()
        .map(|(name, group)| (name.to_string(), to_strings(group)))
        .collect()
}

/// The eight TODOs of the lab, 10 marks each.
fn more_css_tasks(box_variants: BoxVariants) -> Vec<TaskDefinition> {
    let variant_checks = match box_variants {
        BoxVariants::Fixed => vec![
            Check::any_of(".b1", UNIQUE_STYLE, "unique style"),
            Check::any_of(".b2", UNIQUE_STYLE, "unique style"),
            Check::any_of(".b3", UNIQUE_STYLE, "unique style"),
        ],
        BoxVariants::Discovered => {
            vec![Check::variant_family(".b", 3, UNIQUE_STYLE, "unique style")]
        }
    };

    vec![
        TaskDefinition::new(
            "TODO 1",
            "CSS Variables + Global Box-Sizing Reset",
            10,
            vec![
                Check::root_variables(&["brand", "card", "muted"]),
                Check::properties("*", &["box-sizing"]),
            ],
        ),
        TaskDefinition::new(
            "TODO 2",
            "Header/Footer Card Background + Tagline + Card Shadow",
            10,
            vec![
                Check::any_of(".site-header", &["background", "background-color"], "background"),
                Check::any_of(".site-footer", &["background", "background-color"], "background"),
                Check::properties(".tagline", &["color"]),
                Check::properties(".card", &["box-shadow"]),
            ],
        ),
        TaskDefinition::new(
            "TODO 3",
            "Color Demo + Background Sample Block",
            10,
            vec![
                Check::properties(".color-demo .color-note", &["color", "font-weight"]),
                Check::properties(".color-demo .muted", &["color", "font-size"]),
                Check::properties(".bg-sample", &["width", "min-height", "background-color"]),
            ],
        ),
        TaskDefinition::new(
            "TODO 4",
            "Inline Label Variations",
            10,
            vec![
                Check::properties(".inline-label", &["display", "padding", "border"]),
                Check::any_of(".inline-label.alt", &["border-style", "border"], "border style"),
            ],
        ),
        TaskDefinition::new(
            "TODO 5",
            "Typography + CTA Link Hover",
            10,
            vec![
                Check::properties(".copy .title", &["font-size", "font-weight", "text-transform"]),
                Check::properties(".copy .intro", &["font-style", "line-height"]),
                Check::properties(".copy .sample-text", &["font-family", "font-size"]),
                Check::properties(".cta-link", &["text-decoration", "color"]),
                Check::any_of(".cta-link:hover", &["text-decoration", "color"], "hover style"),
            ],
        ),
        TaskDefinition::new(
            "TODO 6",
            "Box Model + Flex Centering + Variants",
            10,
            [
                vec![Check::properties(
                    ".box",
                    &[
                        "width",
                        "height",
                        "padding",
                        "border",
                        "border-radius",
                        "display",
                        "align-items",
                        "justify-content",
                    ],
                )],
                variant_checks,
            ]
            .concat(),
        ),
        TaskDefinition::new(
            "TODO 7",
            "Flex Toolbar + Buttons + Responsive Product Grid",
            10,
            vec![
                Check::properties(".toolbar", &["display", "justify-content", "align-items", "gap"]),
                Check::properties(".btn", &["padding", "border"]),
                Check::any_of(
                    ".btn:hover",
                    &["background", "background-color", "color", "opacity", "transform", "box-shadow"],
                    "hover feedback",
                ),
                Check::properties(".product-grid", &["display", "flex-wrap", "gap"]),
                Check::any_of(".product-grid", &["flex-basis", "min-width", "flex"], "min item width"),
                Check::properties(".product-grid .item", &["min-height", "background-color"]),
                Check::any_of(
                    ".product-grid .item",
                    &["text-align", "display", "justify-content", "align-items"],
                    "center content",
                ),
            ],
        ),
        TaskDefinition::new(
            "TODO 8",
            "Positioning + Fixed Badge + Stacking (z-index)",
            10,
            vec![
                Check::properties(".static-box", &["border", "padding"]),
                Check::properties(".relative-box", &["position", "top", "left"]),
                Check::properties(".absolute-parent", &["position", "background", "padding"]),
                Check::properties(".absolute-child", &["position", "top", "right"]),
                Check::properties(
                    ".fixed-badge",
                    &["position", "bottom", "right", "padding", "background", "border-radius"],
                ),
                Check::properties(".stack", &["width", "height"]),
                Check::any_of(".stack", &["position"], "positioning"),
                Check::properties(".stack.a", &["background-color", "z-index"]),
                Check::properties(".stack.b", &["background-color", "z-index"]),
                Check::any_of(".stack.b", &["top", "left", "transform"], "offset"),
            ],
        ),
    ]
}
