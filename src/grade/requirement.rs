#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::css::{PropertyPattern, StyleRule, normalize_selector};

/// Selector every custom-property requirement is checked against.
pub const ROOT_SELECTOR: &str = ":root";

/// What a requirement checks for once a rule with its selector is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementKind {
    /// A rule for the selector exists.
    RuleExists,
    /// A matching rule declares the single named property.
    PropertyPresent,
    /// A matching rule declares at least one of the named properties.
    AnyOfProperties,
    /// `:root` defines the named custom property.
    VariableDefined,
}

impl fmt::Display for RequirementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            RequirementKind::RuleExists => "rule-exists",
            RequirementKind::PropertyPresent => "property-present",
            RequirementKind::AnyOfProperties => "any-of-properties",
            RequirementKind::VariableDefined => "variable-defined",
        };
        write!(f, "{kind}")
    }
}

/// Ways a requirement can be malformed.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum RequirementError {
    /// The selector normalizes to nothing.
    #[error("Requirement `{0}` has an empty selector.")]
    EmptySelector(String),
    /// A property check was asked for without any property names.
    #[error("Requirement `{label}` ({kind}) names no properties.")]
    NoProperties {
        /// Label of the offending requirement.
        label: String,
        /// Its kind.
        kind:  RequirementKind,
    },
    /// `property-present` takes exactly one name; aliases belong in
    /// `any-of-properties`.
    #[error("Requirement `{0}` checks for a single property but names several.")]
    TooManyProperties(String),
}

/// One atomic pass/fail expectation against a selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    /// Human readable description.
    label:      String,
    /// What is checked.
    kind:       RequirementKind,
    /// Normalized selector the requirement targets.
    selector:   String,
    /// Acceptable declaration names, in order. Custom properties are stored
    /// without their leading dashes.
    properties: Vec<String>,
}

/// Result of checking one requirement against a parsed stylesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Evaluation {
    /// Whether the requirement holds.
    pub satisfied:          bool,
    /// Whether any rule with the target selector exists at all.
    pub matched_rule_found: bool,
}

impl Requirement {
    /// Requires a rule for `selector` to exist.
    pub fn rule_exists(selector: &str) -> Self {
        let selector = normalize_selector(selector);
        Self {
            label: format!("{selector} rule"),
            kind: RequirementKind::RuleExists,
            selector,
            properties: Vec::new(),
        }
    }

    /// Requires a rule for `selector` declaring `property`.
    pub fn property_present(selector: &str, property: &str) -> Self {
        let property = property.trim().to_lowercase();
        Self {
            label: property.clone(),
            kind: RequirementKind::PropertyPresent,
            selector: normalize_selector(selector),
            properties: vec![property],
        }
    }

    /// Requires a rule for `selector` declaring at least one of `properties`.
    /// `label` names the effect being checked for, eg. `hover style`.
    pub fn any_of<I, S>(selector: &str, properties: I, label: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let properties: Vec<String> = properties
            .into_iter()
            .map(|p| p.as_ref().trim().to_lowercase())
            .collect();
        Self {
            label: format!("{label}: {}", properties.join(" OR ")),
            kind: RequirementKind::AnyOfProperties,
            selector: normalize_selector(selector),
            properties,
        }
    }

    /// Accepts any of `aliases` while reporting under the canonical
    /// `property` name.
    pub fn aliased<I, S>(selector: &str, property: &str, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut requirement = Self::any_of(selector, aliases, property);
        requirement.label = property.trim().to_lowercase();
        requirement
    }

    /// Requires `:root` to define `--name`. `name` may be given with or
    /// without its dashes.
    pub fn variable_defined(name: &str) -> Self {
        let name = name.trim().trim_start_matches("--").to_lowercase();
        Self {
            label: format!("--{name}"),
            kind: RequirementKind::VariableDefined,
            selector: ROOT_SELECTOR.to_string(),
            properties: vec![name],
        }
    }

    /// Returns the label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the kind.
    pub fn kind(&self) -> RequirementKind {
        self.kind
    }

    /// Returns the normalized target selector.
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Returns the accepted property names.
    pub fn properties(&self) -> &[String] {
        &self.properties
    }

    /// Checks the shape invariants of this requirement.
    pub fn validate(&self) -> Result<(), RequirementError> {
        if self.selector.is_empty() {
            return Err(RequirementError::EmptySelector(self.label.clone()));
        }
        match self.kind {
            RequirementKind::RuleExists => Ok(()),
            _ if self.properties.iter().all(|p| p.is_empty()) => {
                Err(RequirementError::NoProperties {
                    label: self.label.clone(),
                    kind:  self.kind,
                })
            }
            RequirementKind::PropertyPresent if self.properties.len() > 1 => {
                Err(RequirementError::TooManyProperties(self.label.clone()))
            }
            _ => Ok(()),
        }
    }

    /// Remediation hint for a failed evaluation, `None` if it passed.
    pub fn hint(&self, evaluation: &Evaluation) -> Option<String> {
        if evaluation.satisfied {
            return None;
        }
        if !evaluation.matched_rule_found {
            return Some(format!("Add a rule for selector `{}`", self.selector));
        }

        let hint = match self.kind {
            RequirementKind::RuleExists => format!("Add a rule for selector `{}`", self.selector),
            RequirementKind::PropertyPresent => {
                let property = self.properties.first().map(String::as_str).unwrap_or_default();
                format!("Declare `{property}` inside `{}`", self.selector)
            }
            RequirementKind::AnyOfProperties => format!(
                "Declare one of {} inside `{}`",
                self.properties
                    .iter()
                    .map(|p| format!("`{p}`"))
                    .collect::<Vec<_>>()
                    .join(", "),
                self.selector
            ),
            RequirementKind::VariableDefined => {
                format!("Define `{}` inside `{}`", self.label, self.selector)
            }
        };
        Some(hint)
    }
}

/// All rules whose selector equals the requirement's selector.
fn matching_rules<'a>(
    rules: &'a [StyleRule],
    selector: &'a str,
) -> impl Iterator<Item = &'a StyleRule> + 'a {
    rules.iter().filter(move |r| r.selector() == selector)
}

/// Checks `requirement` against `rules`.
///
/// Selector matching is literal string equality after normalization. A
/// requirement whose properties are missing never passes, but a rule-exists
/// check needs none.
pub fn evaluate(rules: &[StyleRule], requirement: &Requirement) -> Evaluation {
    let selector = match requirement.kind {
        RequirementKind::VariableDefined => ROOT_SELECTOR,
        _ => requirement.selector(),
    };

    let matched_rule_found = matching_rules(rules, selector).next().is_some();
    if !matched_rule_found {
        return Evaluation::default();
    }

    let patterns: Vec<PropertyPattern> = match requirement.kind {
        RequirementKind::RuleExists => {
            return Evaluation {
                satisfied: true,
                matched_rule_found,
            };
        }
        RequirementKind::PropertyPresent => requirement
            .properties
            .first()
            .map(|p| PropertyPattern::property(p))
            .into_iter()
            .collect(),
        RequirementKind::AnyOfProperties => requirement
            .properties
            .iter()
            .map(|p| PropertyPattern::property(p))
            .collect(),
        RequirementKind::VariableDefined => requirement
            .properties
            .first()
            .map(|p| PropertyPattern::custom_property(p))
            .into_iter()
            .collect(),
    };

    let satisfied = matching_rules(rules, selector).any(|rule| {
        patterns
            .iter()
            .any(|pattern| pattern.is_declared_in(rule.declarations()))
    });

    Evaluation {
        satisfied,
        matched_rule_found,
    }
}
