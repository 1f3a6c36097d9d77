#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Property-name presence checks over declaration text.
//!
//! A property counts as declared when its name is followed by optional
//! whitespace and a colon, and is preceded by start of text, a `;`, or
//! whitespace. `color` therefore never matches inside `background-color`.
//! Values are never looked at.

use regex::{Regex, RegexBuilder};

/// A compiled, case-insensitive presence check for one declaration name.
#[derive(Debug, Clone)]
pub struct PropertyPattern {
    /// Name as it was requested, without the anchoring.
    name:  String,
    /// The anchored pattern, absent if it could not be compiled.
    regex: Option<Regex>,
}

impl PropertyPattern {
    /// Compiles a check for a regular property such as `box-shadow`.
    pub fn property(name: &str) -> Self {
        Self::compile(name.trim())
    }

    /// Compiles a check for a custom property. `brand` and `--brand` both
    /// check for `--brand`.
    pub fn custom_property(name: &str) -> Self {
        let name = name.trim().trim_start_matches("--");
        Self::compile(&format!("--{name}"))
    }

    /// Builds the anchored pattern for `name`.
    fn compile(name: &str) -> Self {
        let pattern = format!(r"(?:^|[;\s]){}\s*:", regex::escape(name));
        let regex = match RegexBuilder::new(&pattern).case_insensitive(true).build() {
            Ok(regex) => Some(regex),
            Err(e) => {
                tracing::warn!("Cannot build a presence check for `{name}`: {e}");
                None
            }
        };
        Self {
            name: name.to_string(),
            regex,
        }
    }

    /// The declaration name this pattern looks for.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if `declarations` declares this property.
    pub fn is_declared_in(&self, declarations: &str) -> bool {
        if self.name.is_empty() {
            return false;
        }
        self.regex
            .as_ref()
            .is_some_and(|regex| regex.is_match(declarations))
    }
}

/// Returns true if `declarations` declares `property`.
pub fn has_property(declarations: &str, property: &str) -> bool {
    PropertyPattern::property(property).is_declared_in(declarations)
}

/// Returns true if `declarations` declares any of `properties`.
pub fn has_any_property<S: AsRef<str>>(declarations: &str, properties: &[S]) -> bool {
    properties
        .iter()
        .any(|p| has_property(declarations, p.as_ref()))
}

/// Returns true if `declarations` defines the custom property `--name`.
pub fn has_custom_property(declarations: &str, name: &str) -> bool {
    PropertyPattern::custom_property(name).is_declared_in(declarations)
}
