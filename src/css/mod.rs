#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Property presence checks over declaration text.
pub mod matcher;
/// Flat selector/declaration scanner.
pub mod parser;

pub use matcher::{PropertyPattern, has_any_property, has_custom_property, has_property};
pub use parser::{StyleRule, normalize_selector, parse, strip_comments};
