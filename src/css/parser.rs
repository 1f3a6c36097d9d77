#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Flat stylesheet scanner.
//!
//! Only top-level `selector { declarations }` blocks are recognised. At-rules,
//! media queries and nested rules are out of scope: an enclosing block whose
//! body contains another `{` is skipped, and the innermost flat block inside it
//! is picked up as if it were top-level. A block without a closing `}` before
//! the next `{` or end of input is dropped. Nothing here ever fails.

use serde::{Deserialize, Serialize};

/// One `(selector, declaration block)` pair of a parsed stylesheet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StyleRule {
    /// Lowercase, single-spaced, trimmed selector. Never empty.
    pub selector:     String,
    /// Lowercase, single-spaced declaration text with comments removed.
    pub declarations: String,
}

impl StyleRule {
    /// Returns the normalized selector.
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Returns the normalized declaration text.
    pub fn declarations(&self) -> &str {
        &self.declarations
    }
}

/// A raw block as matched by the grammar, before normalization.
#[derive(Debug)]
pub struct RawBlock<'a> {
    /// Everything between the previous brace and the opening `{`.
    pub selector_text: &'a str,
    /// Everything between `{` and `}`.
    pub body:          &'a str,
}

peg::parser! {
    /// grammars for the flat, best-effort stylesheet scan.
    pub grammar scanner() for str {
        /// matches a `/* ... */` comment, shortest match wins
        rule comment()
            = "/*" (!"*/" [_])* "*/"

        /// removes all terminated block comments, keeps everything else. An
        /// unterminated `/*` has no `*/` after it, so the rest is kept whole.
        pub rule strip_comments() -> String
            = parts:(comment() { None } / c:$("/*" [_]*) { Some(c) } / c:$([_]) { Some(c) })*
            { parts.into_iter().flatten().collect() }

        /// matches one or more characters that are not braces
        rule selector_text() -> &'input str
            = $([^ '{' | '}']+)

        /// matches any run of characters that are not braces
        rule body() -> &'input str
            = $([^ '{' | '}']*)

        /// matches a single flat block
        rule block() -> RawBlock<'input>
            = s:selector_text() "{" b:body() "}"
            { RawBlock { selector_text: s, body: b } }

        /// scans the whole input. Where no block starts, the whole run of
        /// non-brace characters is skipped at once, since no later offset in
        /// that run can start a block either. A stray brace is skipped alone.
        pub rule blocks() -> Vec<RawBlock<'input>>
            = items:(b:block() { Some(b) } / [^ '{' | '}']+ { None } / [_] { None })*
            { items.into_iter().flatten().collect() }
    }
}

/// Collapses every whitespace run to a single space and trims both ends.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalizes a single selector: trimmed, single-spaced, lowercase.
pub fn normalize_selector(selector: &str) -> String {
    collapse_whitespace(selector).to_lowercase()
}

/// Normalizes declaration text: single-spaced, lowercase.
pub fn normalize_declarations(declarations: &str) -> String {
    collapse_whitespace(declarations).to_lowercase()
}

/// Removes `/* ... */` comments. An unterminated `/*` is left as is.
pub fn strip_comments(css: &str) -> String {
    scanner::strip_comments(css).unwrap_or_else(|_| css.to_string())
}

/// Parses stylesheet text into a flat list of rules.
///
/// A selector list such as `h1, h2 { ... }` produces one rule per selector,
/// all sharing the same declaration text, in source order.
pub fn parse(css: &str) -> Vec<StyleRule> {
    let css = strip_comments(css);
    let blocks = match scanner::blocks(&css) {
        Ok(blocks) => blocks,
        Err(e) => {
            tracing::debug!("Stylesheet scan gave up: {e}");
            return Vec::new();
        }
    };

    let mut rules = Vec::new();
    for block in blocks {
        let declarations = normalize_declarations(block.body);
        rules.extend(
            block
                .selector_text
                .split(',')
                .map(normalize_selector)
                .filter(|s| !s.is_empty())
                .map(|selector| StyleRule {
                    selector,
                    declarations: declarations.clone(),
                }),
        );
    }

    tracing::debug!("Parsed {} rules", rules.len());
    rules
}
