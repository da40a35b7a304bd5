//! Statement recognizers.
//!
//! A recognizer is a specific-purpose parser for one textual statement shape.
//! The set is tried in registration order and the first success wins; text no
//! recognizer claims stays a generic statement, so an exotic statement can
//! never break the tree.

use regex::Regex;

use crate::keywords::{self, KeywordCategory};
use crate::statement::{
    Declaration, ExtensionDirective, LayoutParams, StatementKind, VersionDirective,
};

const VERSION_PATTERN: &str =
    r"^#\s*version\s+(?P<number>\d+)(?:\s+(?P<profile>[A-Za-z_][0-9A-Za-z_]*))?\s*$";

const EXTENSION_PATTERN: &str =
    r"^#\s*extension\s+(?P<name>[A-Za-z_][0-9A-Za-z_]*)\s*:\s*(?P<behavior>[A-Za-z_][0-9A-Za-z_]*)\s*$";

// Coarse declaration shape; the captured words are classified against the
// keyword table afterwards, which is what decides whether this is really a
// declaration or just declaration-shaped text. Head words may carry a glued
// array suffix (`float[4] values`).
const DECLARATION_PATTERN: &str = r"(?s)^(?:layout\s*\(\s*(?P<layout>[^)]*)\)\s*)?(?P<head>(?:[A-Za-z_][0-9A-Za-z_]*(?:\[[^\]]*\])?\s+)*)(?P<name>[A-Za-z_][0-9A-Za-z_]*)(?P<post>(?:\s*\[[^\]]*\])*)\s*(?P<tail>[=(].*)?$";

/// The ordered set of statement recognizers.
///
/// Construction compiles the patterns once; one set can serve any number of
/// parses.
#[derive(Debug)]
pub struct RecognizerSet {
    version: Regex,
    extension: Regex,
    declaration: Regex,
}

impl RecognizerSet {
    /// Build the recognizer set.
    pub fn new() -> Self {
        Self {
            version: Regex::new(VERSION_PATTERN).expect("version pattern compiles"),
            extension: Regex::new(EXTENSION_PATTERN).expect("extension pattern compiles"),
            declaration: Regex::new(DECLARATION_PATTERN).expect("declaration pattern compiles"),
        }
    }

    /// Try every recognizer in order against trimmed statement text.
    ///
    /// Returns `None` when no recognizer matches; the caller keeps the
    /// statement generic.
    pub fn recognize(&self, text: &str) -> Option<StatementKind> {
        self.recognize_version(text)
            .or_else(|| self.recognize_extension(text))
            .or_else(|| self.recognize_declaration(text))
    }

    fn recognize_version(&self, text: &str) -> Option<StatementKind> {
        let caps = self.version.captures(text)?;
        let number = caps.name("number")?.as_str().parse().ok()?;
        let profile = caps.name("profile").map(|m| m.as_str().to_string());
        Some(StatementKind::Version(VersionDirective { number, profile }))
    }

    fn recognize_extension(&self, text: &str) -> Option<StatementKind> {
        let caps = self.extension.captures(text)?;
        Some(StatementKind::Extension(ExtensionDirective {
            name: caps.name("name")?.as_str().to_string(),
            behavior: caps.name("behavior")?.as_str().to_string(),
        }))
    }

    fn recognize_declaration(&self, text: &str) -> Option<StatementKind> {
        let caps = self.declaration.captures(text)?;
        let name = caps.name("name")?.as_str();
        if keywords::lookup(name).is_some() {
            return None;
        }

        let head: Vec<&str> = caps
            .name("head")
            .map(|m| m.as_str().split_whitespace().collect())
            .unwrap_or_default();
        let mut qualifiers = Vec::new();
        let mut type_name = String::new();
        let mut pre_array = String::new();
        for (i, token) in head.iter().enumerate() {
            let (word, array) = match token.find('[') {
                Some(at) => (&token[..at], &token[at..]),
                None => (*token, ""),
            };
            let info = keywords::lookup(word)?;
            let is_last = i + 1 == head.len();
            match info.category {
                KeywordCategory::DataType if is_last => {
                    type_name = word.to_string();
                    pre_array = squeeze(array);
                }
                KeywordCategory::Qualifier | KeywordCategory::Structure if array.is_empty() => {
                    qualifiers.push(word.to_string());
                }
                _ => return None,
            }
        }

        let layout = caps.name("layout").map(|m| parse_layout(m.as_str()));
        let tail = caps.name("tail").map(|m| m.as_str());
        let post = caps.name("post").map(|m| m.as_str()).unwrap_or("");
        let array_suffix = if post.trim().is_empty() {
            pre_array
        } else {
            squeeze(post)
        };

        // A bare identifier is only valid as the instance declaration of an
        // anonymous aggregate; with a tail or an array it is an expression.
        if qualifiers.is_empty()
            && type_name.is_empty()
            && layout.is_none()
            && (tail.is_some() || !array_suffix.is_empty())
        {
            return None;
        }

        let is_method = tail.is_some_and(|t| t.starts_with('('));
        Some(StatementKind::Declaration(Declaration {
            qualifiers,
            layout,
            type_name,
            name: name.to_string(),
            array_suffix,
            is_method,
        }))
    }
}

impl Default for RecognizerSet {
    fn default() -> Self {
        Self::new()
    }
}

fn squeeze(suffix: &str) -> String {
    suffix.split_whitespace().collect()
}

fn parse_layout(content: &str) -> LayoutParams {
    let mut entries = Vec::new();
    for part in content.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        match part.split_once('=') {
            Some((key, value)) => {
                entries.push((key.trim().to_string(), Some(value.trim().to_string())));
            }
            None => entries.push((part.to_string(), None)),
        }
    }
    LayoutParams::new(entries)
}
