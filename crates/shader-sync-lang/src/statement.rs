//! Statement-level data model.
//!
//! Statements are the unit the parser produces: the text between two terminators,
//! classified by the recognizer set into one of a closed set of kinds. Everything
//! here is plain data; the tree structure lives in [`crate::tree`].

/// A half-open character-offset range (`start..end`) in the document.
///
/// Offsets are in Unicode scalar values (`char`), matching the rest of the
/// engine. Ranges never survive a reparse: after every rebuild the tree is
/// discarded and ranges must be re-derived from the fresh one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRange {
    /// Range start offset (inclusive).
    pub start: usize,
    /// Range end offset (exclusive).
    pub end: usize,
}

impl TextRange {
    /// Create a new range.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the range length in characters.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the range is empty.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Returns `true` if `offset` lies inside the range (half-open).
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }

    /// Returns `true` if `other` lies entirely inside this range.
    pub fn contains_range(&self, other: TextRange) -> bool {
        other.start >= self.start && other.end <= self.end
    }
}

/// The character (or pseudo-character) that ended a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    /// The statement ended with `;`.
    Semicolon,
    /// The statement ended with `{` and owns the block that follows.
    BlockOpen,
    /// The statement was cut short by the `}` closing its block.
    BlockClose,
    /// A preprocessor line ended at an unescaped line break.
    LineBreak,
    /// Trailing text flushed at end of input.
    EndOfInput,
}

/// A parsed `#version` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionDirective {
    /// The version number (e.g. `330`, `450`).
    pub number: u16,
    /// The optional profile word (e.g. `core`, `compatibility`, `es`).
    pub profile: Option<String>,
}

/// A parsed `#extension` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionDirective {
    /// The extension name.
    pub name: String,
    /// The behavior word (`enable`, `require`, `warn`, `disable`).
    pub behavior: String,
}

/// The parsed parameter list of a `layout(...)` prefix.
///
/// Entries keep their source order; values are optional (`layout(std140)` has
/// a key with no value, `layout(binding = 2)` has both).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LayoutParams {
    entries: Vec<(String, Option<String>)>,
}

impl LayoutParams {
    /// Create a layout-parameter list from ordered `key -> value` pairs.
    pub fn new(entries: Vec<(String, Option<String>)>) -> Self {
        Self { entries }
    }

    /// Returns the value of `key`, if the key is present.
    ///
    /// The outer `Option` is key presence; the inner one is whether the key
    /// carried a value.
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_deref())
    }

    /// Returns the numeric value of `key`, if present and parseable.
    pub fn get_u32(&self, key: &str) -> Option<u32> {
        self.get(key)?.and_then(|v| v.parse().ok())
    }

    /// Iterate entries in source order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Returns `true` if the list has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A parsed declaration statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Qualifier keywords in source order (may include `struct`).
    pub qualifiers: Vec<String>,
    /// The `layout(...)` parameter list, if present.
    pub layout: Option<LayoutParams>,
    /// The data-type keyword, or empty for structural declarations.
    pub type_name: String,
    /// The declared identifier.
    pub name: String,
    /// The array suffix (e.g. `[4]`, `[]`), or empty.
    pub array_suffix: String,
    /// `true` if the identifier was followed by a parameter list.
    pub is_method: bool,
}

impl Declaration {
    /// Returns `true` for structural declarations (no data type).
    pub fn is_structural(&self) -> bool {
        self.type_name.is_empty()
    }

    /// Returns `true` if `qualifier` appears in the qualifier list.
    pub fn has_qualifier(&self, qualifier: &str) -> bool {
        self.qualifiers.iter().any(|q| q == qualifier)
    }

    /// Returns `true` if the declaration carries an array suffix.
    pub fn is_array(&self) -> bool {
        !self.array_suffix.is_empty()
    }

    /// The storage qualifiers present, restricted to the mutually exclusive set.
    pub fn storage_qualifiers(&self) -> Vec<&str> {
        self.qualifiers
            .iter()
            .map(String::as_str)
            .filter(|q| crate::keywords::EXCLUSIVE_STORAGE_QUALIFIERS.contains(q))
            .collect()
    }

    /// Returns the numeric value of a layout key (e.g. `binding`, `location`).
    pub fn layout_u32(&self, key: &str) -> Option<u32> {
        self.layout.as_ref()?.get_u32(key)
    }
}

/// The closed set of statement kinds.
///
/// Recognizers return `Option<StatementKind>`; anything unrecognized stays
/// [`StatementKind::Generic`] with its raw text preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementKind {
    /// Unrecognized text.
    Generic,
    /// A declaration.
    Declaration(Declaration),
    /// A `#version` directive.
    Version(VersionDirective),
    /// An `#extension` directive.
    Extension(ExtensionDirective),
}

impl StatementKind {
    /// Returns the declaration payload, if this is a declaration.
    pub fn as_declaration(&self) -> Option<&Declaration> {
        match self {
            StatementKind::Declaration(decl) => Some(decl),
            _ => None,
        }
    }
}

/// A language-level diagnostic attached to a statement while parsing.
///
/// These carry no quick fixes; pipeline-level diagnostics (which may) are
/// layered on by the synchronization engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDiagnostic {
    /// Human-readable message.
    pub message: String,
}

impl ParseDiagnostic {
    /// Create a new diagnostic.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
