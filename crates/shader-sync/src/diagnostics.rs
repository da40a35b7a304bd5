//! Cycle-level diagnostics.
//!
//! Each synchronization cycle produces one [`DiagnosticSet`]: the language
//! diagnostics harvested from the fresh parse, followed by the pipeline
//! diagnostics the post-check pass attaches. The set is derived state - it is
//! discarded and recomputed wholesale, exactly like the tree it points into.

use crate::fixes::QuickFix;
use shader_sync_lang::{StatementId, TextRange};

/// Which pass produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticOrigin {
    /// A structural violation found while building the declaration.
    Language,
    /// A mismatch between a declaration and its pipeline element.
    Pipeline,
}

/// One user-visible problem, anchored to a statement.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Human-readable message.
    pub message: String,
    /// The owning statement in the current tree.
    pub statement: StatementId,
    /// Highlight range (char offsets into the current buffer).
    pub range: TextRange,
    /// Producing pass.
    pub origin: DiagnosticOrigin,
    /// Available quick fixes (language diagnostics never carry any).
    pub fixes: Vec<QuickFix>,
    /// Index into `fixes` of the preferred fix, if one stands out.
    pub primary_fix: Option<usize>,
}

impl Diagnostic {
    /// Create a fix-less diagnostic.
    pub fn new(
        message: impl Into<String>,
        statement: StatementId,
        range: TextRange,
        origin: DiagnosticOrigin,
    ) -> Self {
        Self {
            message: message.into(),
            statement,
            range,
            origin,
            fixes: Vec::new(),
            primary_fix: None,
        }
    }

    /// Attach quick fixes, marking the first one primary.
    pub fn with_fixes(mut self, fixes: Vec<QuickFix>) -> Self {
        self.primary_fix = if fixes.is_empty() { None } else { Some(0) };
        self.fixes = fixes;
        self
    }

    /// The preferred fix, if one was marked.
    pub fn primary(&self) -> Option<&QuickFix> {
        self.fixes.get(self.primary_fix?)
    }
}

/// The flat diagnostic list for one cycle.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticSet {
    items: Vec<Diagnostic>,
}

impl DiagnosticSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    /// Append many diagnostics, preserving order.
    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.items.extend(diagnostics);
    }

    /// All diagnostics, language-level before pipeline-level, in source order
    /// within each origin.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Diagnostics anchored to one statement, both origins concatenated.
    pub fn for_statement(&self, statement: StatementId) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(move |d| d.statement == statement)
    }

    /// Total diagnostic count.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
