//! The shader document: buffer, derived state, and the binding cache.
//!
//! A document owns its text (a rope, for cheap line/char addressing) plus the
//! derived state of the most recent parse: the statement tree, the marker
//! map, and the diagnostic set. Derived state is replaced wholesale by
//! [`ShaderDocument::reparse`]; nothing is ever patched in place, so a range
//! or statement id is only meaningful against the tree of the cycle that
//! produced it.

use std::collections::HashMap;

use ropey::Rope;

use crate::diagnostics::{Diagnostic, DiagnosticOrigin, DiagnosticSet};
use crate::markers::{self, MarkerMap, MarkerMode};
use shader_sync_lang::{ParseOptions, RecognizerSet, SyntaxTree, TextRange, parse};

/// Facts about one pipeline element that must survive reparses.
///
/// Keyed by graph-element identity (not tree identity): the tree is rebuilt
/// every cycle, but the struct body a user wrote for a buffer block has to
/// outlive every one of those rebuilds.
#[derive(Debug, Clone, Default)]
pub struct ElementBinding {
    /// The interface-block body text backing this element, braces included.
    pub block_body: Option<String>,
}

/// One shader document.
#[derive(Debug)]
pub struct ShaderDocument {
    buffer: Rope,
    version: u64,
    recognizers: RecognizerSet,
    tree: SyntaxTree,
    markers: MarkerMap,
    diagnostics: DiagnosticSet,
    bindings: HashMap<String, ElementBinding>,
}

impl ShaderDocument {
    /// Create a document and run the initial parse.
    pub fn new(text: &str) -> Self {
        let mut document = Self {
            buffer: Rope::from_str(text),
            version: 0,
            recognizers: RecognizerSet::new(),
            tree: SyntaxTree::empty(),
            markers: MarkerMap::default(),
            diagnostics: DiagnosticSet::new(),
            bindings: HashMap::new(),
        };
        document.reparse();
        document
    }

    /// The full buffer text, markers included.
    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    /// Buffer length in chars.
    pub fn len_chars(&self) -> usize {
        self.buffer.len_chars()
    }

    /// A slice of the raw buffer.
    pub fn slice(&self, range: TextRange) -> String {
        self.buffer
            .slice(range.start.min(self.len_chars())..range.end.min(self.len_chars()))
            .to_string()
    }

    /// Document version, incremented on every buffer mutation.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The statement tree of the most recent parse.
    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    /// The marker map of the most recent parse.
    pub fn markers(&self) -> &MarkerMap {
        &self.markers
    }

    /// The diagnostics of the most recent cycle.
    pub fn diagnostics(&self) -> &DiagnosticSet {
        &self.diagnostics
    }

    /// The cached binding facts for a pipeline element.
    pub fn binding(&self, element_id: &str) -> Option<&ElementBinding> {
        self.bindings.get(element_id)
    }

    /// The marker-free view of the buffer.
    pub fn plain_view(&self, mode: MarkerMode) -> String {
        markers::plain_view(&self.text(), mode)
    }

    /// Char offset of the first user-region character: one past the end of
    /// the section-end sentinel line. `None` when the document has no
    /// generated region.
    pub fn section_boundary(&self) -> Option<usize> {
        let marker = self.markers.section_end?;
        let len = self.len_chars();
        let mut end = marker.end;
        while end < len {
            let c = self.buffer.char(end);
            end += 1;
            if c == '\n' {
                break;
            }
        }
        Some(end)
    }

    /// Replace `range` with `text` and bump the version.
    ///
    /// This does *not* reparse; callers batch their edits and reparse (or run
    /// a full synchronization cycle) when done.
    pub(crate) fn replace(&mut self, range: TextRange, text: &str) {
        let len = self.len_chars();
        let start = range.start.min(len);
        let end = range.end.min(len);
        self.buffer.remove(start..end);
        if !text.is_empty() {
            self.buffer.insert(start, text);
        }
        self.version += 1;
    }

    /// Remove a statement span plus the whitespace shell around it: leading
    /// indentation and the trailing run up to (and including) one line break.
    pub(crate) fn remove_statement_span(&mut self, range: TextRange) {
        let len = self.len_chars();
        let mut end = range.end.min(len);
        while end < len {
            match self.buffer.char(end) {
                ' ' | '\t' | '\r' => end += 1,
                '\n' => {
                    end += 1;
                    break;
                }
                _ => break,
            }
        }
        let mut start = range.start.min(end);
        while start > 0 && matches!(self.buffer.char(start - 1), ' ' | '\t') {
            start -= 1;
        }
        self.replace(TextRange::new(start, end), "");
    }

    /// Rebuild all derived state from the current buffer.
    ///
    /// The previous tree, marker map, and diagnostics are discarded; language
    /// diagnostics from the fresh tree seed the new diagnostic set.
    pub fn reparse(&mut self) {
        let text = self.text();
        self.markers = markers::scan(&text);
        let plain = markers::plain_view(&text, MarkerMode::Blank);
        self.tree = parse(&plain, &self.recognizers, ParseOptions::default());

        let mut diagnostics = DiagnosticSet::new();
        for (id, statement) in self.tree.statements() {
            for parse_diagnostic in &statement.diagnostics {
                diagnostics.push(Diagnostic::new(
                    parse_diagnostic.message.clone(),
                    id,
                    statement.range,
                    DiagnosticOrigin::Language,
                ));
            }
        }
        self.diagnostics = diagnostics;
    }

    /// Append pipeline diagnostics produced by the post-check pass.
    pub(crate) fn append_diagnostics(&mut self, diagnostics: Vec<Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    /// Split borrows for a check pass: the tree (shared) and the binding
    /// cache (exclusive).
    pub(crate) fn check_parts(&mut self) -> (&SyntaxTree, &mut HashMap<String, ElementBinding>) {
        (&self.tree, &mut self.bindings)
    }

    /// Drop every cached element binding (used on detach).
    pub(crate) fn clear_bindings(&mut self) {
        self.bindings.clear();
    }
}
