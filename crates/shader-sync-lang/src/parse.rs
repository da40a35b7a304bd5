//! Tolerant lexer/parser.
//!
//! A single left-to-right character scan with an explicit state machine turns
//! raw source text into a [`SyntaxTree`]. The scan never fails: unmatched
//! braces, half-finished statements, and unrecognizable text all degrade to
//! generic statements or diagnostics, never to an error return.
//!
//! The input is expected to be the document's *plain-code view* (markers
//! stripped or blanked), so every produced range is a valid char-offset range
//! into the live buffer.

use crate::recognize::RecognizerSet;
use crate::statement::{ParseDiagnostic, StatementKind, Terminator, TextRange};
use crate::tree::{BlockId, Statement, StatementId, SyntaxTree};

/// Parser behavior switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// When `true`, skip the recognizers and produce only generic statements.
    ///
    /// Used by consumers that need block structure (indentation, folding)
    /// without paying for statement classification.
    pub indentation_only: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Default,
    LineComment,
    BlockComment,
    Preprocessor,
}

/// Parse `text` into a fresh statement tree.
///
/// The returned tree is a complete snapshot; it is never patched in place.
/// Callers reparse after every buffer change.
pub fn parse(text: &str, recognizers: &RecognizerSet, options: ParseOptions) -> SyntaxTree {
    let char_len = text.chars().count();
    let mut scanner = Scanner {
        recognizers,
        options,
        tree: SyntaxTree::with_root(char_len),
        open: Vec::new(),
        pending: String::new(),
        offsets: Vec::new(),
        state: ScanState::Default,
        prev: None,
    };
    scanner.run(text, char_len);
    let mut tree = scanner.tree;
    if !options.indentation_only {
        annotate(&mut tree);
    }
    tree
}

struct Scanner<'a> {
    recognizers: &'a RecognizerSet,
    options: ParseOptions,
    tree: SyntaxTree,
    /// Stack of open non-root blocks; the current block is the top (or root).
    open: Vec<BlockId>,
    /// Text accumulated since the last statement boundary.
    pending: String,
    /// Char offset of each pending character, kept parallel to `pending`.
    offsets: Vec<usize>,
    state: ScanState,
    /// Immediate look-behind for the two-character sequences `//`, `/*`, `*/`.
    prev: Option<char>,
}

impl Scanner<'_> {
    fn run(&mut self, text: &str, char_len: usize) {
        for (offset, c) in text.chars().enumerate() {
            match self.state {
                ScanState::LineComment => self.scan_line_comment(c),
                ScanState::BlockComment => self.scan_block_comment(c),
                ScanState::Preprocessor => self.scan_preprocessor(offset, c),
                ScanState::Default => self.scan_default(offset, c),
            }
        }
        // Flush whatever is left so trailing text is not silently dropped. An
        // unterminated comment swallows its own text, but anything accumulated
        // before it still counts.
        self.produce(Terminator::EndOfInput, char_len);
    }

    fn scan_line_comment(&mut self, c: char) {
        if c == '\n' && self.prev != Some('\\') {
            self.state = ScanState::Default;
            self.push(c, usize::MAX);
            self.prev = None;
        } else {
            self.prev = Some(c);
        }
    }

    fn scan_block_comment(&mut self, c: char) {
        if c == '/' && self.prev == Some('*') {
            self.state = ScanState::Default;
            // A comment separates tokens the way whitespace does.
            self.push(' ', usize::MAX);
            self.prev = None;
        } else {
            self.prev = Some(c);
        }
    }

    fn scan_preprocessor(&mut self, offset: usize, c: char) {
        match c {
            '\r' => {}
            '\n' if self.prev == Some('\\') => {
                // Escaped line continuation: the directive keeps going.
                self.pending.pop();
                self.offsets.pop();
                self.push(' ', usize::MAX);
                self.prev = None;
            }
            '\n' => {
                self.produce(Terminator::LineBreak, offset);
                self.state = ScanState::Default;
                self.prev = None;
            }
            _ => {
                self.push(c, offset);
                self.prev = Some(c);
            }
        }
    }

    fn scan_default(&mut self, offset: usize, c: char) {
        match c {
            '/' if self.prev == Some('/') => {
                self.pending.pop();
                self.offsets.pop();
                self.state = ScanState::LineComment;
                self.prev = None;
            }
            '*' if self.prev == Some('/') => {
                self.pending.pop();
                self.offsets.pop();
                self.state = ScanState::BlockComment;
                // Clearing the look-behind keeps `/*/` from closing itself.
                self.prev = None;
            }
            '{' => {
                let statement = self.produce(Terminator::BlockOpen, offset);
                let parent = self.current_block();
                let block = self.tree.alloc_block(parent, statement, offset);
                if let Some(id) = statement {
                    self.tree.set_body(id, block);
                }
                self.open.push(block);
                self.prev = None;
            }
            '}' => {
                let statement = self.produce(Terminator::BlockClose, offset);
                match self.open.pop() {
                    Some(block) => self.tree.close_block(block, offset + 1),
                    None => self.unmatched_close(statement, offset),
                }
                self.prev = None;
            }
            ';' => {
                self.produce_semicolon(offset);
                self.prev = None;
            }
            '#' => {
                self.push(c, offset);
                self.state = ScanState::Preprocessor;
                self.prev = None;
            }
            '\n' => {
                self.push(c, offset);
                self.prev = None;
            }
            _ => {
                self.push(c, offset);
                self.prev = Some(c);
            }
        }
    }

    fn current_block(&self) -> BlockId {
        self.open.last().copied().unwrap_or(self.tree.root())
    }

    fn push(&mut self, c: char, offset: usize) {
        self.pending.push(c);
        self.offsets.push(offset);
    }

    /// The root never closes; an extra `}` becomes a statement anomaly instead.
    fn unmatched_close(&mut self, statement: Option<StatementId>, offset: usize) {
        let diagnostic = ParseDiagnostic::new("unmatched '}' at document scope");
        match statement {
            Some(id) => self.tree.push_diagnostic(id, diagnostic),
            None => {
                let block = self.current_block();
                let id = self.tree.alloc_statement(
                    block,
                    Statement {
                        text: String::new(),
                        terminator: Terminator::BlockClose,
                        range: TextRange::new(offset, offset + 1),
                        block,
                        prev: None,
                        next: None,
                        body: None,
                        kind: StatementKind::Generic,
                        diagnostics: Vec::new(),
                    },
                );
                self.tree.push_diagnostic(id, diagnostic);
            }
        }
    }

    /// Close the pending text as a statement, if it has any substance.
    ///
    /// Returns the new statement id, or `None` when the pending text was all
    /// whitespace (only `;` may produce an empty statement, via
    /// [`Scanner::produce_semicolon`]).
    fn produce(&mut self, terminator: Terminator, boundary: usize) -> Option<StatementId> {
        let trimmed = self.pending.trim();
        if trimmed.is_empty() {
            self.reset_pending();
            return None;
        }
        let range = self.pending_range(terminator, boundary);
        let id = self.emit(trimmed.to_string(), terminator, range);
        self.reset_pending();
        Some(id)
    }

    /// `;` closes a statement even when there is nothing in it.
    fn produce_semicolon(&mut self, offset: usize) {
        let trimmed = self.pending.trim().to_string();
        let range = if trimmed.is_empty() {
            TextRange::new(offset, offset + 1)
        } else {
            self.pending_range(Terminator::Semicolon, offset)
        };
        self.emit(trimmed, Terminator::Semicolon, range);
        self.reset_pending();
    }

    fn pending_range(&self, terminator: Terminator, boundary: usize) -> TextRange {
        let first = self
            .pending
            .chars()
            .position(|c| !c.is_whitespace())
            .and_then(|i| self.offsets.get(i).copied())
            .unwrap_or(boundary);
        let start = if first == usize::MAX { boundary } else { first };
        let end = match terminator {
            Terminator::Semicolon | Terminator::BlockOpen | Terminator::BlockClose => boundary + 1,
            Terminator::LineBreak | Terminator::EndOfInput => {
                let last = self
                    .pending
                    .chars()
                    .rev()
                    .position(|c| !c.is_whitespace())
                    .map(|i| self.offsets[self.offsets.len() - 1 - i])
                    .unwrap_or(boundary);
                if last == usize::MAX { boundary } else { last + 1 }
            }
        };
        TextRange::new(start, end.max(start))
    }

    fn emit(&mut self, text: String, terminator: Terminator, range: TextRange) -> StatementId {
        let kind = if self.options.indentation_only || text.is_empty() {
            StatementKind::Generic
        } else {
            self.recognizers
                .recognize(&text)
                .unwrap_or(StatementKind::Generic)
        };
        let block = self.current_block();
        self.tree.alloc_statement(
            block,
            Statement {
                text,
                terminator,
                range,
                block,
                prev: None,
                next: None,
                body: None,
                kind,
                diagnostics: Vec::new(),
            },
        )
    }

    fn reset_pending(&mut self) {
        self.pending.clear();
        self.offsets.clear();
    }
}

/// Attach language-level diagnostics to freshly parsed declarations.
fn annotate(tree: &mut SyntaxTree) {
    let mut found: Vec<(StatementId, ParseDiagnostic)> = Vec::new();
    for (id, stmt) in tree.statements() {
        let Some(decl) = stmt.declaration() else {
            continue;
        };
        let storage = decl.storage_qualifiers();
        if storage.len() > 1 {
            found.push((
                id,
                ParseDiagnostic::new(format!(
                    "conflicting storage qualifiers '{}' and '{}'",
                    storage[0], storage[1]
                )),
            ));
        }
        if let Some(qualifier) = storage.first()
            && !tree.is_global_scope(id)
        {
            found.push((
                id,
                ParseDiagnostic::new(format!(
                    "'{qualifier}' declarations are only allowed at global scope"
                )),
            ));
        }
    }
    for (id, diagnostic) in found {
        tree.push_diagnostic(id, diagnostic);
    }
}
