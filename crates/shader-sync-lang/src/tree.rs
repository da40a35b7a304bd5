//! Arena-backed statement tree.
//!
//! Blocks and statements live in flat `Vec`s addressed by integer ids, so a
//! whole tree can be dropped and rebuilt wholesale on every reparse: no node
//! ever survives a buffer edit, and nothing outside the tree can hold a
//! dangling reference into it.

use crate::statement::{
    Declaration, ParseDiagnostic, StatementKind, Terminator, TextRange,
};

/// Index of a block in its [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(usize);

impl BlockId {
    /// The arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Index of a statement in its [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StatementId(usize);

impl StatementId {
    /// The arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A brace-delimited code block (or the whole document for the root).
#[derive(Debug, Clone)]
pub struct Block {
    /// The enclosing block; `None` only for the root.
    pub parent: Option<BlockId>,
    /// The statement whose body this block is, if any.
    pub parent_statement: Option<StatementId>,
    /// Child blocks in source order.
    pub children: Vec<BlockId>,
    /// Statements in source order.
    pub statements: Vec<StatementId>,
    /// `true` once the closing brace was found. The root is always `true`.
    pub closed: bool,
    /// The block's span (`{` through `}` inclusive; the whole document for the root).
    pub range: TextRange,
}

/// One statement node.
#[derive(Debug, Clone)]
pub struct Statement {
    /// Trimmed raw text (empty statements are possible with `;`).
    pub text: String,
    /// What ended the statement.
    pub terminator: Terminator,
    /// Span of the trimmed text through the terminator character.
    pub range: TextRange,
    /// The owning block.
    pub block: BlockId,
    /// Previous statement in the owning block.
    pub prev: Option<StatementId>,
    /// Next statement in the owning block.
    pub next: Option<StatementId>,
    /// The body block, non-`None` exactly when the terminator is `{`.
    pub body: Option<BlockId>,
    /// Recognized kind.
    pub kind: StatementKind,
    /// Language-level diagnostics accumulated while parsing.
    pub diagnostics: Vec<ParseDiagnostic>,
}

impl Statement {
    /// Returns the declaration payload, if this statement is a declaration.
    pub fn declaration(&self) -> Option<&Declaration> {
        self.kind.as_declaration()
    }

    /// Returns `true` if the statement owns a body block.
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }
}

/// The full statement tree for one document snapshot.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    blocks: Vec<Block>,
    statements: Vec<Statement>,
}

impl SyntaxTree {
    /// An empty tree holding only the root block.
    ///
    /// Useful as a placeholder before a first parse.
    pub fn empty() -> Self {
        Self::with_root(0)
    }

    /// Create a tree containing only an open root block spanning `len` characters.
    pub(crate) fn with_root(len: usize) -> Self {
        Self {
            blocks: vec![Block {
                parent: None,
                parent_statement: None,
                children: Vec::new(),
                statements: Vec::new(),
                closed: true,
                range: TextRange::new(0, len),
            }],
            statements: Vec::new(),
        }
    }

    /// The root block id. The root always exists and is never invalid.
    pub fn root(&self) -> BlockId {
        BlockId(0)
    }

    /// Borrow a block.
    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.0]
    }

    /// Borrow a statement.
    pub fn statement(&self, id: StatementId) -> &Statement {
        &self.statements[id.0]
    }

    /// Iterate all blocks with their ids, in allocation (source) order.
    pub fn blocks(&self) -> impl Iterator<Item = (BlockId, &Block)> {
        self.blocks.iter().enumerate().map(|(i, b)| (BlockId(i), b))
    }

    /// Iterate all statements with their ids, in source order.
    pub fn statements(&self) -> impl Iterator<Item = (StatementId, &Statement)> {
        self.statements
            .iter()
            .enumerate()
            .map(|(i, s)| (StatementId(i), s))
    }

    /// Iterate the statements of one block, in source order.
    pub fn statements_in(
        &self,
        block: BlockId,
    ) -> impl Iterator<Item = (StatementId, &Statement)> {
        self.blocks[block.0]
            .statements
            .iter()
            .map(|&id| (id, &self.statements[id.0]))
    }

    /// Total statement count.
    pub fn statement_count(&self) -> usize {
        self.statements.len()
    }

    /// The statement whose range contains `offset`, if any.
    pub fn statement_at(&self, offset: usize) -> Option<StatementId> {
        self.statements
            .iter()
            .position(|s| s.range.contains(offset))
            .map(StatementId)
    }

    /// Returns `true` if the statement sits at global scope.
    ///
    /// Global scope is the root block, plus the members of an interface block
    /// whose structural declaration lacks an instance name (anonymous blocks
    /// inject their members into the enclosing scope).
    pub fn is_global_scope(&self, id: StatementId) -> bool {
        let block = self.statement(id).block;
        if block == self.root() {
            return true;
        }
        let Some(parent_stmt) = self.block(block).parent_statement else {
            return false;
        };
        let parent = self.statement(parent_stmt);
        if !parent
            .declaration()
            .is_some_and(Declaration::is_structural)
        {
            return false;
        }
        // Members are global only when the enclosing block is anonymous and
        // itself sits at global scope.
        self.instance_declaration(parent_stmt).is_none() && self.is_global_scope(parent_stmt)
    }

    /// The instance declaration following a structural declaration with a body.
    ///
    /// For `struct Light { ... } key;`, the statement holding `key` is the
    /// instance declaration of the statement holding `struct Light`.
    pub fn instance_declaration(&self, structural: StatementId) -> Option<StatementId> {
        let stmt = self.statement(structural);
        if stmt.body.is_none() || !stmt.declaration().is_some_and(Declaration::is_structural) {
            return None;
        }
        let next = stmt.next?;
        let candidate = self.statement(next).declaration()?;
        if candidate.is_structural() && !candidate.name.is_empty() {
            Some(next)
        } else {
            None
        }
    }

    /// The inverse of [`SyntaxTree::instance_declaration`].
    pub fn structure_declaration(&self, instance: StatementId) -> Option<StatementId> {
        let prev = self.statement(instance).prev?;
        (self.instance_declaration(prev) == Some(instance)).then_some(prev)
    }

    /// The span of a declaration including its body and trailing instance or
    /// `;` statement, suitable for removing or reusing the whole construct.
    pub fn declaration_span(&self, id: StatementId) -> TextRange {
        let stmt = self.statement(id);
        let mut range = stmt.range;
        if let Some(body) = stmt.body {
            range.end = range.end.max(self.block(body).range.end);
            if let Some(next) = stmt.next {
                let next_stmt = self.statement(next);
                let trailing = matches!(next_stmt.terminator, Terminator::Semicolon)
                    && (next_stmt.text.is_empty()
                        || self.instance_declaration(id) == Some(next));
                if trailing {
                    range.end = range.end.max(next_stmt.range.end);
                }
            }
        }
        range
    }

    // --- construction (parser only) ---

    pub(crate) fn alloc_block(
        &mut self,
        parent: BlockId,
        parent_statement: Option<StatementId>,
        start: usize,
    ) -> BlockId {
        let id = BlockId(self.blocks.len());
        self.blocks.push(Block {
            parent: Some(parent),
            parent_statement,
            children: Vec::new(),
            statements: Vec::new(),
            closed: false,
            range: TextRange::new(start, start),
        });
        self.blocks[parent.0].children.push(id);
        id
    }

    pub(crate) fn alloc_statement(&mut self, block: BlockId, statement: Statement) -> StatementId {
        let id = StatementId(self.statements.len());
        let prev = self.blocks[block.0].statements.last().copied();
        if let Some(prev_id) = prev {
            self.statements[prev_id.0].next = Some(id);
        }
        self.statements.push(Statement {
            prev,
            ..statement
        });
        self.blocks[block.0].statements.push(id);
        id
    }

    pub(crate) fn set_body(&mut self, statement: StatementId, body: BlockId) {
        self.statements[statement.0].body = Some(body);
    }

    pub(crate) fn close_block(&mut self, id: BlockId, end: usize) {
        let block = &mut self.blocks[id.0];
        block.closed = true;
        block.range.end = end;
    }

    pub(crate) fn push_diagnostic(&mut self, id: StatementId, diagnostic: ParseDiagnostic) {
        self.statements[id.0].diagnostics.push(diagnostic);
    }
}
