#![warn(missing_docs)]
//! `shader-sync-lang` - tolerant structural parsing for shader source text.
//!
//! # Overview
//!
//! This crate turns raw shading-language source into a tree of code blocks and
//! statements without a full compiler front end. It is deliberately forgiving:
//! anything it cannot classify stays in the tree as a generic statement with
//! its text and range intact, so downstream consumers (the synchronization
//! engine, indentation, folding) always get a complete, valid tree.
//!
//! The tree is rebuilt from scratch on every parse. Nodes are arena-indexed
//! (`BlockId` / `StatementId` into flat arrays), which makes "discard the whole
//! tree and reparse" the only mutation model: no node or range ever survives
//! a buffer edit.
//!
//! # Quick Start
//!
//! ```rust
//! use shader_sync_lang::{parse, ParseOptions, RecognizerSet, StatementKind};
//!
//! let recognizers = RecognizerSet::new();
//! let tree = parse(
//!     "#version 330 core\nuniform float gain;\n",
//!     &recognizers,
//!     ParseOptions::default(),
//! );
//!
//! let kinds: Vec<_> = tree.statements().map(|(_, s)| &s.kind).collect();
//! assert!(matches!(kinds[0], StatementKind::Version(v) if v.number == 330));
//! assert!(matches!(kinds[1], StatementKind::Declaration(d) if d.name == "gain"));
//! ```
//!
//! # Module Description
//!
//! - [`keywords`] - static keyword/grammar table (categories, stages, versions)
//! - [`statement`] - statement-level data model (kinds, declarations, ranges)
//! - [`tree`] - arena-backed block/statement tree
//! - [`recognize`] - ordered statement recognizers
//! - [`parse`](mod@parse) - the tolerant character-level parser

pub mod keywords;
pub mod parse;
pub mod recognize;
pub mod statement;
pub mod tree;

pub use keywords::{KeywordCategory, KeywordInfo, Stage, StageSet};
pub use parse::{ParseOptions, parse};
pub use recognize::RecognizerSet;
pub use statement::{
    Declaration, ExtensionDirective, LayoutParams, ParseDiagnostic, StatementKind, Terminator,
    TextRange, VersionDirective,
};
pub use tree::{Block, BlockId, Statement, StatementId, SyntaxTree};
