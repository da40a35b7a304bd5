#![warn(missing_docs)]
//! `shader-sync` - keeps a shader document consistent with its pipeline element.
//!
//! # Overview
//!
//! In a dataflow-style rendering-pipeline editor, a shader document is half
//! machine-owned and half user-owned: the declarations that mirror the graph
//! (uniforms, buffers, vertex inputs, directives) are generated, everything
//! after them is free-form code. This crate is the engine that maintains that
//! split:
//!
//! - a **generated region** at the top of the buffer, rebuilt every cycle and
//!   delimited by plain-text sentinels that round-trip through save/reload,
//! - **editable sub-spans** inside the generated region (inline values and
//!   interface-block bodies) that survive regeneration,
//! - **declaration checks** that match graph connections against parsed
//!   declarations by name and attach diagnostics with quick fixes,
//! - **edit and cursor protection** so keystrokes cannot corrupt the
//!   generated region and the caret never lands inside a sentinel.
//!
//! Parsing lives in [`shader_sync_lang`]; this crate consumes its statement
//! tree and never patches it - every cycle reparses from scratch.
//!
//! # Quick Start
//!
//! ```rust
//! use shader_sync::{Connection, ConnectionKind, ShaderBlock, ShaderStage, SyncAdapter};
//!
//! let mut element = ShaderBlock::new("material-3", ShaderStage::Fragment, 330);
//! element.profile = Some("core".to_string());
//! element.connections.push(Connection::new("c1", "exposure", ConnectionKind::Float));
//!
//! let mut adapter = SyncAdapter::new("");
//! let report = adapter.attach(&element);
//!
//! assert_eq!(report.diagnostic_count, 0);
//! let text = adapter.document().text();
//! assert!(text.contains("#version 330 core"));
//! assert!(text.contains("uniform float exposure;"));
//! ```
//!
//! # Module Description
//!
//! - [`adapter`] - attach/detach state machine and the synchronization cycle
//! - [`checks`] - the declaration-check framework and the concrete checks
//! - [`document`] - the shader document (buffer + derived state + caches)
//! - [`markers`](mod@markers) - sentinels, editable spans, plain-code views
//! - [`guard`] - edit rejection and caret nudging
//! - [`graph`] - the pipeline-element data model the host feeds in
//! - [`fixes`] - reversible quick fixes (direct and host-undo-queue shapes)
//! - [`diagnostics`] - the per-cycle diagnostic set

pub mod adapter;
pub mod checks;
pub mod diagnostics;
pub mod document;
pub mod fixes;
pub mod graph;
pub mod guard;
pub mod markers;
mod region;

pub use adapter::{SyncAdapter, SyncReport};
pub use checks::{
    CheckContext, CheckDriver, DeclarationCheck, IntegrityRule, MatchedDeclaration, RulePhase,
    StatementCheck,
};
pub use diagnostics::{Diagnostic, DiagnosticOrigin, DiagnosticSet};
pub use document::{ElementBinding, ShaderDocument};
pub use fixes::{FixAction, FixCommand, FixError, QuickFix};
pub use graph::{
    Connection, ConnectionKind, ExtensionRequirement, ShaderBlock, ShaderStage, VertexAttribute,
};
pub use guard::{CaretDirection, EditDecision, ProposedEdit, RejectReason};
pub use markers::{EditableSpan, MarkerMap, MarkerMode, SpanKind};
pub use region::FixedStatement;
// The language layer's vocabulary is part of this crate's API surface.
pub use shader_sync_lang::{Declaration, StatementId, StatementKind, SyntaxTree, TextRange};
