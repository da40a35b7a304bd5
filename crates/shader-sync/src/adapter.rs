//! The synchronization adapter.
//!
//! One adapter owns one shader document and keeps it consistent with the
//! pipeline element it is attached to. The state machine has two states -
//! unattached (text passes through untouched) and attached (the generated
//! region is maintained) - and transitions are driven externally by the host
//! via [`SyncAdapter::attach`] / [`SyncAdapter::detach`].
//!
//! Every cycle runs to completion before control returns: pre-check, region
//! rebuild, reparse, post-check. There is no partial or interleaved cycle,
//! and the tree/diagnostics of one cycle are discarded wholesale by the next.

use crate::checks::attributes::VertexLayoutCheck;
use crate::checks::buffers::{StorageBufferCheck, UniformBufferCheck};
use crate::checks::directives::{ExtensionCheck, VersionCheck};
use crate::checks::redefinition::RedefinitionCheck;
use crate::checks::uniforms::{PlainUniformCheck, TextureUniformCheck};
use crate::checks::{CheckContext, CheckDriver, StatementCheck};
use crate::document::ShaderDocument;
use crate::fixes::{FixCommand, FixError, QuickFix};
use crate::graph::{ShaderBlock, ShaderStage};
use crate::guard::{self, CaretDirection, EditDecision, ProposedEdit};
use crate::region;
use shader_sync_lang::TextRange;

const VERTEX_CHECK_NAME: &str = "vertex layout";

/// What one synchronization cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    /// Monotonic cycle counter for this adapter.
    pub cycle: u64,
    /// The generated region after the cycle (empty when unattached).
    pub generated_region: TextRange,
    /// Total diagnostics (language + pipeline) after the cycle.
    pub diagnostic_count: usize,
}

/// Synchronization engine for one shader document.
pub struct SyncAdapter {
    document: ShaderDocument,
    checks: Vec<Box<dyn StatementCheck>>,
    attached: Option<String>,
    cycle: u64,
}

impl SyncAdapter {
    /// Create an unattached adapter over `text`.
    pub fn new(text: &str) -> Self {
        Self {
            document: ShaderDocument::new(text),
            checks: default_checks(),
            attached: None,
            cycle: 0,
        }
    }

    /// The owned document.
    pub fn document(&self) -> &ShaderDocument {
        &self.document
    }

    /// Returns `true` while attached to a pipeline element.
    pub fn is_attached(&self) -> bool {
        self.attached.is_some()
    }

    /// The id of the attached pipeline element, if any.
    pub fn attached_element(&self) -> Option<&str> {
        self.attached.as_deref()
    }

    /// Attach to a pipeline element and run the first cycle.
    ///
    /// # Panics
    ///
    /// Panics if the adapter is already attached; attach/detach transitions
    /// are the host's responsibility and an unbalanced pair is a programming
    /// error, not a recoverable condition.
    pub fn attach(&mut self, element: &ShaderBlock) -> SyncReport {
        assert!(
            self.attached.is_none(),
            "attach on an already attached document"
        );
        self.attached = Some(element.id.clone());
        if element.stage == ShaderStage::Vertex {
            self.checks
                .push(Box::new(CheckDriver::new(VertexLayoutCheck::new())));
        }
        self.run_cycle(element)
    }

    /// Detach from the pipeline element.
    ///
    /// Markers and region bookkeeping are stripped; the generated declaration
    /// text stays behind as ordinary user text, so a later attach can reclaim
    /// it by name matching.
    pub fn detach(&mut self) {
        if self.attached.take().is_none() {
            return;
        }
        self.checks.retain(|check| check.name() != VERTEX_CHECK_NAME);
        region::dissolve(&mut self.document);
        self.document.clear_bindings();
        self.document.reparse();
    }

    /// Run one synchronization cycle.
    ///
    /// Unattached documents pass `None` and only get a reparse. Attached
    /// documents must pass the element they are attached to.
    ///
    /// # Panics
    ///
    /// Panics when the element argument disagrees with the retained attach
    /// state (attached id mismatch, or a `Some`/`None` mismatch either way).
    pub fn synchronize(&mut self, element: Option<&ShaderBlock>) -> SyncReport {
        match (&self.attached, element) {
            (None, None) => {
                self.document.reparse();
                self.cycle += 1;
                SyncReport {
                    cycle: self.cycle,
                    generated_region: TextRange::new(0, 0),
                    diagnostic_count: self.document.diagnostics().len(),
                }
            }
            (Some(id), Some(element)) if *id == element.id => self.run_cycle(element),
            _ => panic!(
                "synchronize called with a pipeline element inconsistent with the attach state"
            ),
        }
    }

    /// Review a proposed edit against the generated region and its spans.
    pub fn review_edit(&self, edit: &ProposedEdit) -> EditDecision {
        guard::review(&self.document, edit)
    }

    /// Review an edit and, when allowed, apply it and reparse.
    ///
    /// The host still owns cycle timing: call [`SyncAdapter::synchronize`]
    /// after the edits of one user action have been applied.
    pub fn try_edit(&mut self, edit: &ProposedEdit) -> EditDecision {
        let decision = self.review_edit(edit);
        if decision.is_allowed() {
            self.document.replace(edit.range, &edit.text);
            self.document.reparse();
        }
        decision
    }

    /// Keep a caret out of sentinel literals (one convergent step).
    pub fn adjust_caret(&self, pos: usize, direction: CaretDirection) -> usize {
        guard::adjust_caret(&self.document.text(), pos, direction)
    }

    /// Apply a quick fix directly, with no undo recording.
    ///
    /// The host re-runs [`SyncAdapter::synchronize`] afterwards; a fix only
    /// mutates, it does not re-derive state beyond a reparse.
    pub fn apply_fix(
        &mut self,
        fix: &QuickFix,
        element: &mut ShaderBlock,
    ) -> Result<(), FixError> {
        fix.apply_direct(&mut self.document, element)?;
        self.document.reparse();
        Ok(())
    }

    /// Package a quick fix as a command for the host undo queue.
    pub fn fix_command(
        &self,
        fix: &QuickFix,
        element: &ShaderBlock,
    ) -> Result<FixCommand, FixError> {
        fix.to_command(&self.document, element)
    }

    fn run_cycle(&mut self, element: &ShaderBlock) -> SyncReport {
        self.document.reparse();

        // Pre-check pass: decide content, collect removals, cache metadata.
        let raw = self.document.text();
        let boundary = self.document.section_boundary().unwrap_or(0);
        let outputs = {
            let (tree, bindings) = self.document.check_parts();
            let mut ctx = CheckContext::new(element, tree, &raw, boundary, bindings);
            for check in &mut self.checks {
                check.pre_check(&mut ctx);
            }
            ctx.into_outputs()
        };

        // Matched statements leave the user region (they reappear in the
        // generated region); apply from the back so earlier ranges stay valid.
        let mut removals = outputs.removals;
        removals.sort_by_key(|range| std::cmp::Reverse(range.start));
        for range in removals {
            self.document.remove_statement_span(range);
        }

        region::rebuild(&mut self.document, &element.id, &outputs.fixed);

        self.document.reparse();

        // Post-check pass: attach diagnostics to the fresh tree.
        let raw = self.document.text();
        let boundary = self.document.section_boundary().unwrap_or(0);
        let outputs = {
            let (tree, bindings) = self.document.check_parts();
            let mut ctx = CheckContext::new(element, tree, &raw, boundary, bindings);
            for check in &mut self.checks {
                check.post_check(&mut ctx);
            }
            ctx.into_outputs()
        };
        self.document.append_diagnostics(outputs.diagnostics);

        self.cycle += 1;
        SyncReport {
            cycle: self.cycle,
            generated_region: TextRange::new(0, self.document.section_boundary().unwrap_or(0)),
            diagnostic_count: self.document.diagnostics().len(),
        }
    }
}

fn default_checks() -> Vec<Box<dyn StatementCheck>> {
    vec![
        Box::new(VersionCheck::new()),
        Box::new(ExtensionCheck::new()),
        Box::new(RedefinitionCheck::new()),
        Box::new(CheckDriver::new(TextureUniformCheck::new())),
        Box::new(CheckDriver::new(PlainUniformCheck::new())),
        Box::new(CheckDriver::new(StorageBufferCheck::new())),
        Box::new(CheckDriver::new(UniformBufferCheck::new())),
    ]
}
