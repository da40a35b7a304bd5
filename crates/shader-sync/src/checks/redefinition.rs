//! Redefinition detection.
//!
//! Runs after the directive checks and before the category checks. Category
//! checks only ever see the first declaration of a name; this check owns the
//! rest.

use crate::checks::{CheckContext, StatementCheck};
use crate::diagnostics::{Diagnostic, DiagnosticOrigin};
use crate::fixes::{FixAction, QuickFix};

use std::collections::HashSet;

/// Flags repeated global-scope declarations of one name.
#[derive(Debug, Default)]
pub struct RedefinitionCheck;

impl RedefinitionCheck {
    /// Create the check.
    pub fn new() -> Self {
        Self
    }
}

impl StatementCheck for RedefinitionCheck {
    fn name(&self) -> &'static str {
        "redefinition"
    }

    fn pre_check(&mut self, _ctx: &mut CheckContext<'_>) {}

    fn post_check(&mut self, ctx: &mut CheckContext<'_>) {
        let mut seen: HashSet<&str> = HashSet::new();
        for (id, stmt) in ctx.tree.statements() {
            let Some(declaration) = stmt.declaration() else {
                continue;
            };
            // Function overloads legitimately share a name.
            if declaration.name.is_empty()
                || declaration.is_method
                || !ctx.tree.is_global_scope(id)
            {
                continue;
            }
            if seen.insert(declaration.name.as_str()) {
                continue;
            }
            let span = ctx.tree.declaration_span(id);
            ctx.report(
                Diagnostic::new(
                    format!("redefinition of '{}'", declaration.name),
                    id,
                    stmt.range,
                    DiagnosticOrigin::Pipeline,
                )
                .with_fixes(vec![QuickFix::new(
                    format!("delete redefinition of '{}'", declaration.name),
                    FixAction::DeleteText { range: span },
                )]),
            );
        }
    }
}
