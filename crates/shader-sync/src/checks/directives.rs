//! Version and extension directive checks.
//!
//! Directives sit at the top of the registration order: the generated region
//! always opens with the `#version` line, followed by required `#extension`
//! lines, before any declaration group.

use crate::checks::{CheckContext, StatementCheck};
use crate::diagnostics::{Diagnostic, DiagnosticOrigin};
use crate::fixes::{FixAction, QuickFix};
use crate::region::FixedStatement;
use shader_sync_lang::{StatementKind, Terminator};

fn is_complete_directive(terminator: Terminator) -> bool {
    // A directive ends at its line break; one flushed at end of input is
    // complete too, since nothing can follow it.
    matches!(terminator, Terminator::LineBreak | Terminator::EndOfInput)
}

/// Keeps the `#version` directive in agreement with the pipeline element.
#[derive(Debug, Default)]
pub struct VersionCheck;

impl VersionCheck {
    /// Create the check.
    pub fn new() -> Self {
        Self
    }

    fn canonical(ctx: &CheckContext<'_>) -> String {
        match &ctx.element.profile {
            Some(profile) => format!("#version {} {profile}", ctx.element.version),
            None => format!("#version {}", ctx.element.version),
        }
    }
}

impl StatementCheck for VersionCheck {
    fn name(&self) -> &'static str {
        "version"
    }

    fn pre_check(&mut self, ctx: &mut CheckContext<'_>) {
        let found = ctx.tree.statements().find_map(|(id, stmt)| match &stmt.kind {
            StatementKind::Version(directive) => Some((id, stmt, directive.clone())),
            _ => None,
        });

        let fixed = match found {
            Some((_, stmt, directive))
                if directive.number == ctx.element.version
                    && directive.profile == ctx.element.profile
                    && stmt.diagnostics.is_empty()
                    && is_complete_directive(stmt.terminator) =>
            {
                let span = stmt.range;
                if ctx.in_user_region(span) {
                    ctx.remove(span);
                }
                FixedStatement::from_text(&ctx.raw_slice(span))
            }
            _ => FixedStatement::line(Self::canonical(ctx)),
        };
        ctx.emit(fixed);
    }

    fn post_check(&mut self, ctx: &mut CheckContext<'_>) {
        let versions: Vec<_> = ctx
            .tree
            .statements()
            .filter(|(_, stmt)| matches!(stmt.kind, StatementKind::Version(_)))
            .collect();

        for (id, stmt) in versions.iter().skip(1) {
            ctx.report(
                Diagnostic::new(
                    "duplicate #version directive",
                    *id,
                    stmt.range,
                    DiagnosticOrigin::Pipeline,
                )
                .with_fixes(vec![QuickFix::new(
                    "delete duplicate #version directive",
                    FixAction::DeleteText { range: stmt.range },
                )]),
            );
        }

        // Features the pipeline element wants may need a newer language
        // version than the element declares.
        if let Some((id, stmt)) = versions.first() {
            for connection in &ctx.element.connections {
                let minimum = connection.kind.minimum_version();
                if ctx.element.version < minimum {
                    ctx.report(Diagnostic::new(
                        format!(
                            "version {} is too low for connection '{}' (requires {minimum})",
                            ctx.element.version, connection.name
                        ),
                        *id,
                        stmt.range,
                        DiagnosticOrigin::Pipeline,
                    ));
                }
            }
        }
    }
}

/// Keeps `#extension` directives in agreement with the element's requirements.
#[derive(Debug, Default)]
pub struct ExtensionCheck;

impl ExtensionCheck {
    /// Create the check.
    pub fn new() -> Self {
        Self
    }
}

impl StatementCheck for ExtensionCheck {
    fn name(&self) -> &'static str {
        "extensions"
    }

    fn pre_check(&mut self, ctx: &mut CheckContext<'_>) {
        for requirement in &ctx.element.extensions {
            let found = ctx.tree.statements().find_map(|(_, stmt)| match &stmt.kind {
                StatementKind::Extension(directive) if directive.name == requirement.name => {
                    Some((stmt, directive.clone()))
                }
                _ => None,
            });

            let fixed = match found {
                Some((stmt, directive))
                    if directive.behavior == requirement.behavior
                        && stmt.diagnostics.is_empty()
                        && is_complete_directive(stmt.terminator) =>
                {
                    let span = stmt.range;
                    if ctx.in_user_region(span) {
                        ctx.remove(span);
                    }
                    FixedStatement::from_text(&ctx.raw_slice(span))
                }
                _ => FixedStatement::line(format!(
                    "#extension {} : {}",
                    requirement.name, requirement.behavior
                )),
            };
            ctx.emit(fixed);
        }
    }

    fn post_check(&mut self, ctx: &mut CheckContext<'_>) {
        let mut seen: Vec<&str> = Vec::new();
        for (id, stmt) in ctx.tree.statements() {
            let StatementKind::Extension(directive) = &stmt.kind else {
                continue;
            };
            if seen.contains(&directive.name.as_str()) {
                ctx.report(
                    Diagnostic::new(
                        format!("duplicate #extension directive for '{}'", directive.name),
                        id,
                        stmt.range,
                        DiagnosticOrigin::Pipeline,
                    )
                    .with_fixes(vec![QuickFix::new(
                        "delete duplicate #extension directive",
                        FixAction::DeleteText { range: stmt.range },
                    )]),
                );
                continue;
            }
            seen.push(&directive.name);

            let required = ctx
                .element
                .extensions
                .iter()
                .any(|req| req.name == directive.name);
            if !required {
                ctx.report(
                    Diagnostic::new(
                        format!(
                            "extension '{}' is not required by the pipeline element",
                            directive.name
                        ),
                        id,
                        stmt.range,
                        DiagnosticOrigin::Pipeline,
                    )
                    .with_fixes(vec![
                        QuickFix::new(
                            format!("require extension '{}'", directive.name),
                            FixAction::RequireExtension {
                                name: directive.name.clone(),
                                behavior: directive.behavior.clone(),
                            },
                        ),
                        QuickFix::new(
                            "delete #extension directive",
                            FixAction::DeleteText { range: stmt.range },
                        ),
                    ]),
                );
            }
        }
    }
}
