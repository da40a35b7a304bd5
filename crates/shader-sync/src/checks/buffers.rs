//! Shader-storage and uniform buffer block checks.
//!
//! Interface blocks are the one category whose generated text embeds a
//! *multi-line* editable span: the member list belongs to the user, so it is
//! wrapped in block markers and cached on the document (keyed by the
//! connection's identity) to survive regeneration.

use crate::checks::{
    CheckContext, DeclarationCheck, IntegrityRule, MatchedDeclaration, RulePhase, rules,
};
use crate::fixes::{FixAction, QuickFix};
use crate::graph::{Connection, ConnectionKind};
use crate::markers;
use crate::region::FixedStatement;
use shader_sync_lang::Declaration;

fn binding_rule(connection: &Connection, matched: &MatchedDeclaration<'_>) -> Option<String> {
    let expected = connection.binding?;
    match matched.declaration.layout_u32("binding") {
        Some(declared) if declared == expected => None,
        Some(declared) => Some(format!(
            "binding {declared} does not match expected {expected}"
        )),
        None => Some(format!("missing 'binding = {expected}' layout qualifier")),
    }
}

fn block_statement(
    element: &Connection,
    ctx: &CheckContext<'_>,
    storage_qualifier: &str,
    layout_format: &str,
) -> FixedStatement {
    let body = ctx
        .bindings
        .get(&element.id)
        .and_then(|binding| binding.block_body.clone())
        .unwrap_or_else(|| "{\n}".to_string());

    let head = match element.binding {
        Some(binding) => format!(
            "layout({layout_format}, binding = {binding}) {storage_qualifier} {}",
            element.name
        ),
        None => format!("layout({layout_format}) {storage_qualifier} {}", element.name),
    };

    let mut lines = vec![head, markers::BLOCK_OPEN.to_string()];
    lines.extend(body.split('\n').map(|line| line.trim_end_matches('\r').to_string()));
    lines.push(markers::BLOCK_CLOSE.to_string());
    lines.push(";".to_string());
    FixedStatement { lines, header: None }
}

fn cache_block_body<C: DeclarationCheck<Element = Connection>>(
    check: &C,
    element: &Connection,
    ctx: &mut CheckContext<'_>,
) {
    let found = ctx.tree.statements().find_map(|(id, stmt)| {
        let declaration = stmt.declaration()?;
        (declaration.name == element.name && check.is_handled(declaration))
            .then_some((id, stmt.body?))
    });
    if let Some((_, body)) = found {
        let body_text = ctx.raw_slice(ctx.tree.block(body).range);
        ctx.bindings
            .entry(element.id.clone())
            .or_default()
            .block_body = Some(body_text);
    }
}

/// Matches storage-block connections against `buffer` interface blocks.
pub struct StorageBufferCheck {
    rules: Vec<IntegrityRule<Connection>>,
}

impl StorageBufferCheck {
    /// Create the check with its standard rule set.
    pub fn new() -> Self {
        Self {
            rules: vec![
                rules::body_required(RulePhase::Pre),
                rules::body_required(RulePhase::Post),
                IntegrityRule::new(RulePhase::Post, binding_rule),
            ],
        }
    }
}

impl Default for StorageBufferCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl DeclarationCheck for StorageBufferCheck {
    type Element = Connection;

    fn title(&self) -> &'static str {
        "buffers"
    }

    fn is_handled(&self, declaration: &Declaration) -> bool {
        declaration.has_qualifier("buffer") && declaration.is_structural()
    }

    fn pipeline_elements(&mut self, ctx: &CheckContext<'_>) -> Vec<Connection> {
        ctx.element
            .connections
            .iter()
            .filter(|connection| connection.kind == ConnectionKind::StorageBlock)
            .cloned()
            .collect()
    }

    fn extract_element_data(&mut self, element: &Connection, ctx: &mut CheckContext<'_>) {
        cache_block_body(self, element, ctx);
    }

    fn element_name(&self, element: &Connection) -> String {
        element.name.clone()
    }

    fn element_statement(&self, element: &Connection, ctx: &CheckContext<'_>) -> FixedStatement {
        block_statement(element, ctx, "buffer", "std430")
    }

    fn rules(&self) -> &[IntegrityRule<Connection>] {
        &self.rules
    }

    fn regenerate_on_keep(&self) -> bool {
        true
    }

    fn create_fix(&self, declaration: &Declaration) -> Option<QuickFix> {
        Some(QuickFix::new(
            format!("create storage-block connection '{}'", declaration.name),
            FixAction::CreateConnection {
                name: declaration.name.clone(),
                kind: ConnectionKind::StorageBlock,
                location: None,
                binding: declaration.layout_u32("binding"),
            },
        ))
    }
}

/// Matches uniform-block connections against `uniform` interface blocks.
pub struct UniformBufferCheck {
    rules: Vec<IntegrityRule<Connection>>,
}

impl UniformBufferCheck {
    /// Create the check with its standard rule set.
    pub fn new() -> Self {
        Self {
            rules: vec![
                rules::body_required(RulePhase::Pre),
                rules::body_required(RulePhase::Post),
                IntegrityRule::new(RulePhase::Post, binding_rule),
            ],
        }
    }
}

impl Default for UniformBufferCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl DeclarationCheck for UniformBufferCheck {
    type Element = Connection;

    fn title(&self) -> &'static str {
        "uniform blocks"
    }

    fn is_handled(&self, declaration: &Declaration) -> bool {
        declaration.has_qualifier("uniform") && declaration.is_structural()
    }

    fn pipeline_elements(&mut self, ctx: &CheckContext<'_>) -> Vec<Connection> {
        ctx.element
            .connections
            .iter()
            .filter(|connection| connection.kind == ConnectionKind::UniformBlock)
            .cloned()
            .collect()
    }

    fn extract_element_data(&mut self, element: &Connection, ctx: &mut CheckContext<'_>) {
        cache_block_body(self, element, ctx);
    }

    fn element_name(&self, element: &Connection) -> String {
        element.name.clone()
    }

    fn element_statement(&self, element: &Connection, ctx: &CheckContext<'_>) -> FixedStatement {
        block_statement(element, ctx, "uniform", "std140")
    }

    fn rules(&self) -> &[IntegrityRule<Connection>] {
        &self.rules
    }

    fn regenerate_on_keep(&self) -> bool {
        true
    }

    fn create_fix(&self, declaration: &Declaration) -> Option<QuickFix> {
        Some(QuickFix::new(
            format!("create uniform-block connection '{}'", declaration.name),
            FixAction::CreateConnection {
                name: declaration.name.clone(),
                kind: ConnectionKind::UniformBlock,
                location: None,
                binding: declaration.layout_u32("binding"),
            },
        ))
    }
}
