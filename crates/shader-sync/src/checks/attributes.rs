//! Vertex-attribute layout check.
//!
//! Registered dynamically: only a document attached to a vertex-stage
//! element carries this check, and detaching removes it again.

use crate::checks::{
    CheckContext, DeclarationCheck, IntegrityRule, MatchedDeclaration, RulePhase, rules,
};
use crate::fixes::{FixAction, QuickFix};
use crate::graph::VertexAttribute;
use crate::region::FixedStatement;
use shader_sync_lang::Declaration;

fn type_rule(attribute: &VertexAttribute, matched: &MatchedDeclaration<'_>) -> Option<String> {
    (matched.declaration.type_name != attribute.type_name).then(|| {
        format!(
            "declared type '{}' does not match expected '{}'",
            matched.declaration.type_name, attribute.type_name
        )
    })
}

fn location_rule(attribute: &VertexAttribute, matched: &MatchedDeclaration<'_>) -> Option<String> {
    match matched.declaration.layout_u32("location") {
        Some(declared) if declared == attribute.location => None,
        Some(declared) => Some(format!(
            "location {declared} does not match expected {}",
            attribute.location
        )),
        None => Some(format!(
            "missing 'location = {}' layout qualifier",
            attribute.location
        )),
    }
}

/// Matches vertex-layout entries against global `in` declarations.
pub struct VertexLayoutCheck {
    rules: Vec<IntegrityRule<VertexAttribute>>,
}

impl VertexLayoutCheck {
    /// Create the check with its standard rule set.
    pub fn new() -> Self {
        Self {
            rules: vec![
                rules::body_forbidden(RulePhase::Pre),
                rules::array_forbidden(RulePhase::Pre),
                IntegrityRule::new(RulePhase::Post, type_rule),
                IntegrityRule::new(RulePhase::Post, location_rule),
            ],
        }
    }
}

impl Default for VertexLayoutCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl DeclarationCheck for VertexLayoutCheck {
    type Element = VertexAttribute;

    fn title(&self) -> &'static str {
        "vertex layout"
    }

    fn is_handled(&self, declaration: &Declaration) -> bool {
        declaration.has_qualifier("in") && !declaration.is_structural()
    }

    fn pipeline_elements(&mut self, ctx: &CheckContext<'_>) -> Vec<VertexAttribute> {
        ctx.element.vertex_layout.clone()
    }

    fn element_name(&self, element: &VertexAttribute) -> String {
        element.name.clone()
    }

    fn element_statement(
        &self,
        element: &VertexAttribute,
        _ctx: &CheckContext<'_>,
    ) -> FixedStatement {
        FixedStatement::line(format!(
            "layout(location = {}) in {} {};",
            element.location, element.type_name, element.name
        ))
    }

    fn rules(&self) -> &[IntegrityRule<VertexAttribute>] {
        &self.rules
    }

    fn create_fix(&self, declaration: &Declaration) -> Option<QuickFix> {
        Some(QuickFix::new(
            format!("create vertex attribute '{}'", declaration.name),
            FixAction::CreateAttribute {
                name: declaration.name.clone(),
                type_name: declaration.type_name.clone(),
                location: declaration.layout_u32("location").unwrap_or(0),
            },
        ))
    }
}
