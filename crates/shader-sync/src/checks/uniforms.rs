//! Texture and plain uniform checks.

use crate::checks::{
    CheckContext, DeclarationCheck, IntegrityRule, MatchedDeclaration, RulePhase, rules,
};
use crate::fixes::{FixAction, QuickFix};
use crate::graph::{Connection, ConnectionKind};
use crate::markers;
use crate::region::FixedStatement;
use shader_sync_lang::{Declaration, keywords};

fn type_rule(connection: &Connection, matched: &MatchedDeclaration<'_>) -> Option<String> {
    let expected = connection.kind.glsl_type()?;
    (matched.declaration.type_name != expected).then(|| {
        format!(
            "declared type '{}' does not match expected '{expected}'",
            matched.declaration.type_name
        )
    })
}

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

fn location_rule(connection: &Connection, matched: &MatchedDeclaration<'_>) -> Option<String> {
    let expected = connection.location?;
    match matched.declaration.layout_u32("location") {
        Some(declared) if declared == expected => None,
        Some(declared) => Some(format!(
            "location {declared} does not match expected {expected}"
        )),
        None => Some(format!("missing 'location = {expected}' layout qualifier")),
    }
}

fn connection_fix(declaration: &Declaration) -> Option<QuickFix> {
    let kind = ConnectionKind::from_glsl_type(&declaration.type_name)?;
    Some(QuickFix::new(
        format!("create connection '{}'", declaration.name),
        FixAction::CreateConnection {
            name: declaration.name.clone(),
            kind,
            location: declaration.layout_u32("location"),
            binding: declaration.layout_u32("binding"),
        },
    ))
}

/// Matches texture connections against `uniform sampler*` declarations.
pub struct TextureUniformCheck {
    rules: Vec<IntegrityRule<Connection>>,
}

impl TextureUniformCheck {
    /// Create the check with its standard rule set.
    pub fn new() -> Self {
        Self {
            rules: vec![
                rules::body_forbidden(RulePhase::Pre),
                rules::array_forbidden(RulePhase::Pre),
                IntegrityRule::new(RulePhase::Post, type_rule),
                IntegrityRule::new(RulePhase::Post, binding_rule),
            ],
        }
    }
}

impl Default for TextureUniformCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl DeclarationCheck for TextureUniformCheck {
    type Element = Connection;

    fn title(&self) -> &'static str {
        "textures"
    }

    fn is_handled(&self, declaration: &Declaration) -> bool {
        declaration.has_qualifier("uniform")
            && keywords::is_sampler_type(&declaration.type_name)
    }

    fn pipeline_elements(&mut self, ctx: &CheckContext<'_>) -> Vec<Connection> {
        ctx.element
            .connections
            .iter()
            .filter(|connection| connection.kind.is_texture())
            .cloned()
            .collect()
    }

    fn element_name(&self, element: &Connection) -> String {
        element.name.clone()
    }

    fn element_statement(
        &self,
        element: &Connection,
        _ctx: &CheckContext<'_>,
    ) -> FixedStatement {
        let type_name = element.kind.glsl_type().unwrap_or("sampler2D");
        FixedStatement::line(match element.binding {
            Some(binding) => {
                format!(
                    "layout(binding = {binding}) uniform {type_name} {};",
                    element.name
                )
            }
            None => format!("uniform {type_name} {};", element.name),
        })
    }

    fn rules(&self) -> &[IntegrityRule<Connection>] {
        &self.rules
    }

    fn create_fix(&self, declaration: &Declaration) -> Option<QuickFix> {
        connection_fix(declaration)
    }
}

/// Matches value connections against plain `uniform` declarations.
pub struct PlainUniformCheck {
    rules: Vec<IntegrityRule<Connection>>,
}

impl PlainUniformCheck {
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

impl Default for PlainUniformCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl DeclarationCheck for PlainUniformCheck {
    type Element = Connection;

    fn title(&self) -> &'static str {
        "uniforms"
    }

    fn is_handled(&self, declaration: &Declaration) -> bool {
        declaration.has_qualifier("uniform")
            && !declaration.is_structural()
            && !keywords::is_sampler_type(&declaration.type_name)
    }

    fn pipeline_elements(&mut self, ctx: &CheckContext<'_>) -> Vec<Connection> {
        ctx.element
            .connections
            .iter()
            .filter(|connection| {
                !connection.kind.is_texture() && !connection.kind.is_block()
            })
            .cloned()
            .collect()
    }

    fn element_name(&self, element: &Connection) -> String {
        element.name.clone()
    }

    fn element_statement(
        &self,
        element: &Connection,
        _ctx: &CheckContext<'_>,
    ) -> FixedStatement {
        let type_name = element.kind.glsl_type().unwrap_or("float");
        let prefix = element
            .location
            .map(|location| format!("layout(location = {location}) "))
            .unwrap_or_default();
        FixedStatement::line(match &element.default_value {
            // The default value stays editable in place.
            Some(value) => format!(
                "{prefix}uniform {type_name} {} = {}{value}{};",
                element.name,
                markers::INLINE_OPEN,
                markers::INLINE_CLOSE
            ),
            None => format!("{prefix}uniform {type_name} {};", element.name),
        })
    }

    fn rules(&self) -> &[IntegrityRule<Connection>] {
        &self.rules
    }

    fn create_fix(&self, declaration: &Declaration) -> Option<QuickFix> {
        connection_fix(declaration)
    }
}
