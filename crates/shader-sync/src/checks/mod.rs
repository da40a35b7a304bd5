//! Declaration-check framework.
//!
//! One check exists per pipeline-element category (directives, redefinition,
//! texture uniforms, plain uniforms, storage/uniform buffers, vertex layout).
//! Checks are registered on the adapter in a fixed priority order and driven
//! twice per cycle: the pre-check pass decides what the generated region must
//! contain, the post-check pass diagnoses whatever the fresh parse shows.
//!
//! Category checks share one matching algorithm, implemented once by
//! [`CheckDriver`] over the [`DeclarationCheck`] trait: declarations are
//! matched to pipeline elements strictly by name (first occurrence wins;
//! later duplicates are left to the redefinition check), clean matches are
//! reused verbatim so user-edited marker values survive, and everything else
//! is regenerated canonically.

pub mod attributes;
pub mod buffers;
pub mod directives;
pub mod redefinition;
pub mod uniforms;

use std::collections::{HashMap, HashSet};

use crate::diagnostics::{Diagnostic, DiagnosticOrigin};
use crate::document::ElementBinding;
use crate::fixes::{FixAction, QuickFix};
use crate::graph::ShaderBlock;
use crate::markers::CharMap;
use crate::region::FixedStatement;
use shader_sync_lang::{Declaration, StatementId, SyntaxTree, Terminator, TextRange};

/// Everything a check can see and produce during one pass.
pub struct CheckContext<'a> {
    /// The attached pipeline element.
    pub element: &'a ShaderBlock,
    /// The current tree snapshot.
    pub tree: &'a SyntaxTree,
    /// Per-element facts that survive reparses.
    pub bindings: &'a mut HashMap<String, ElementBinding>,
    raw: &'a str,
    char_map: CharMap,
    section_boundary: usize,
    fixed: Vec<FixedStatement>,
    removals: Vec<TextRange>,
    diagnostics: Vec<Diagnostic>,
}

/// What a pass produced, handed back to the adapter.
pub(crate) struct CheckOutputs {
    pub fixed: Vec<FixedStatement>,
    pub removals: Vec<TextRange>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<'a> CheckContext<'a> {
    pub(crate) fn new(
        element: &'a ShaderBlock,
        tree: &'a SyntaxTree,
        raw: &'a str,
        section_boundary: usize,
        bindings: &'a mut HashMap<String, ElementBinding>,
    ) -> Self {
        Self {
            element,
            tree,
            bindings,
            char_map: CharMap::new(raw),
            raw,
            section_boundary,
            fixed: Vec::new(),
            removals: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Slice the raw buffer (markers included) by char range.
    pub fn raw_slice(&self, range: TextRange) -> String {
        let start = self.char_map.char_to_byte(range.start);
        let end = self.char_map.char_to_byte(range.end);
        self.raw[start..end].to_string()
    }

    /// Returns `true` if `range` lies in the user region.
    pub fn in_user_region(&self, range: TextRange) -> bool {
        range.start >= self.section_boundary
    }

    /// Queue a fixed statement for the region rebuild.
    pub fn emit(&mut self, statement: FixedStatement) {
        self.fixed.push(statement);
    }

    /// Queue a user-region span for removal (it will be regenerated).
    pub fn remove(&mut self, range: TextRange) {
        self.removals.push(range);
    }

    /// Attach a diagnostic.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub(crate) fn into_outputs(self) -> CheckOutputs {
        CheckOutputs {
            fixed: self.fixed,
            removals: self.removals,
            diagnostics: self.diagnostics,
        }
    }
}

/// The object-safe facade the adapter drives.
pub trait StatementCheck {
    /// Stable check name, used for registration bookkeeping.
    fn name(&self) -> &'static str;
    /// First pass: decide generated content, queue removals, cache metadata.
    fn pre_check(&mut self, ctx: &mut CheckContext<'_>);
    /// Second pass, after the rebuild and reparse: attach diagnostics.
    fn post_check(&mut self, ctx: &mut CheckContext<'_>);
}

/// A declaration as seen by integrity rules.
#[derive(Debug, Clone, Copy)]
pub struct MatchedDeclaration<'t> {
    /// Statement id in the current tree.
    pub statement: StatementId,
    /// The parsed declaration.
    pub declaration: &'t Declaration,
    /// Whether the statement owns a body block.
    pub has_body: bool,
    /// How the statement ended.
    pub terminator: Terminator,
    /// Whether the statement carries zero language diagnostics.
    pub language_clean: bool,
}

/// When an integrity rule runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RulePhase {
    /// Before the rebuild; failures force canonical regeneration.
    Pre,
    /// After the reparse; failures become diagnostics.
    Post,
}

/// One integrity predicate: `None` is a pass, `Some(message)` a failure.
pub struct IntegrityRule<E> {
    phase: RulePhase,
    test: Box<dyn Fn(&E, &MatchedDeclaration<'_>) -> Option<String>>,
}

impl<E> IntegrityRule<E> {
    /// Create a rule.
    pub fn new(
        phase: RulePhase,
        test: impl Fn(&E, &MatchedDeclaration<'_>) -> Option<String> + 'static,
    ) -> Self {
        Self {
            phase,
            test: Box::new(test),
        }
    }

    /// The phase this rule runs in.
    pub fn phase(&self) -> RulePhase {
        self.phase
    }

    /// Run the predicate.
    pub fn run(&self, element: &E, matched: &MatchedDeclaration<'_>) -> Option<String> {
        (self.test)(element, matched)
    }
}

/// Reusable integrity rules shared by several checks.
pub mod rules {
    use super::{IntegrityRule, RulePhase};

    /// The declaration must not own a body block.
    pub fn body_forbidden<E>(phase: RulePhase) -> IntegrityRule<E> {
        IntegrityRule::new(phase, |_, matched| {
            matched
                .has_body
                .then(|| format!("'{}' must not declare a body", matched.declaration.name))
        })
    }

    /// The declaration must own a body block.
    pub fn body_required<E>(phase: RulePhase) -> IntegrityRule<E> {
        IntegrityRule::new(phase, |_, matched| {
            (!matched.has_body)
                .then(|| format!("'{}' must declare a body", matched.declaration.name))
        })
    }

    /// The declaration must not carry an array suffix.
    pub fn array_forbidden<E>(phase: RulePhase) -> IntegrityRule<E> {
        IntegrityRule::new(phase, |_, matched| {
            matched
                .declaration
                .is_array()
                .then(|| format!("'{}' must not be an array", matched.declaration.name))
        })
    }
}

/// A category check: one pipeline-element kind matched against declarations.
///
/// The driver owns the matching algorithm; implementations only describe
/// their category.
pub trait DeclarationCheck {
    /// The graph-side element type this check represents in code.
    type Element: Clone;

    /// Stable name, also used as the generated-region header label.
    fn title(&self) -> &'static str;

    /// Header label for generated statements; `None` suppresses the banner.
    fn header(&self) -> Option<&'static str> {
        Some(self.title())
    }

    /// Does this parsed declaration belong to this check's category?
    fn is_handled(&self, declaration: &Declaration) -> bool;

    /// The pipeline elements that must be represented in code.
    fn pipeline_elements(&mut self, ctx: &CheckContext<'_>) -> Vec<Self::Element>;

    /// Cache per-element facts needed by later steps.
    fn extract_element_data(&mut self, _element: &Self::Element, _ctx: &mut CheckContext<'_>) {}

    /// The name used for matching.
    fn element_name(&self, element: &Self::Element) -> String;

    /// Canonical generated text for an element missing from user code.
    fn element_statement(&self, element: &Self::Element, ctx: &CheckContext<'_>)
    -> FixedStatement;

    /// The integrity rules, pre and post phases mixed.
    fn rules(&self) -> &[IntegrityRule<Self::Element>];

    /// A "create the missing pipeline element" fix for an orphan declaration,
    /// if the category supports it.
    fn create_fix(&self, _declaration: &Declaration) -> Option<QuickFix> {
        None
    }

    /// When `true`, even a clean match is re-emitted through
    /// [`DeclarationCheck::element_statement`] instead of verbatim.
    ///
    /// Block categories need this: their canonical text wraps the (cached)
    /// body in editable markers, which a user-authored declaration does not
    /// carry yet.
    fn regenerate_on_keep(&self) -> bool {
        false
    }
}

/// Generic driver: implements the shared matching algorithm over any
/// [`DeclarationCheck`].
pub struct CheckDriver<C: DeclarationCheck> {
    check: C,
    elements: Vec<C::Element>,
}

impl<C: DeclarationCheck> CheckDriver<C> {
    /// Wrap a category check.
    pub fn new(check: C) -> Self {
        Self {
            check,
            elements: Vec::new(),
        }
    }

    /// Name -> first matching declaration, later duplicates invisible.
    fn handled_map<'t>(&self, tree: &'t SyntaxTree) -> HashMap<String, MatchedDeclaration<'t>> {
        let mut map: HashMap<String, MatchedDeclaration<'t>> = HashMap::new();
        for (id, statement) in tree.statements() {
            let Some(declaration) = statement.declaration() else {
                continue;
            };
            if declaration.name.is_empty() || !self.check.is_handled(declaration) {
                continue;
            }
            map.entry(declaration.name.clone())
                .or_insert_with(|| MatchedDeclaration {
                    statement: id,
                    declaration,
                    has_body: statement.has_body(),
                    terminator: statement.terminator,
                    language_clean: statement.diagnostics.is_empty(),
                });
        }
        map
    }

    /// A match is clean when it is properly terminated, has no language
    /// diagnostics, and passes every pre-phase rule.
    fn is_clean(&self, element: &C::Element, matched: &MatchedDeclaration<'_>) -> bool {
        matched.language_clean
            && !matches!(
                matched.terminator,
                Terminator::EndOfInput | Terminator::BlockClose
            )
            && self
                .check
                .rules()
                .iter()
                .filter(|rule| rule.phase() == RulePhase::Pre)
                .all(|rule| rule.run(element, matched).is_none())
    }
}

impl<C: DeclarationCheck> StatementCheck for CheckDriver<C> {
    fn name(&self) -> &'static str {
        self.check.title()
    }

    fn pre_check(&mut self, ctx: &mut CheckContext<'_>) {
        self.elements = self.check.pipeline_elements(ctx);
        for element in &self.elements {
            self.check.extract_element_data(element, ctx);
        }

        let map = self.handled_map(ctx.tree);
        for element in &self.elements {
            let name = self.check.element_name(element);
            let kept = map.get(&name).filter(|m| self.is_clean(element, m)).copied();
            let mut fixed = match kept {
                Some(matched) => {
                    let span = ctx.tree.declaration_span(matched.statement);
                    if ctx.in_user_region(span) {
                        ctx.remove(span);
                    }
                    if self.check.regenerate_on_keep() {
                        self.check.element_statement(element, ctx)
                    } else {
                        FixedStatement::from_text(&ctx.raw_slice(span))
                    }
                }
                None => self.check.element_statement(element, ctx),
            };
            fixed.header = self.check.header().map(str::to_string);
            ctx.emit(fixed);
        }
    }

    fn post_check(&mut self, ctx: &mut CheckContext<'_>) {
        let map = self.handled_map(ctx.tree);
        let mut claimed: HashSet<String> = HashSet::new();

        for element in &self.elements {
            let name = self.check.element_name(element);
            if let Some(matched) = map.get(&name) {
                for rule in self
                    .check
                    .rules()
                    .iter()
                    .filter(|rule| rule.phase() == RulePhase::Post)
                {
                    if let Some(message) = rule.run(element, matched) {
                        ctx.report(Diagnostic::new(
                            message,
                            matched.statement,
                            ctx.tree.statement(matched.statement).range,
                            DiagnosticOrigin::Pipeline,
                        ));
                    }
                }
            }
            claimed.insert(name);
        }

        // Unhandled names, reported in source order.
        let mut orphans: Vec<(&String, &MatchedDeclaration<'_>)> = map
            .iter()
            .filter(|(name, _)| !claimed.contains(*name))
            .collect();
        orphans.sort_by_key(|(_, matched)| matched.statement);
        for (name, matched) in orphans {
            let span = ctx.tree.declaration_span(matched.statement);
            let mut fixes = Vec::new();
            if let Some(fix) = self.check.create_fix(matched.declaration) {
                fixes.push(fix);
            }
            fixes.push(QuickFix::new(
                format!("delete declaration '{name}'"),
                FixAction::DeleteText { range: span },
            ));
            ctx.report(
                Diagnostic::new(
                    format!("'{name}' has no matching pipeline element"),
                    matched.statement,
                    ctx.tree.statement(matched.statement).range,
                    DiagnosticOrigin::Pipeline,
                )
                .with_fixes(fixes),
            );
        }
    }
}
