//! Quick fixes: reversible remediation actions attached to diagnostics.
//!
//! A fix can be invoked two ways, and every fix supports both:
//!
//! - **direct**: [`QuickFix::apply_direct`] mutates the document/element
//!   immediately, with no undo recording;
//! - **command**: [`QuickFix::to_command`] captures the inverse action and
//!   hands back a [`FixCommand`] the host can push on its own undo queue.
//!
//! After applying a fix the host re-runs the synchronization cycle; fixes
//! never try to keep derived state consistent themselves.

use thiserror::Error;

use crate::document::ShaderDocument;
use crate::graph::{Connection, ConnectionKind, ExtensionRequirement, ShaderBlock, VertexAttribute};
use shader_sync_lang::TextRange;

/// Errors surfaced when a fix cannot be applied.
#[derive(Debug, Error)]
pub enum FixError {
    /// The target range no longer fits the document.
    #[error("fix range {start}..{end} is outside the document ({len} chars)")]
    StaleRange {
        /// Range start (char offset).
        start: usize,
        /// Range end (char offset).
        end: usize,
        /// Current document length in chars.
        len: usize,
    },

    /// A graph object the fix expected is missing.
    #[error("element '{element}' has no {kind} named '{name}'")]
    MissingTarget {
        /// The pipeline element id.
        element: String,
        /// What was looked up (`connection`, `attribute`, `extension`).
        kind: &'static str,
        /// The missing name.
        name: String,
    },

    /// A graph object the fix would create already exists.
    #[error("element '{element}' already has a {kind} named '{name}'")]
    DuplicateTarget {
        /// The pipeline element id.
        element: String,
        /// What was looked up.
        kind: &'static str,
        /// The conflicting name.
        name: String,
    },
}

/// One reversible mutation of the document or its pipeline element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixAction {
    /// Create a connection on the element from a declaration's facts.
    CreateConnection {
        /// Shader-visible name.
        name: String,
        /// Payload kind.
        kind: ConnectionKind,
        /// Explicit location, if declared.
        location: Option<u32>,
        /// Explicit binding, if declared.
        binding: Option<u32>,
    },
    /// Remove the connection with the given name.
    RemoveConnection {
        /// Shader-visible name.
        name: String,
    },
    /// Add a vertex-layout entry.
    CreateAttribute {
        /// Attribute name.
        name: String,
        /// Attribute type spelling.
        type_name: String,
        /// Attribute location.
        location: u32,
    },
    /// Remove the vertex-layout entry with the given name.
    RemoveAttribute {
        /// Attribute name.
        name: String,
    },
    /// Add an extension requirement.
    RequireExtension {
        /// Extension name.
        name: String,
        /// Behavior word.
        behavior: String,
    },
    /// Drop the extension requirement with the given name.
    DropExtension {
        /// Extension name.
        name: String,
    },
    /// Delete a text range from the document.
    DeleteText {
        /// The range to delete (char offsets).
        range: TextRange,
    },
    /// Insert text into the document.
    InsertText {
        /// Insertion offset (chars).
        offset: usize,
        /// Text to insert.
        text: String,
    },
}

/// A labeled, user-invocable fix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickFix {
    /// Short UI label (e.g. `create connection 'fog'`).
    pub label: String,
    /// The mutation to perform.
    pub action: FixAction,
}

impl QuickFix {
    /// Create a fix.
    pub fn new(label: impl Into<String>, action: FixAction) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }

    /// Apply the fix immediately, with no undo recording.
    pub fn apply_direct(
        &self,
        document: &mut ShaderDocument,
        element: &mut ShaderBlock,
    ) -> Result<(), FixError> {
        apply_action(&self.action, document, element)
    }

    /// Capture the inverse and return a command for the host undo queue.
    ///
    /// The inverse is computed against the *current* state, so the command
    /// must be applied before the document or element changes again.
    pub fn to_command(
        &self,
        document: &ShaderDocument,
        element: &ShaderBlock,
    ) -> Result<FixCommand, FixError> {
        Ok(FixCommand {
            label: self.label.clone(),
            undo: invert_action(&self.action, document, element)?,
            redo: self.action.clone(),
        })
    }
}

/// A fix packaged for the host's undo queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixCommand {
    /// UI label, same as the originating fix.
    pub label: String,
    /// Forward action.
    pub redo: FixAction,
    /// Captured inverse action.
    pub undo: FixAction,
}

impl FixCommand {
    /// Perform (or re-perform) the fix.
    pub fn apply(
        &self,
        document: &mut ShaderDocument,
        element: &mut ShaderBlock,
    ) -> Result<(), FixError> {
        apply_action(&self.redo, document, element)
    }

    /// Revert the fix.
    pub fn revert(
        &self,
        document: &mut ShaderDocument,
        element: &mut ShaderBlock,
    ) -> Result<(), FixError> {
        apply_action(&self.undo, document, element)
    }
}

fn check_range(document: &ShaderDocument, range: TextRange) -> Result<(), FixError> {
    let len = document.len_chars();
    if range.end > len || range.start > range.end {
        return Err(FixError::StaleRange {
            start: range.start,
            end: range.end,
            len,
        });
    }
    Ok(())
}

fn apply_action(
    action: &FixAction,
    document: &mut ShaderDocument,
    element: &mut ShaderBlock,
) -> Result<(), FixError> {
    match action {
        FixAction::CreateConnection {
            name,
            kind,
            location,
            binding,
        } => {
            if element.connection(name).is_some() {
                return Err(FixError::DuplicateTarget {
                    element: element.id.clone(),
                    kind: "connection",
                    name: name.clone(),
                });
            }
            element.connections.push(Connection {
                id: format!("{}:{}", element.id, name),
                name: name.clone(),
                kind: *kind,
                location: *location,
                binding: *binding,
                default_value: None,
            });
            Ok(())
        }
        FixAction::RemoveConnection { name } => {
            let before = element.connections.len();
            element.connections.retain(|c| &c.name != name);
            if element.connections.len() == before {
                return Err(FixError::MissingTarget {
                    element: element.id.clone(),
                    kind: "connection",
                    name: name.clone(),
                });
            }
            Ok(())
        }
        FixAction::CreateAttribute {
            name,
            type_name,
            location,
        } => {
            if element.vertex_layout.iter().any(|a| &a.name == name) {
                return Err(FixError::DuplicateTarget {
                    element: element.id.clone(),
                    kind: "attribute",
                    name: name.clone(),
                });
            }
            element.vertex_layout.push(VertexAttribute {
                name: name.clone(),
                type_name: type_name.clone(),
                location: *location,
            });
            Ok(())
        }
        FixAction::RemoveAttribute { name } => {
            let before = element.vertex_layout.len();
            element.vertex_layout.retain(|a| &a.name != name);
            if element.vertex_layout.len() == before {
                return Err(FixError::MissingTarget {
                    element: element.id.clone(),
                    kind: "attribute",
                    name: name.clone(),
                });
            }
            Ok(())
        }
        FixAction::RequireExtension { name, behavior } => {
            if element.extensions.iter().any(|e| &e.name == name) {
                return Err(FixError::DuplicateTarget {
                    element: element.id.clone(),
                    kind: "extension",
                    name: name.clone(),
                });
            }
            element.extensions.push(ExtensionRequirement {
                name: name.clone(),
                behavior: behavior.clone(),
            });
            Ok(())
        }
        FixAction::DropExtension { name } => {
            let before = element.extensions.len();
            element.extensions.retain(|e| &e.name != name);
            if element.extensions.len() == before {
                return Err(FixError::MissingTarget {
                    element: element.id.clone(),
                    kind: "extension",
                    name: name.clone(),
                });
            }
            Ok(())
        }
        FixAction::DeleteText { range } => {
            check_range(document, *range)?;
            document.replace(*range, "");
            Ok(())
        }
        FixAction::InsertText { offset, text } => {
            check_range(document, TextRange::new(*offset, *offset))?;
            document.replace(TextRange::new(*offset, *offset), text);
            Ok(())
        }
    }
}

fn invert_action(
    action: &FixAction,
    document: &ShaderDocument,
    element: &ShaderBlock,
) -> Result<FixAction, FixError> {
    match action {
        FixAction::CreateConnection { name, .. } => {
            Ok(FixAction::RemoveConnection { name: name.clone() })
        }
        FixAction::RemoveConnection { name } => {
            let connection =
                element
                    .connection(name)
                    .ok_or_else(|| FixError::MissingTarget {
                        element: element.id.clone(),
                        kind: "connection",
                        name: name.clone(),
                    })?;
            Ok(FixAction::CreateConnection {
                name: connection.name.clone(),
                kind: connection.kind,
                location: connection.location,
                binding: connection.binding,
            })
        }
        FixAction::CreateAttribute { name, .. } => {
            Ok(FixAction::RemoveAttribute { name: name.clone() })
        }
        FixAction::RemoveAttribute { name } => {
            let attribute = element
                .vertex_layout
                .iter()
                .find(|a| &a.name == name)
                .ok_or_else(|| FixError::MissingTarget {
                    element: element.id.clone(),
                    kind: "attribute",
                    name: name.clone(),
                })?;
            Ok(FixAction::CreateAttribute {
                name: attribute.name.clone(),
                type_name: attribute.type_name.clone(),
                location: attribute.location,
            })
        }
        FixAction::RequireExtension { name, .. } => {
            Ok(FixAction::DropExtension { name: name.clone() })
        }
        FixAction::DropExtension { name } => {
            let extension = element
                .extensions
                .iter()
                .find(|e| &e.name == name)
                .ok_or_else(|| FixError::MissingTarget {
                    element: element.id.clone(),
                    kind: "extension",
                    name: name.clone(),
                })?;
            Ok(FixAction::RequireExtension {
                name: extension.name.clone(),
                behavior: extension.behavior.clone(),
            })
        }
        FixAction::DeleteText { range } => {
            check_range(document, *range)?;
            Ok(FixAction::InsertText {
                offset: range.start,
                text: document.slice(*range),
            })
        }
        FixAction::InsertText { offset, text } => Ok(FixAction::DeleteText {
            range: TextRange::new(*offset, *offset + text.chars().count()),
        }),
    }
}
