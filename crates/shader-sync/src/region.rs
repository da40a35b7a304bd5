//! Generated-region composition.
//!
//! The pre-check pass hands the adapter an ordered list of fixed statements;
//! this module turns them into the literal text of the generated region -
//! grouped under header banners, followed by the binding line and the
//! section-end sentinel - and splices it over the previous region.

use crate::document::ShaderDocument;
use crate::markers;
use shader_sync_lang::TextRange;

/// Canonical generated text for one pipeline element (or directive).
///
/// Fixed statements are value objects: they are not part of the live tree,
/// only input to the next region rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedStatement {
    /// Literal lines, emitted verbatim.
    pub lines: Vec<String>,
    /// Grouping label; a banner comment is emitted whenever it changes.
    pub header: Option<String>,
}

impl FixedStatement {
    /// A single-line statement with no header.
    pub fn line(text: impl Into<String>) -> Self {
        Self {
            lines: vec![text.into()],
            header: None,
        }
    }

    /// A statement built from (possibly multi-line) raw text.
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text
                .split('\n')
                .map(|line| line.trim_end_matches('\r').to_string())
                .collect(),
            header: None,
        }
    }

    /// Attach a grouping header.
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }
}

/// Render the full generated-region text, trailing newline included.
pub(crate) fn compose(element_id: &str, fixed: &[FixedStatement]) -> String {
    let mut out = String::new();
    let mut current_header: Option<&str> = None;
    for statement in fixed {
        let header = statement.header.as_deref();
        if header != current_header {
            if let Some(label) = header {
                out.push_str(&format!("// --- {label} ---\n"));
            }
            current_header = header;
        }
        for line in &statement.lines {
            out.push_str(line);
            out.push('\n');
        }
    }
    out.push_str(&markers::binding_line(element_id));
    out.push('\n');
    out.push_str(markers::SECTION_END);
    out.push('\n');
    out
}

/// Replace the old generated region (everything up to and including the
/// section-end line) with freshly composed text, and guarantee at least one
/// editable line after it.
pub(crate) fn rebuild(document: &mut ShaderDocument, element_id: &str, fixed: &[FixedStatement]) {
    let old_end = document.section_boundary().unwrap_or(0);
    let text = compose(element_id, fixed);
    document.replace(TextRange::new(0, old_end), &text);

    let boundary = text.chars().count();
    if document.len_chars() == boundary {
        document.replace(TextRange::new(boundary, boundary), "\n");
    }
}

/// Remove the generated region and every marker, leaving plain user text.
pub(crate) fn dissolve(document: &mut ShaderDocument) {
    let stripped = document.plain_view(markers::MarkerMode::Strip);
    let len = document.len_chars();
    document.replace(TextRange::new(0, len), &stripped);
}
