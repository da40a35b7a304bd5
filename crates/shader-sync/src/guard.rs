//! Edit and cursor protection over the generated region.
//!
//! The host asks before applying a keystroke: edits that land in the
//! generated region are rejected unless they stay inside an editable span,
//! and caret placement is nudged out of sentinel literals one step at a time
//! (the host re-asks on the next placement, so the nudge converges instead of
//! jumping).

use unicode_segmentation::UnicodeSegmentation;

use crate::document::ShaderDocument;
use crate::markers::{self, CharMap, SpanKind};
use shader_sync_lang::TextRange;

/// An edit the host wants to apply: replace `range` with `text`.
///
/// Insertions use an empty range; deletions use an empty `text`. The
/// deletion constructors expand the range to cover the character being
/// deleted, so the guard always sees the full affected span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposedEdit {
    /// The replaced range (char offsets; empty for pure insertion).
    pub range: TextRange,
    /// The replacement text (empty for pure deletion).
    pub text: String,
}

impl ProposedEdit {
    /// Insert `text` at `offset`.
    pub fn insertion(offset: usize, text: impl Into<String>) -> Self {
        Self {
            range: TextRange::new(offset, offset),
            text: text.into(),
        }
    }

    /// Replace `range` with `text`.
    pub fn replacement(range: TextRange, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }

    /// Backspace at `caret`: delete the preceding character.
    pub fn backspace(caret: usize) -> Self {
        Self {
            range: TextRange::new(caret.saturating_sub(1), caret),
            text: String::new(),
        }
    }

    /// Forward delete at `caret`: delete the following character.
    pub fn delete_forward(caret: usize) -> Self {
        Self {
            range: TextRange::new(caret, caret + 1),
            text: String::new(),
        }
    }
}

/// Why an edit was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The edit lands in the generated region outside any editable span.
    GeneratedRegion,
    /// The edit would put a line break into a single-line editable span.
    LineBreakInInlineSpan,
    /// The edit crosses an editable span's boundary.
    CrossesSpanBoundary,
}

/// The guard's verdict on a proposed edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditDecision {
    /// Apply the edit.
    Allow,
    /// Drop the edit.
    Reject(RejectReason),
}

impl EditDecision {
    /// Returns `true` for [`EditDecision::Allow`].
    pub fn is_allowed(&self) -> bool {
        matches!(self, EditDecision::Allow)
    }
}

pub(crate) fn review(document: &ShaderDocument, edit: &ProposedEdit) -> EditDecision {
    let Some(boundary) = document.section_boundary() else {
        return EditDecision::Allow;
    };
    if edit.range.start >= boundary {
        return EditDecision::Allow;
    }

    for span in &document.markers().spans {
        if span.inner.start <= edit.range.start && edit.range.end <= span.inner.end {
            return match span.kind {
                SpanKind::Inline if edit.text.contains('\n') => {
                    EditDecision::Reject(RejectReason::LineBreakInInlineSpan)
                }
                _ => EditDecision::Allow,
            };
        }
    }

    let crosses = document
        .markers()
        .spans
        .iter()
        .any(|span| edit.range.start < span.inner.end && edit.range.end > span.inner.start);
    if crosses {
        EditDecision::Reject(RejectReason::CrossesSpanBoundary)
    } else {
        EditDecision::Reject(RejectReason::GeneratedRegion)
    }
}

/// The direction implied by the most recent caret movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaretDirection {
    /// Moving toward the end of the document.
    Forward,
    /// Moving toward the start of the document.
    Backward,
}

/// Nudge a caret one step out of a sentinel, if it sits inside one.
///
/// Returns `pos` unchanged when it is not inside any sentinel literal. The
/// step is one grapheme, not one sentinel: repeated placement attempts walk
/// the caret out.
pub(crate) fn adjust_caret(text: &str, pos: usize, direction: CaretDirection) -> usize {
    if markers::marker_span_at(text, pos).is_none() {
        return pos;
    }
    match direction {
        CaretDirection::Forward => next_grapheme_boundary(text, pos),
        CaretDirection::Backward => prev_grapheme_boundary(text, pos),
    }
}

fn next_grapheme_boundary(text: &str, pos: usize) -> usize {
    let map = CharMap::new(text);
    let byte = map.char_to_byte(pos);
    for (boundary, _) in text.grapheme_indices(true) {
        if boundary > byte {
            return map.byte_to_char(boundary);
        }
    }
    map.char_count()
}

fn prev_grapheme_boundary(text: &str, pos: usize) -> usize {
    let map = CharMap::new(text);
    let byte = map.char_to_byte(pos);
    let mut previous = 0;
    for (boundary, _) in text.grapheme_indices(true) {
        if boundary >= byte {
            break;
        }
        previous = boundary;
    }
    map.byte_to_char(previous)
}
