use shader_sync::{
    CaretDirection, Connection, ConnectionKind, EditDecision, ProposedEdit, RejectReason,
    ShaderBlock, ShaderStage, SpanKind, SyncAdapter, markers,
};

fn adapter_with_inline_span() -> SyncAdapter {
    let mut element = ShaderBlock::new("mat-1", ShaderStage::Fragment, 330);
    let mut connection = Connection::new("c-g", "gain", ConnectionKind::Float);
    connection.default_value = Some("0.5".to_string());
    element.connections.push(connection);

    let mut adapter = SyncAdapter::new("void main() {\n}\n");
    adapter.attach(&element);
    adapter
}

fn adapter_with_block_span() -> SyncAdapter {
    let mut element = ShaderBlock::new("fx-1", ShaderStage::Compute, 430);
    let mut connection = Connection::new("c-p", "Particles", ConnectionKind::StorageBlock);
    connection.binding = Some(2);
    element.connections.push(connection);

    let mut adapter = SyncAdapter::new("");
    adapter.attach(&element);
    adapter
}

#[test]
fn test_unattached_document_accepts_everything() {
    let mut adapter = SyncAdapter::new("float x;\n");
    let edit = ProposedEdit::insertion(0, "anything");
    assert!(adapter.try_edit(&edit).is_allowed());
}

#[test]
fn test_generated_region_rejects_edits() {
    let adapter = adapter_with_inline_span();

    let decision = adapter.review_edit(&ProposedEdit::insertion(0, "x"));
    assert_eq!(decision, EditDecision::Reject(RejectReason::GeneratedRegion));
}

#[test]
fn test_user_region_accepts_edits() {
    let adapter = adapter_with_inline_span();
    let boundary = adapter.document().section_boundary().expect("attached");

    let decision = adapter.review_edit(&ProposedEdit::insertion(boundary, "float helper;\n"));
    assert!(decision.is_allowed());
}

#[test]
fn test_inline_span_accepts_value_edit() {
    let adapter = adapter_with_inline_span();
    let span = adapter.document().markers().spans[0];
    assert_eq!(span.kind, SpanKind::Inline);

    let decision = adapter.review_edit(&ProposedEdit::replacement(span.inner, "0.25"));
    assert!(decision.is_allowed());
}

#[test]
fn test_inline_span_rejects_line_break() {
    let adapter = adapter_with_inline_span();
    let span = adapter.document().markers().spans[0];

    let decision = adapter.review_edit(&ProposedEdit::insertion(span.inner.start, "1.0\n"));
    assert_eq!(
        decision,
        EditDecision::Reject(RejectReason::LineBreakInInlineSpan)
    );
}

#[test]
fn test_block_span_accepts_multi_line_edit() {
    let adapter = adapter_with_block_span();
    let span = adapter
        .document()
        .markers()
        .spans
        .iter()
        .find(|span| span.kind == SpanKind::Block)
        .copied()
        .expect("block span present");

    let decision =
        adapter.review_edit(&ProposedEdit::insertion(span.inner.start + 1, "\nvec4 p;\n"));
    assert!(decision.is_allowed());
}

#[test]
fn test_deleting_into_a_marker_is_rejected() {
    let adapter = adapter_with_inline_span();
    let span = adapter.document().markers().spans[0];

    // Backspace at the span start expands over the marker's last character.
    let decision = adapter.review_edit(&ProposedEdit::backspace(span.inner.start));
    assert!(!decision.is_allowed());

    // Forward delete at the span end expands over the closing marker.
    let decision = adapter.review_edit(&ProposedEdit::delete_forward(span.inner.end));
    assert!(!decision.is_allowed());
}

#[test]
fn test_edit_crossing_span_boundary_is_rejected() {
    let adapter = adapter_with_inline_span();
    let span = adapter.document().markers().spans[0];

    let crossing =
        shader_sync::TextRange::new(span.inner.start.saturating_sub(2), span.inner.end);
    let decision = adapter.review_edit(&ProposedEdit::replacement(crossing, "1.0"));
    assert_eq!(
        decision,
        EditDecision::Reject(RejectReason::CrossesSpanBoundary)
    );
}

#[test]
fn test_caret_converges_out_of_sentinel() {
    let adapter = adapter_with_inline_span();
    let text = adapter.document().text();
    let marker_start = text.find(markers::SECTION_END).expect("section end");

    let mut pos = marker_start + 3;
    for _ in 0..markers::SECTION_END.len() {
        let next = adapter.adjust_caret(pos, CaretDirection::Forward);
        if next == pos {
            break;
        }
        pos = next;
    }
    assert!(markers::marker_span_at(&text, pos).is_none());
    assert_eq!(pos, marker_start + markers::SECTION_END.len());

    let mut pos = marker_start + 3;
    for _ in 0..markers::SECTION_END.len() {
        let next = adapter.adjust_caret(pos, CaretDirection::Backward);
        if next == pos {
            break;
        }
        pos = next;
    }
    assert!(markers::marker_span_at(&text, pos).is_none());
    assert_eq!(pos, marker_start);
}

#[test]
fn test_caret_outside_sentinels_is_untouched() {
    let adapter = adapter_with_inline_span();
    assert_eq!(adapter.adjust_caret(0, CaretDirection::Forward), 0);
}
