use shader_sync::markers::{
    self, BLOCK_CLOSE, BLOCK_OPEN, INLINE_CLOSE, INLINE_OPEN, MarkerMode, SECTION_END, SpanKind,
};

#[test]
fn test_scan_finds_inline_span() {
    let text = format!("uniform float gain = {INLINE_OPEN}0.5{INLINE_CLOSE};");
    let map = markers::scan(&text);

    assert_eq!(map.spans.len(), 1);
    let span = map.spans[0];
    assert_eq!(span.kind, SpanKind::Inline);
    assert_eq!(&text[span.inner.start..span.inner.end], "0.5");
    assert_eq!(span.outer.start, "uniform float gain = ".len());
}

#[test]
fn test_scan_finds_block_span() {
    let text = format!("buffer Particles\n{BLOCK_OPEN}\n{{\n    vec4 p;\n}}\n{BLOCK_CLOSE}\n;");
    let map = markers::scan(&text);

    assert_eq!(map.spans.len(), 1);
    let span = map.spans[0];
    assert_eq!(span.kind, SpanKind::Block);
    assert!(text[span.inner.start..span.inner.end].contains("vec4 p;"));
}

#[test]
fn test_scan_ignores_unpaired_tags() {
    let map = markers::scan("no close tag here /*[*/ 0.5");
    assert!(map.spans.is_empty());
}

#[test]
fn test_scan_finds_binding_and_section_end() {
    let text = format!("{}\n{SECTION_END}\nuser code\n", markers::binding_line("node-7"));
    let map = markers::scan(&text);

    let (element, _) = map.binding.expect("binding line found");
    assert_eq!(element, "node-7");
    assert!(map.section_end.is_some());
    assert_eq!(markers::bound_element(&text).as_deref(), Some("node-7"));
}

#[test]
fn test_blank_view_preserves_every_offset() {
    let text = format!(
        "uniform float gain = {INLINE_OPEN}0.5{INLINE_CLOSE};\n{}\n{SECTION_END}\n",
        markers::binding_line("node-7")
    );
    let blank = markers::plain_view(&text, MarkerMode::Blank);

    assert_eq!(blank.chars().count(), text.chars().count());
    assert!(!blank.contains(INLINE_OPEN));
    assert!(!blank.contains(SECTION_END));
    // Non-marker characters stay in place.
    let at = text.find("0.5").unwrap();
    assert_eq!(&blank[at..at + 3], "0.5");
    assert_eq!(&blank[..13], "uniform float");
}

#[test]
fn test_strip_view_drops_marker_lines() {
    let text = format!(
        "uniform float gain = {INLINE_OPEN}0.5{INLINE_CLOSE};\n{}\n{SECTION_END}\nfloat user;\n",
        markers::binding_line("node-7")
    );
    let stripped = markers::plain_view(&text, MarkerMode::Strip);

    assert_eq!(stripped, "uniform float gain = 0.5;\nfloat user;\n");
}

#[test]
fn test_marker_span_at_detects_interior_positions() {
    let text = format!("code\n{SECTION_END}\nmore");
    let start = text.find(SECTION_END).unwrap();

    assert!(markers::marker_span_at(&text, start).is_none());
    assert!(markers::marker_span_at(&text, start + 1).is_some());
    assert!(markers::marker_span_at(&text, start + SECTION_END.len() - 1).is_some());
    assert!(markers::marker_span_at(&text, start + SECTION_END.len()).is_none());
    assert!(markers::marker_span_at(&text, 2).is_none());
}
