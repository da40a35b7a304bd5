use shader_sync::{
    Connection, ConnectionKind, FixAction, ShaderBlock, ShaderStage, SyncAdapter, markers,
};

fn fragment_element(connection_name: &str) -> ShaderBlock {
    let mut element = ShaderBlock::new("mat-1", ShaderStage::Fragment, 330);
    element.profile = Some("core".to_string());
    element.connections.push(Connection::new(
        format!("c-{connection_name}"),
        connection_name,
        ConnectionKind::Float,
    ));
    element
}

#[test]
fn test_clean_match_produces_no_diagnostics() {
    let element = fragment_element("x");
    let mut adapter = SyncAdapter::new("#version 330 core\nuniform float x;\n");

    let report = adapter.attach(&element);

    assert_eq!(report.diagnostic_count, 0);
    assert!(report.generated_region.start == 0 && !report.generated_region.is_empty());

    let text = adapter.document().text();
    assert!(text.contains("#version 330 core"));
    assert!(text.contains("uniform float x;"));
    assert!(text.contains(&markers::binding_line("mat-1")));
    assert!(text.contains(markers::SECTION_END));
    // The matched declaration was moved into the generated region, not duplicated.
    assert_eq!(text.matches("uniform float x;").count(), 1);
}

#[test]
fn test_missing_element_is_regenerated_and_orphan_flagged() {
    let element = fragment_element("y");
    let mut adapter = SyncAdapter::new("#version 330 core\nuniform float x;\n");

    let report = adapter.attach(&element);

    let text = adapter.document().text();
    assert!(text.contains("uniform float y;"));
    assert!(text.contains("uniform float x;"));

    assert_eq!(report.diagnostic_count, 1);
    let diagnostic = adapter
        .document()
        .diagnostics()
        .iter()
        .next()
        .expect("one diagnostic");
    assert_eq!(diagnostic.message, "'x' has no matching pipeline element");
    assert_eq!(diagnostic.fixes.len(), 2);
    assert_eq!(diagnostic.fixes[0].label, "create connection 'x'");
    assert!(matches!(
        diagnostic.fixes[1].action,
        FixAction::DeleteText { .. }
    ));
    assert!(diagnostic.primary().is_some());
}

#[test]
fn test_cycle_is_idempotent() {
    let element = fragment_element("x");
    let mut adapter = SyncAdapter::new("#version 330 core\nuniform float x;\n");
    adapter.attach(&element);

    let first = adapter.document().text();
    let report = adapter.synchronize(Some(&element));
    let second = adapter.document().text();

    assert_eq!(first, second);
    assert_eq!(report.diagnostic_count, 0);
}

#[test]
fn test_matching_ignores_declaration_order() {
    let mut element = ShaderBlock::new("mat-1", ShaderStage::Fragment, 330);
    element
        .connections
        .push(Connection::new("c-a", "ambient", ConnectionKind::Float));
    element
        .connections
        .push(Connection::new("c-b", "basis", ConnectionKind::Vec2));

    let mut forward = SyncAdapter::new("#version 330\nuniform float ambient;\nuniform vec2 basis;\n");
    let report_forward = forward.attach(&element);

    let mut reversed = SyncAdapter::new("#version 330\nuniform vec2 basis;\nuniform float ambient;\n");
    let report_reversed = reversed.attach(&element);

    assert_eq!(report_forward.diagnostic_count, 0);
    assert_eq!(report_reversed.diagnostic_count, 0);
    assert_eq!(forward.document().text(), reversed.document().text());
}

#[test]
fn test_round_trip_from_empty_document() {
    let mut element = fragment_element("exposure");
    element
        .connections
        .push(Connection::new("c-t", "source", ConnectionKind::Texture2D));

    let mut synced = SyncAdapter::new("");
    synced.attach(&element);
    let stripped = synced.document().plain_view(shader_sync::MarkerMode::Strip);

    let mut fresh = SyncAdapter::new("");
    let report = fresh.attach(&element);

    assert_eq!(report.diagnostic_count, 0);
    for line in ["uniform float exposure;", "uniform sampler2D source;"] {
        assert!(stripped.contains(line), "stripped view misses {line:?}");
        assert!(
            fresh.document().text().contains(line),
            "fresh document misses {line:?}"
        );
    }
}

#[test]
fn test_unattached_synchronize_is_passthrough() {
    let mut adapter = SyncAdapter::new("float anything;\n");
    let report = adapter.synchronize(None);

    assert!(report.generated_region.is_empty());
    assert_eq!(adapter.document().text(), "float anything;\n");
    assert!(!adapter.is_attached());
}

#[test]
#[should_panic(expected = "inconsistent with the attach state")]
fn test_unattached_synchronize_against_element_panics() {
    let element = fragment_element("x");
    let mut adapter = SyncAdapter::new("");
    adapter.synchronize(Some(&element));
}

#[test]
#[should_panic(expected = "inconsistent with the attach state")]
fn test_synchronize_against_wrong_element_panics() {
    let element = fragment_element("x");
    let mut adapter = SyncAdapter::new("");
    adapter.attach(&element);

    let mut other = fragment_element("x");
    other.id = "mat-2".to_string();
    adapter.synchronize(Some(&other));
}

#[test]
#[should_panic(expected = "already attached")]
fn test_double_attach_panics() {
    let element = fragment_element("x");
    let mut adapter = SyncAdapter::new("");
    adapter.attach(&element);
    adapter.attach(&element);
}

#[test]
fn test_detach_strips_markers_but_keeps_declarations() {
    let element = fragment_element("x");
    let mut adapter = SyncAdapter::new("#version 330 core\nuniform float x;\nvoid main() {\n}\n");
    adapter.attach(&element);
    adapter.detach();

    assert!(!adapter.is_attached());
    let text = adapter.document().text();
    assert!(!text.contains("//["));
    assert!(!text.contains("/*[*/"));
    assert!(text.contains("uniform float x;"));
    assert!(text.contains("void main()"));
}

#[test]
fn test_reattach_after_detach_reclaims_declarations() {
    let element = fragment_element("x");
    let mut adapter = SyncAdapter::new("#version 330 core\nuniform float x;\n");
    adapter.attach(&element);
    adapter.detach();

    let report = adapter.attach(&element);
    assert_eq!(report.diagnostic_count, 0);
    assert_eq!(
        adapter.document().text().matches("uniform float x;").count(),
        1
    );
}

#[test]
fn test_default_value_is_editable_and_survives_resync() {
    let mut element = ShaderBlock::new("mat-1", ShaderStage::Fragment, 330);
    let mut connection = Connection::new("c-g", "gain", ConnectionKind::Float);
    connection.default_value = Some("0.5".to_string());
    element.connections.push(connection);

    let mut adapter = SyncAdapter::new("");
    adapter.attach(&element);

    let text = adapter.document().text();
    assert!(text.contains("uniform float gain = /*[*/0.5/*]*/;"));

    // Edit the value through the editable span, then resynchronize.
    let span = adapter.document().markers().spans[0];
    let edit = shader_sync::ProposedEdit::replacement(span.inner, "0.75");
    assert!(adapter.try_edit(&edit).is_allowed());

    let report = adapter.synchronize(Some(&element));
    assert_eq!(report.diagnostic_count, 0);
    let text = adapter.document().text();
    assert!(text.contains("uniform float gain = /*[*/0.75/*]*/;"));
}
