use shader_sync::{
    Connection, ConnectionKind, Diagnostic, FixAction, QuickFix, ShaderBlock, ShaderDocument,
    ShaderStage, SyncAdapter, TextRange, VertexAttribute, markers,
};

fn diagnostics_of(adapter: &SyncAdapter) -> Vec<Diagnostic> {
    adapter.document().diagnostics().iter().cloned().collect()
}

#[test]
fn test_vertex_layout_type_mismatch_names_both_types() {
    let mut element = ShaderBlock::new("vs-1", ShaderStage::Vertex, 330);
    element.vertex_layout.push(VertexAttribute {
        name: "pos".to_string(),
        type_name: "vec4".to_string(),
        location: 0,
    });

    let mut adapter = SyncAdapter::new("#version 330\nin vec3 pos;\n");
    adapter.attach(&element);

    let diagnostics = diagnostics_of(&adapter);
    assert!(
        diagnostics
            .iter()
            .any(|d| d.message == "declared type 'vec3' does not match expected 'vec4'"),
        "missing type-mismatch diagnostic in {:?}",
        diagnostics.iter().map(|d| &d.message).collect::<Vec<_>>()
    );
}

#[test]
fn test_vertex_check_only_registered_for_vertex_stage() {
    let mut element = ShaderBlock::new("fs-1", ShaderStage::Fragment, 330);
    element.vertex_layout.push(VertexAttribute {
        name: "pos".to_string(),
        type_name: "vec4".to_string(),
        location: 0,
    });

    // Same layout data, fragment stage: the layout check is absent, so the
    // mismatched declaration is never inspected.
    let mut adapter = SyncAdapter::new("#version 330\nin vec3 pos;\n");
    let report = adapter.attach(&element);
    assert_eq!(report.diagnostic_count, 0);
}

#[test]
fn test_version_too_low_for_storage_buffer() {
    let mut element = ShaderBlock::new("fx-1", ShaderStage::Compute, 330);
    element
        .connections
        .push(Connection::new("c-p", "particles", ConnectionKind::StorageBlock));

    let mut adapter = SyncAdapter::new("");
    adapter.attach(&element);

    let diagnostics = diagnostics_of(&adapter);
    assert!(
        diagnostics
            .iter()
            .any(|d| d.message == "version 330 is too low for connection 'particles' (requires 430)")
    );
}

#[test]
fn test_buffer_body_is_cached_and_wrapped_in_markers() {
    let mut element = ShaderBlock::new("fx-1", ShaderStage::Compute, 430);
    let mut connection = Connection::new("c-p", "Particles", ConnectionKind::StorageBlock);
    connection.binding = Some(2);
    element.connections.push(connection);

    let source = "#version 430\nlayout(std430, binding = 2) buffer Particles\n{\n    vec4 data[];\n}\n;\n";
    let mut adapter = SyncAdapter::new(source);
    let report = adapter.attach(&element);

    assert_eq!(report.diagnostic_count, 0);
    let text = adapter.document().text();
    assert!(text.contains(markers::BLOCK_OPEN));
    assert!(text.contains("    vec4 data[];"));

    let cached = adapter
        .document()
        .binding("c-p")
        .and_then(|binding| binding.block_body.clone())
        .expect("block body cached under the connection id");
    assert!(cached.contains("vec4 data[];"));

    // The body survives another cycle unchanged.
    adapter.synchronize(Some(&element));
    assert!(adapter.document().text().contains("    vec4 data[];"));
}

#[test]
fn test_uniform_block_uses_std140() {
    let mut element = ShaderBlock::new("mat-1", ShaderStage::Fragment, 330);
    let mut connection = Connection::new("c-m", "Matrices", ConnectionKind::UniformBlock);
    connection.binding = Some(0);
    element.connections.push(connection);

    let mut adapter = SyncAdapter::new("");
    adapter.attach(&element);

    assert!(
        adapter
            .document()
            .text()
            .contains("layout(std140, binding = 0) uniform Matrices")
    );
}

#[test]
fn test_redefinition_is_flagged_with_delete_fix() {
    let mut element = ShaderBlock::new("mat-1", ShaderStage::Fragment, 330);
    element
        .connections
        .push(Connection::new("c-x", "x", ConnectionKind::Float));

    let mut adapter = SyncAdapter::new("#version 330\nuniform float x;\nuniform float x;\n");
    adapter.attach(&element);

    let diagnostics = diagnostics_of(&adapter);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].message, "redefinition of 'x'");
    assert!(matches!(
        diagnostics[0].fixes[0].action,
        FixAction::DeleteText { .. }
    ));
}

#[test]
fn test_binding_mismatch_is_reported() {
    let mut element = ShaderBlock::new("mat-1", ShaderStage::Fragment, 330);
    let mut connection = Connection::new("c-t", "albedo", ConnectionKind::Texture2D);
    connection.binding = Some(1);
    element.connections.push(connection);

    let mut adapter =
        SyncAdapter::new("#version 330\nlayout(binding = 3) uniform sampler2D albedo;\n");
    adapter.attach(&element);

    let diagnostics = diagnostics_of(&adapter);
    assert!(
        diagnostics
            .iter()
            .any(|d| d.message == "binding 3 does not match expected 1")
    );
}

#[test]
fn test_unrequired_extension_offers_require_and_delete() {
    let mut element = ShaderBlock::new("mat-1", ShaderStage::Fragment, 330);
    element
        .connections
        .push(Connection::new("c-x", "x", ConnectionKind::Float));

    let mut adapter = SyncAdapter::new(
        "#version 330\n#extension GL_ARB_gpu_shader5 : enable\nuniform float x;\n",
    );
    adapter.attach(&element);

    let diagnostics = diagnostics_of(&adapter);
    let diagnostic = diagnostics
        .iter()
        .find(|d| d.message.contains("GL_ARB_gpu_shader5"))
        .expect("extension diagnostic");
    assert_eq!(diagnostic.fixes.len(), 2);
    assert!(matches!(
        diagnostic.fixes[0].action,
        FixAction::RequireExtension { .. }
    ));

    // Applying the primary fix and resynchronizing resolves the diagnostic.
    let fix = diagnostic.primary().expect("primary fix").clone();
    let mut element = element.clone();
    adapter.apply_fix(&fix, &mut element).expect("fix applies");
    assert_eq!(element.extensions.len(), 1);

    let report = adapter.synchronize(Some(&element));
    assert_eq!(report.diagnostic_count, 0);
    assert!(
        adapter
            .document()
            .text()
            .contains("#extension GL_ARB_gpu_shader5 : enable")
    );
}

#[test]
fn test_fix_command_round_trip() {
    let mut document = ShaderDocument::new("uniform float stale;\nfloat keep;\n");
    let mut element = ShaderBlock::new("mat-1", ShaderStage::Fragment, 330);

    let fix = QuickFix::new(
        "delete declaration 'stale'",
        FixAction::DeleteText {
            range: TextRange::new(0, 21),
        },
    );
    let command = fix.to_command(&document, &element).expect("invertible");
    assert_eq!(
        command.undo,
        FixAction::InsertText {
            offset: 0,
            text: "uniform float stale;\n".to_string(),
        }
    );

    command.apply(&mut document, &mut element).expect("applies");
    assert_eq!(document.text(), "float keep;\n");

    command.revert(&mut document, &mut element).expect("reverts");
    assert_eq!(document.text(), "uniform float stale;\nfloat keep;\n");
}

#[test]
fn test_create_connection_fix_round_trip() {
    let mut document = ShaderDocument::new("");
    let mut element = ShaderBlock::new("mat-1", ShaderStage::Fragment, 330);

    let fix = QuickFix::new(
        "create connection 'fog'",
        FixAction::CreateConnection {
            name: "fog".to_string(),
            kind: ConnectionKind::Float,
            location: None,
            binding: None,
        },
    );
    let command = fix.to_command(&document, &element).expect("invertible");

    command.apply(&mut document, &mut element).expect("applies");
    assert!(element.connection("fog").is_some());

    command.revert(&mut document, &mut element).expect("reverts");
    assert!(element.connection("fog").is_none());
}
