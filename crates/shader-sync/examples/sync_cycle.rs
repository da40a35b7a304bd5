use shader_sync::{
    Connection, ConnectionKind, ProposedEdit, ShaderBlock, ShaderStage, SyncAdapter,
};

fn main() {
    // The pipeline element a host graph would provide.
    let mut element = ShaderBlock::new("blur-pass", ShaderStage::Fragment, 330);
    element.profile = Some("core".to_string());
    element
        .connections
        .push(Connection::new("c0", "radius", ConnectionKind::Float));
    element
        .connections
        .push(Connection::new("c1", "source", ConnectionKind::Texture2D));

    // Attach a document that only has user code so far.
    let mut adapter = SyncAdapter::new("void main() {\n}\n");
    let report = adapter.attach(&element);
    println!(
        "cycle {} finished with {} diagnostics",
        report.cycle, report.diagnostic_count
    );
    println!("--- document ---\n{}", adapter.document().text());

    // The generated region rejects stray edits...
    let decision = adapter.review_edit(&ProposedEdit::insertion(0, "x"));
    assert!(!decision.is_allowed());

    // ...while the user region stays free-form.
    let boundary = adapter
        .document()
        .section_boundary()
        .expect("attached documents have a generated region");
    let decision = adapter.review_edit(&ProposedEdit::insertion(boundary, "float helper;\n"));
    assert!(decision.is_allowed());

    // Detaching strips the region bookkeeping but keeps the declarations.
    adapter.detach();
    assert!(adapter.document().text().contains("uniform float radius;"));
    println!("--- detached ---\n{}", adapter.document().text());
}
