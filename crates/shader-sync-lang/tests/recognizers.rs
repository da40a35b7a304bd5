use shader_sync_lang::{
    Declaration, ParseOptions, RecognizerSet, StatementKind, SyntaxTree, parse,
};

fn recognize(text: &str) -> Option<StatementKind> {
    RecognizerSet::new().recognize(text)
}

fn declaration(text: &str) -> Declaration {
    match recognize(text) {
        Some(StatementKind::Declaration(decl)) => decl,
        other => panic!("expected a declaration for {text:?}, got {other:?}"),
    }
}

fn tree_of(text: &str) -> SyntaxTree {
    let recognizers = RecognizerSet::new();
    parse(text, &recognizers, ParseOptions::default())
}

#[test]
fn test_version_directive() {
    let Some(StatementKind::Version(v)) = recognize("#version 330 core") else {
        panic!("expected a version directive");
    };
    assert_eq!(v.number, 330);
    assert_eq!(v.profile.as_deref(), Some("core"));

    let Some(StatementKind::Version(v)) = recognize("# version 460") else {
        panic!("expected a version directive");
    };
    assert_eq!(v.number, 460);
    assert_eq!(v.profile, None);

    // A malformed version number degrades to a generic statement.
    assert_eq!(recognize("#version abc"), None);
}

#[test]
fn test_extension_directive() {
    let Some(StatementKind::Extension(e)) =
        recognize("#extension GL_ARB_compute_shader : enable")
    else {
        panic!("expected an extension directive");
    };
    assert_eq!(e.name, "GL_ARB_compute_shader");
    assert_eq!(e.behavior, "enable");

    assert_eq!(recognize("#extension missing_behavior"), None);
}

#[test]
fn test_plain_declaration() {
    let decl = declaration("uniform float brightness");
    assert_eq!(decl.qualifiers, vec!["uniform".to_string()]);
    assert_eq!(decl.type_name, "float");
    assert_eq!(decl.name, "brightness");
    assert!(!decl.is_method);
    assert!(!decl.is_array());
    assert!(!decl.is_structural());
}

#[test]
fn test_layout_parameters() {
    let decl = declaration("layout(location = 2, std140) in vec3 normal");
    let layout = decl.layout.as_ref().expect("layout present");
    assert_eq!(layout.get("location"), Some(Some("2")));
    assert_eq!(layout.get_u32("location"), Some(2));
    assert_eq!(layout.get("std140"), Some(None));
    assert_eq!(layout.get("missing"), None);
    assert_eq!(decl.qualifiers, vec!["in".to_string()]);
}

#[test]
fn test_array_suffix_on_either_side() {
    assert_eq!(declaration("float values[4]").array_suffix, "[4]");
    assert_eq!(declaration("float[4] values").array_suffix, "[4]");
    assert_eq!(declaration("vec4 data[]").array_suffix, "[]");
}

#[test]
fn test_method_flag() {
    assert!(declaration("vec4 shade(vec3 n)").is_method);
    assert!(declaration("void main()").is_method);
    assert!(!declaration("float gain = 0.5").is_method);
}

#[test]
fn test_structural_forms() {
    let decl = declaration("struct Light");
    assert!(decl.is_structural());
    assert_eq!(decl.qualifiers, vec!["struct".to_string()]);
    assert_eq!(decl.name, "Light");

    let decl = declaration("uniform Matrices");
    assert!(decl.is_structural());
    assert_eq!(decl.qualifiers, vec!["uniform".to_string()]);

    // A bare identifier is the instance-declaration form.
    let decl = declaration("lightRig");
    assert!(decl.is_structural());
    assert!(decl.qualifiers.is_empty());
    assert_eq!(decl.name, "lightRig");
}

#[test]
fn test_non_declarations_are_rejected() {
    assert_eq!(recognize("return x"), None);
    assert_eq!(recognize("shade(x)"), None);
    assert_eq!(recognize("x = 5"), None);
    assert_eq!(recognize("if (x > 0)"), None);
    assert_eq!(recognize("UserType value"), None);
    assert_eq!(recognize(""), None);
}

#[test]
fn test_conflicting_storage_qualifiers_get_one_diagnostic() {
    let tree = tree_of("uniform buffer float wrong;\n");

    let (_, stmt) = tree.statements().next().expect("one statement");
    assert!(matches!(stmt.kind, StatementKind::Declaration(_)));
    assert_eq!(stmt.diagnostics.len(), 1);
    assert!(stmt.diagnostics[0].message.contains("conflicting storage qualifiers"));
}

#[test]
fn test_storage_qualifier_in_nested_scope_is_flagged() {
    let tree = tree_of("void main() {\n    uniform float bad;\n}\n");

    let (_, stmt) = tree
        .statements()
        .find(|(_, s)| s.declaration().is_some_and(|d| d.name == "bad"))
        .expect("nested declaration");
    assert_eq!(stmt.diagnostics.len(), 1);
    assert!(stmt.diagnostics[0].message.contains("global scope"));
}

#[test]
fn test_recognizers_are_tried_in_order() {
    // Directive shapes win before the declaration fallback ever runs.
    assert!(matches!(
        recognize("#version 330"),
        Some(StatementKind::Version(_))
    ));
    assert!(matches!(
        recognize("#extension GL_OES_standard_derivatives : warn"),
        Some(StatementKind::Extension(_))
    ));
    assert!(matches!(
        recognize("uniform vec4 tint"),
        Some(StatementKind::Declaration(_))
    ));
}
