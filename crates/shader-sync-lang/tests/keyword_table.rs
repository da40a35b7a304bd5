use shader_sync_lang::Stage;
use shader_sync_lang::keywords::{self, KeywordCategory};

#[test]
fn test_lookup_and_categories() {
    assert_eq!(
        keywords::lookup("vec3").map(|k| k.category),
        Some(KeywordCategory::DataType)
    );
    assert_eq!(
        keywords::lookup("uniform").map(|k| k.category),
        Some(KeywordCategory::Qualifier)
    );
    assert_eq!(
        keywords::lookup("struct").map(|k| k.category),
        Some(KeywordCategory::Structure)
    );
    assert_eq!(
        keywords::lookup("return").map(|k| k.category),
        Some(KeywordCategory::Control)
    );
    assert_eq!(keywords::lookup("not_a_keyword"), None);
}

#[test]
fn test_version_windows() {
    let buffer = keywords::lookup("buffer").expect("buffer is a keyword");
    assert!(!buffer.available_in(330));
    assert!(buffer.available_in(430));

    let attribute = keywords::lookup("attribute").expect("attribute is a keyword");
    assert!(attribute.available_in(110));
    assert!(!attribute.available_in(130));

    assert_eq!(keywords::minimum_version("buffer"), Some(430));
    assert_eq!(keywords::minimum_version("float"), Some(110));
}

#[test]
fn test_stage_applicability() {
    let discard = keywords::lookup("discard").expect("discard is a keyword");
    assert!(discard.applies_to(Stage::Fragment));
    assert!(!discard.applies_to(Stage::Vertex));

    let patch = keywords::lookup("patch").expect("patch is a keyword");
    assert!(patch.applies_to(Stage::TessControl));
    assert!(patch.applies_to(Stage::TessEvaluation));
    assert!(!patch.applies_to(Stage::Compute));

    let uniform = keywords::lookup("uniform").expect("uniform is a keyword");
    assert!(uniform.applies_to(Stage::Vertex));
    assert!(uniform.applies_to(Stage::Compute));
}

#[test]
fn test_classification_helpers() {
    assert!(keywords::is_data_type("mat4"));
    assert!(!keywords::is_data_type("uniform"));
    assert!(keywords::is_qualifier("flat"));
    assert!(!keywords::is_qualifier("vec2"));
    assert!(keywords::is_sampler_type("sampler2D"));
    assert!(keywords::is_sampler_type("isampler3D"));
    assert!(!keywords::is_sampler_type("float"));
}
