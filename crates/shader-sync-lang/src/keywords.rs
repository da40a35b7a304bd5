//! Static keyword/grammar table for the shading language.
//!
//! This module is pure data: every keyword the recognizers care about, tagged with
//! its category, the pipeline stages it applies to, and the language-version window
//! in which it exists. The table drives declaration recognition (qualifier/type
//! classification) and lets pipeline checks ask questions like "is `buffer` even
//! available at `#version 330`?".

use std::collections::HashMap;
use std::sync::OnceLock;

/// A pipeline stage a keyword (or a document) can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Vertex shader stage.
    Vertex,
    /// Fragment shader stage.
    Fragment,
    /// Geometry shader stage.
    Geometry,
    /// Tessellation control stage.
    TessControl,
    /// Tessellation evaluation stage.
    TessEvaluation,
    /// Compute stage.
    Compute,
}

impl Stage {
    const fn bit(self) -> u8 {
        match self {
            Stage::Vertex => 1 << 0,
            Stage::Fragment => 1 << 1,
            Stage::Geometry => 1 << 2,
            Stage::TessControl => 1 << 3,
            Stage::TessEvaluation => 1 << 4,
            Stage::Compute => 1 << 5,
        }
    }
}

/// A set of pipeline stages, used for keyword applicability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageSet(u8);

impl StageSet {
    /// Every stage.
    pub const ALL: StageSet = StageSet(0b11_1111);
    /// Vertex stage only.
    pub const VERTEX: StageSet = StageSet(Stage::Vertex.bit());
    /// Fragment stage only.
    pub const FRAGMENT: StageSet = StageSet(Stage::Fragment.bit());
    /// Compute stage only.
    pub const COMPUTE: StageSet = StageSet(Stage::Compute.bit());
    /// Both tessellation stages.
    pub const TESSELLATION: StageSet =
        StageSet(Stage::TessControl.bit() | Stage::TessEvaluation.bit());

    /// Returns `true` if `stage` is a member of the set.
    pub const fn contains(self, stage: Stage) -> bool {
        self.0 & stage.bit() != 0
    }
}

/// Coarse keyword category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordCategory {
    /// A data-type keyword (`float`, `vec3`, `sampler2D`, ...).
    DataType,
    /// A declaration qualifier (`uniform`, `in`, `flat`, `highp`, ...).
    Qualifier,
    /// The structural keyword introducing a named aggregate (`struct`).
    Structure,
    /// A control-flow or statement-head keyword (`if`, `return`, `precision`, ...).
    ///
    /// These never appear in declarations; the recognizers use them to reject
    /// declaration-shaped text that is really something else.
    Control,
}

/// One entry of the keyword table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordInfo {
    /// The keyword text.
    pub word: &'static str,
    /// Keyword category.
    pub category: KeywordCategory,
    /// Stages the keyword applies to.
    pub stages: StageSet,
    /// First language version (e.g. `110`, `430`) the keyword exists in.
    pub min_version: u16,
    /// Last language version the keyword exists in, if it was ever removed.
    pub max_version: Option<u16>,
}

impl KeywordInfo {
    /// Returns `true` if the keyword exists at `version`.
    pub fn available_in(&self, version: u16) -> bool {
        version >= self.min_version && self.max_version.is_none_or(|max| version <= max)
    }

    /// Returns `true` if the keyword applies to `stage`.
    pub fn applies_to(&self, stage: Stage) -> bool {
        self.stages.contains(stage)
    }
}

const fn ty(word: &'static str, min_version: u16) -> KeywordInfo {
    KeywordInfo {
        word,
        category: KeywordCategory::DataType,
        stages: StageSet::ALL,
        min_version,
        max_version: None,
    }
}

const fn qual(word: &'static str, min_version: u16) -> KeywordInfo {
    KeywordInfo {
        word,
        category: KeywordCategory::Qualifier,
        stages: StageSet::ALL,
        min_version,
        max_version: None,
    }
}

const fn ctrl(word: &'static str) -> KeywordInfo {
    KeywordInfo {
        word,
        category: KeywordCategory::Control,
        stages: StageSet::ALL,
        min_version: 110,
        max_version: None,
    }
}

/// The full keyword table.
pub const KEYWORDS: &[KeywordInfo] = &[
    // Scalar and vector types.
    ty("void", 110),
    ty("float", 110),
    ty("double", 400),
    ty("int", 110),
    ty("uint", 130),
    ty("bool", 110),
    ty("vec2", 110),
    ty("vec3", 110),
    ty("vec4", 110),
    ty("dvec2", 400),
    ty("dvec3", 400),
    ty("dvec4", 400),
    ty("ivec2", 110),
    ty("ivec3", 110),
    ty("ivec4", 110),
    ty("uvec2", 130),
    ty("uvec3", 130),
    ty("uvec4", 130),
    ty("bvec2", 110),
    ty("bvec3", 110),
    ty("bvec4", 110),
    // Matrix types.
    ty("mat2", 110),
    ty("mat3", 110),
    ty("mat4", 110),
    ty("mat2x2", 120),
    ty("mat2x3", 120),
    ty("mat2x4", 120),
    ty("mat3x2", 120),
    ty("mat3x3", 120),
    ty("mat3x4", 120),
    ty("mat4x2", 120),
    ty("mat4x3", 120),
    ty("mat4x4", 120),
    // Opaque sampler/image types.
    ty("sampler1D", 110),
    ty("sampler2D", 110),
    ty("sampler3D", 110),
    ty("samplerCube", 110),
    ty("sampler1DArray", 130),
    ty("sampler2DArray", 130),
    ty("samplerCubeArray", 400),
    ty("sampler1DShadow", 110),
    ty("sampler2DShadow", 110),
    ty("sampler2DMS", 150),
    ty("isampler2D", 130),
    ty("isampler3D", 130),
    ty("usampler2D", 130),
    ty("usampler3D", 130),
    ty("image1D", 420),
    ty("image2D", 420),
    ty("image3D", 420),
    ty("imageCube", 420),
    ty("atomic_uint", 420),
    // Storage and interpolation qualifiers.
    qual("const", 110),
    qual("uniform", 110),
    qual("buffer", 430),
    KeywordInfo {
        word: "shared",
        category: KeywordCategory::Qualifier,
        stages: StageSet::COMPUTE,
        min_version: 430,
        max_version: None,
    },
    qual("in", 130),
    qual("out", 130),
    qual("inout", 110),
    KeywordInfo {
        word: "attribute",
        category: KeywordCategory::Qualifier,
        stages: StageSet::VERTEX,
        min_version: 110,
        max_version: Some(120),
    },
    KeywordInfo {
        word: "varying",
        category: KeywordCategory::Qualifier,
        stages: StageSet::ALL,
        min_version: 110,
        max_version: Some(120),
    },
    qual("centroid", 120),
    qual("flat", 130),
    qual("smooth", 130),
    qual("noperspective", 130),
    KeywordInfo {
        word: "patch",
        category: KeywordCategory::Qualifier,
        stages: StageSet::TESSELLATION,
        min_version: 400,
        max_version: None,
    },
    qual("sample", 400),
    qual("layout", 140),
    qual("invariant", 120),
    qual("precise", 400),
    // Memory qualifiers.
    qual("coherent", 420),
    qual("volatile", 420),
    qual("restrict", 420),
    qual("readonly", 420),
    qual("writeonly", 420),
    // Precision qualifiers.
    qual("highp", 130),
    qual("mediump", 130),
    qual("lowp", 130),
    // Structural keyword.
    KeywordInfo {
        word: "struct",
        category: KeywordCategory::Structure,
        stages: StageSet::ALL,
        min_version: 110,
        max_version: None,
    },
    // Statement-head and control-flow keywords, listed so recognizers can
    // reject them as declaration heads or names.
    ctrl("precision"),
    ctrl("if"),
    ctrl("else"),
    ctrl("for"),
    ctrl("while"),
    ctrl("do"),
    ctrl("switch"),
    ctrl("case"),
    ctrl("default"),
    ctrl("break"),
    ctrl("continue"),
    ctrl("return"),
    KeywordInfo {
        word: "discard",
        category: KeywordCategory::Control,
        stages: StageSet::FRAGMENT,
        min_version: 110,
        max_version: None,
    },
];

/// The storage qualifiers that are mutually exclusive on a single declaration.
pub const EXCLUSIVE_STORAGE_QUALIFIERS: &[&str] = &["in", "out", "uniform", "buffer", "shared"];

fn index() -> &'static HashMap<&'static str, &'static KeywordInfo> {
    static INDEX: OnceLock<HashMap<&'static str, &'static KeywordInfo>> = OnceLock::new();
    INDEX.get_or_init(|| KEYWORDS.iter().map(|info| (info.word, info)).collect())
}

/// Look up a keyword by exact text.
pub fn lookup(word: &str) -> Option<&'static KeywordInfo> {
    index().get(word).copied()
}

/// Returns `true` if `word` is a data-type keyword.
pub fn is_data_type(word: &str) -> bool {
    lookup(word).is_some_and(|info| info.category == KeywordCategory::DataType)
}

/// Returns `true` if `word` is a qualifier keyword.
pub fn is_qualifier(word: &str) -> bool {
    lookup(word).is_some_and(|info| info.category == KeywordCategory::Qualifier)
}

/// Returns `true` if `word` names an opaque sampler type.
pub fn is_sampler_type(word: &str) -> bool {
    is_data_type(word) && word.contains("sampler")
}

/// The minimum language version required for `word`, if it is a known keyword.
pub fn minimum_version(word: &str) -> Option<u16> {
    lookup(word).map(|info| info.min_version)
}
