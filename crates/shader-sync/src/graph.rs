//! Pipeline-element data model.
//!
//! This is the engine's view of the host's dataflow graph: plain,
//! serializable data the host keeps in sync with its own node/connection
//! store. The engine only reads these values; mutations flow back to the host
//! exclusively through quick fixes, never as direct writes from a check.

use serde::{Deserialize, Serialize};
use shader_sync_lang::Stage;

/// The pipeline stage a shader document targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShaderStage {
    /// Vertex stage.
    Vertex,
    /// Fragment stage.
    Fragment,
    /// Geometry stage.
    Geometry,
    /// Tessellation control stage.
    TessControl,
    /// Tessellation evaluation stage.
    TessEvaluation,
    /// Compute stage.
    Compute,
}

impl ShaderStage {
    /// The language-table stage this pipeline stage corresponds to.
    pub fn language_stage(self) -> Stage {
        match self {
            ShaderStage::Vertex => Stage::Vertex,
            ShaderStage::Fragment => Stage::Fragment,
            ShaderStage::Geometry => Stage::Geometry,
            ShaderStage::TessControl => Stage::TessControl,
            ShaderStage::TessEvaluation => Stage::TessEvaluation,
            ShaderStage::Compute => Stage::Compute,
        }
    }
}

/// The typed payload a connection carries into the shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionKind {
    /// A scalar float.
    Float,
    /// A signed integer.
    Int,
    /// An unsigned integer.
    UInt,
    /// A boolean.
    Bool,
    /// A 2-component float vector.
    Vec2,
    /// A 3-component float vector.
    Vec3,
    /// A 4-component float vector.
    Vec4,
    /// A 2-component integer vector.
    IVec2,
    /// A 3-component integer vector.
    IVec3,
    /// A 4-component integer vector.
    IVec4,
    /// A 2x2 float matrix.
    Mat2,
    /// A 3x3 float matrix.
    Mat3,
    /// A 4x4 float matrix.
    Mat4,
    /// A 2D texture.
    Texture2D,
    /// A 3D texture.
    Texture3D,
    /// A cube texture.
    TextureCube,
    /// A 2D texture array.
    Texture2DArray,
    /// A shader-storage block.
    StorageBlock,
    /// A uniform block.
    UniformBlock,
}

impl ConnectionKind {
    /// The shading-language type spelling, or `None` for block kinds.
    pub fn glsl_type(self) -> Option<&'static str> {
        match self {
            ConnectionKind::Float => Some("float"),
            ConnectionKind::Int => Some("int"),
            ConnectionKind::UInt => Some("uint"),
            ConnectionKind::Bool => Some("bool"),
            ConnectionKind::Vec2 => Some("vec2"),
            ConnectionKind::Vec3 => Some("vec3"),
            ConnectionKind::Vec4 => Some("vec4"),
            ConnectionKind::IVec2 => Some("ivec2"),
            ConnectionKind::IVec3 => Some("ivec3"),
            ConnectionKind::IVec4 => Some("ivec4"),
            ConnectionKind::Mat2 => Some("mat2"),
            ConnectionKind::Mat3 => Some("mat3"),
            ConnectionKind::Mat4 => Some("mat4"),
            ConnectionKind::Texture2D => Some("sampler2D"),
            ConnectionKind::Texture3D => Some("sampler3D"),
            ConnectionKind::TextureCube => Some("samplerCube"),
            ConnectionKind::Texture2DArray => Some("sampler2DArray"),
            ConnectionKind::StorageBlock | ConnectionKind::UniformBlock => None,
        }
    }

    /// The inverse of [`ConnectionKind::glsl_type`] for non-block kinds.
    pub fn from_glsl_type(type_name: &str) -> Option<Self> {
        match type_name {
            "float" => Some(ConnectionKind::Float),
            "int" => Some(ConnectionKind::Int),
            "uint" => Some(ConnectionKind::UInt),
            "bool" => Some(ConnectionKind::Bool),
            "vec2" => Some(ConnectionKind::Vec2),
            "vec3" => Some(ConnectionKind::Vec3),
            "vec4" => Some(ConnectionKind::Vec4),
            "ivec2" => Some(ConnectionKind::IVec2),
            "ivec3" => Some(ConnectionKind::IVec3),
            "ivec4" => Some(ConnectionKind::IVec4),
            "mat2" => Some(ConnectionKind::Mat2),
            "mat3" => Some(ConnectionKind::Mat3),
            "mat4" => Some(ConnectionKind::Mat4),
            "sampler2D" => Some(ConnectionKind::Texture2D),
            "sampler3D" => Some(ConnectionKind::Texture3D),
            "samplerCube" => Some(ConnectionKind::TextureCube),
            "sampler2DArray" => Some(ConnectionKind::Texture2DArray),
            _ => None,
        }
    }

    /// Returns `true` for texture kinds.
    pub fn is_texture(self) -> bool {
        matches!(
            self,
            ConnectionKind::Texture2D
                | ConnectionKind::Texture3D
                | ConnectionKind::TextureCube
                | ConnectionKind::Texture2DArray
        )
    }

    /// Returns `true` for interface-block kinds.
    pub fn is_block(self) -> bool {
        matches!(
            self,
            ConnectionKind::StorageBlock | ConnectionKind::UniformBlock
        )
    }

    /// The minimum language version this kind can be declared in.
    pub fn minimum_version(self) -> u16 {
        match self {
            ConnectionKind::StorageBlock => 430,
            ConnectionKind::UniformBlock => 140,
            ConnectionKind::UInt
            | ConnectionKind::IVec2
            | ConnectionKind::IVec3
            | ConnectionKind::IVec4 => 130,
            ConnectionKind::Texture2DArray => 130,
            _ => 110,
        }
    }
}

/// One typed connection on a pipeline element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Stable host-side identity.
    pub id: String,
    /// The shader-visible name.
    pub name: String,
    /// Payload kind.
    pub kind: ConnectionKind,
    /// Explicit location, if the host assigned one.
    pub location: Option<u32>,
    /// Explicit binding point, if the host assigned one.
    pub binding: Option<u32>,
    /// Default value emitted as an editable initializer, if any.
    pub default_value: Option<String>,
}

impl Connection {
    /// Create a connection with no explicit location/binding/default.
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: ConnectionKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            location: None,
            binding: None,
            default_value: None,
        }
    }
}

/// One entry of a vertex-stage input layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexAttribute {
    /// The shader-visible name.
    pub name: String,
    /// Expected attribute type spelling (e.g. `vec3`).
    pub type_name: String,
    /// Attribute location.
    pub location: u32,
}

/// An extension the pipeline element requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionRequirement {
    /// Extension name.
    pub name: String,
    /// Behavior word (`enable`, `require`, ...).
    pub behavior: String,
}

/// The pipeline element a shader document can be attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShaderBlock {
    /// Stable host-side identity, recorded in the document's binding line.
    pub id: String,
    /// Stage this document targets.
    pub stage: ShaderStage,
    /// Required language version.
    pub version: u16,
    /// Required profile word, if any (e.g. `core`).
    pub profile: Option<String>,
    /// Required extensions.
    pub extensions: Vec<ExtensionRequirement>,
    /// Typed connections that must be declared in code.
    pub connections: Vec<Connection>,
    /// Vertex input layout; only meaningful for [`ShaderStage::Vertex`].
    pub vertex_layout: Vec<VertexAttribute>,
}

impl ShaderBlock {
    /// Create an element with no connections.
    pub fn new(id: impl Into<String>, stage: ShaderStage, version: u16) -> Self {
        Self {
            id: id.into(),
            stage,
            version,
            profile: None,
            extensions: Vec::new(),
            connections: Vec::new(),
            vertex_layout: Vec::new(),
        }
    }

    /// Find a connection by shader-visible name.
    pub fn connection(&self, name: &str) -> Option<&Connection> {
        self.connections.iter().find(|c| c.name == name)
    }
}
