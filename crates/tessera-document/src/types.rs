//! Enumerated glTF fields.
//!
//! Each enum accepts exactly the reserved codes of glTF 2.0. Anything else
//! fails decoding with an [`UnknownValue`] naming the offending value.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::UnknownValue;

/// Numeric type of a single accessor component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "u32")]
pub enum ComponentType {
    Byte,
    UnsignedByte,
    Short,
    UnsignedShort,
    UnsignedInt,
    Float,
}

impl ComponentType {
    /// Byte width of one component.
    pub fn size(self) -> usize {
        match self {
            Self::Byte | Self::UnsignedByte => 1,
            Self::Short | Self::UnsignedShort => 2,
            Self::UnsignedInt | Self::Float => 4,
        }
    }

    /// The GL enumerant.
    pub fn code(self) -> u32 {
        match self {
            Self::Byte => 5120,
            Self::UnsignedByte => 5121,
            Self::Short => 5122,
            Self::UnsignedShort => 5123,
            Self::UnsignedInt => 5125,
            Self::Float => 5126,
        }
    }
}

impl TryFrom<u32> for ComponentType {
    type Error = UnknownValue;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            5120 => Ok(Self::Byte),
            5121 => Ok(Self::UnsignedByte),
            5122 => Ok(Self::Short),
            5123 => Ok(Self::UnsignedShort),
            5125 => Ok(Self::UnsignedInt),
            5126 => Ok(Self::Float),
            other => Err(UnknownValue::new("componentType", other)),
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Byte => "BYTE",
            Self::UnsignedByte => "UNSIGNED_BYTE",
            Self::Short => "SHORT",
            Self::UnsignedShort => "UNSIGNED_SHORT",
            Self::UnsignedInt => "UNSIGNED_INT",
            Self::Float => "FLOAT",
        };
        f.write_str(name)
    }
}

/// Shape of one accessor element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum AttributeType {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
}

impl AttributeType {
    /// Number of components per element.
    pub fn component_count(self) -> usize {
        match self {
            Self::Scalar => 1,
            Self::Vec2 => 2,
            Self::Vec3 => 3,
            Self::Vec4 | Self::Mat2 => 4,
            Self::Mat3 => 9,
            Self::Mat4 => 16,
        }
    }

    /// The name used in JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scalar => "SCALAR",
            Self::Vec2 => "VEC2",
            Self::Vec3 => "VEC3",
            Self::Vec4 => "VEC4",
            Self::Mat2 => "MAT2",
            Self::Mat3 => "MAT3",
            Self::Mat4 => "MAT4",
        }
    }
}

impl FromStr for AttributeType {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SCALAR" => Ok(Self::Scalar),
            "VEC2" => Ok(Self::Vec2),
            "VEC3" => Ok(Self::Vec3),
            "VEC4" => Ok(Self::Vec4),
            "MAT2" => Ok(Self::Mat2),
            "MAT3" => Ok(Self::Mat3),
            "MAT4" => Ok(Self::Mat4),
            other => Err(UnknownValue::new("accessor type", other)),
        }
    }
}

impl TryFrom<String> for AttributeType {
    type Error = UnknownValue;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Primitive topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "u32")]
pub enum Mode {
    Points,
    Lines,
    LineLoop,
    LineStrip,
    #[default]
    Triangles,
    TriangleStrip,
    TriangleFan,
}

impl TryFrom<u32> for Mode {
    type Error = UnknownValue;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Points),
            1 => Ok(Self::Lines),
            2 => Ok(Self::LineLoop),
            3 => Ok(Self::LineStrip),
            4 => Ok(Self::Triangles),
            5 => Ok(Self::TriangleStrip),
            6 => Ok(Self::TriangleFan),
            other => Err(UnknownValue::new("primitive mode", other)),
        }
    }
}

/// Intended GPU binding of a buffer view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "u32")]
pub enum Target {
    ArrayBuffer,
    ElementArrayBuffer,
}

impl TryFrom<u32> for Target {
    type Error = UnknownValue;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            34962 => Ok(Self::ArrayBuffer),
            34963 => Ok(Self::ElementArrayBuffer),
            other => Err(UnknownValue::new("bufferView target", other)),
        }
    }
}

/// Magnification filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "u32")]
pub enum MagFilter {
    Nearest,
    Linear,
}

impl TryFrom<u32> for MagFilter {
    type Error = UnknownValue;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            9728 => Ok(Self::Nearest),
            9729 => Ok(Self::Linear),
            other => Err(UnknownValue::new("magFilter", other)),
        }
    }
}

/// Minification filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "u32")]
pub enum MinFilter {
    Nearest,
    Linear,
    NearestMipmapNearest,
    LinearMipmapNearest,
    NearestMipmapLinear,
    LinearMipmapLinear,
}

impl TryFrom<u32> for MinFilter {
    type Error = UnknownValue;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            9728 => Ok(Self::Nearest),
            9729 => Ok(Self::Linear),
            9984 => Ok(Self::NearestMipmapNearest),
            9985 => Ok(Self::LinearMipmapNearest),
            9986 => Ok(Self::NearestMipmapLinear),
            9987 => Ok(Self::LinearMipmapLinear),
            other => Err(UnknownValue::new("minFilter", other)),
        }
    }
}

/// Texture coordinate wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "u32")]
pub enum Wrap {
    ClampToEdge,
    MirroredRepeat,
    #[default]
    Repeat,
}

impl TryFrom<u32> for Wrap {
    type Error = UnknownValue;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            33071 => Ok(Self::ClampToEdge),
            33648 => Ok(Self::MirroredRepeat),
            10497 => Ok(Self::Repeat),
            other => Err(UnknownValue::new("wrap mode", other)),
        }
    }
}

/// Material alpha handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum AlphaMode {
    #[default]
    Opaque,
    Mask,
    Blend,
}

impl TryFrom<String> for AlphaMode {
    type Error = UnknownValue;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_str() {
            "OPAQUE" => Ok(Self::Opaque),
            "MASK" => Ok(Self::Mask),
            "BLEND" => Ok(Self::Blend),
            _ => Err(UnknownValue::new("alphaMode", s)),
        }
    }
}

/// Camera projection kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum CameraType {
    Perspective,
    Orthographic,
}

impl TryFrom<String> for CameraType {
    type Error = UnknownValue;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_str() {
            "perspective" => Ok(Self::Perspective),
            "orthographic" => Ok(Self::Orthographic),
            _ => Err(UnknownValue::new("camera type", s)),
        }
    }
}

/// Vertex attribute semantic, the key of a primitive's attribute map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Semantic {
    Positions,
    Normals,
    Tangents,
    TexCoords(u32),
    Colors(u32),
    Joints(u32),
    Weights(u32),
    /// Application-specific attribute; the name keeps its leading underscore.
    Extras(String),
}

impl Semantic {
    /// The name used in JSON.
    pub fn name(&self) -> String {
        match self {
            Self::Positions => "POSITION".to_string(),
            Self::Normals => "NORMAL".to_string(),
            Self::Tangents => "TANGENT".to_string(),
            Self::TexCoords(n) => format!("TEXCOORD_{n}"),
            Self::Colors(n) => format!("COLOR_{n}"),
            Self::Joints(n) => format!("JOINTS_{n}"),
            Self::Weights(n) => format!("WEIGHTS_{n}"),
            Self::Extras(name) => name.clone(),
        }
    }
}

impl FromStr for Semantic {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let set = |prefix: &str| s.strip_prefix(prefix).and_then(|n| n.parse::<u32>().ok());

        match s {
            "POSITION" => return Ok(Self::Positions),
            "NORMAL" => return Ok(Self::Normals),
            "TANGENT" => return Ok(Self::Tangents),
            _ if s.starts_with('_') => return Ok(Self::Extras(s.to_string())),
            _ => {}
        }

        if let Some(n) = set("TEXCOORD_") {
            Ok(Self::TexCoords(n))
        } else if let Some(n) = set("COLOR_") {
            Ok(Self::Colors(n))
        } else if let Some(n) = set("JOINTS_") {
            Ok(Self::Joints(n))
        } else if let Some(n) = set("WEIGHTS_") {
            Ok(Self::Weights(n))
        } else {
            Err(UnknownValue::new("attribute semantic", s))
        }
    }
}

impl TryFrom<String> for Semantic {
    type Error = UnknownValue;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for Semantic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_sizes() {
        let sizes: Vec<usize> = [
            ComponentType::Byte,
            ComponentType::UnsignedByte,
            ComponentType::Short,
            ComponentType::UnsignedShort,
            ComponentType::UnsignedInt,
            ComponentType::Float,
        ]
        .iter()
        .map(|c| c.size())
        .collect();
        assert_eq!(sizes, vec![1, 1, 2, 2, 4, 4]);
    }

    #[test]
    fn test_component_counts() {
        let counts: Vec<usize> = ["SCALAR", "VEC2", "VEC3", "VEC4", "MAT2", "MAT3", "MAT4"]
            .iter()
            .map(|s| s.parse::<AttributeType>().unwrap().component_count())
            .collect();
        assert_eq!(counts, vec![1, 2, 3, 4, 4, 9, 16]);
    }

    #[test]
    fn test_unknown_component_type() {
        let err = ComponentType::try_from(5124).unwrap_err();
        assert_eq!(err.to_string(), "unknown componentType value 5124");
    }

    #[test]
    fn test_component_type_code_roundtrip() {
        for code in [5120, 5121, 5122, 5123, 5125, 5126] {
            assert_eq!(ComponentType::try_from(code).unwrap().code(), code);
        }
    }

    #[test]
    fn test_semantics() {
        assert_eq!("POSITION".parse::<Semantic>(), Ok(Semantic::Positions));
        assert_eq!("TEXCOORD_1".parse::<Semantic>(), Ok(Semantic::TexCoords(1)));
        assert_eq!("WEIGHTS_0".parse::<Semantic>(), Ok(Semantic::Weights(0)));
        assert_eq!(
            "_TEMPERATURE".parse::<Semantic>(),
            Ok(Semantic::Extras("_TEMPERATURE".into()))
        );
        assert!("TEXCOORD_X".parse::<Semantic>().is_err());
        assert!("BANANA".parse::<Semantic>().is_err());
        assert_eq!(Semantic::Colors(2).to_string(), "COLOR_2");
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Mode::default(), Mode::Triangles);
        assert_eq!(Wrap::default(), Wrap::Repeat);
        assert_eq!(AlphaMode::default(), AlphaMode::Opaque);
    }

    #[test]
    fn test_unknown_codes() {
        assert!(Mode::try_from(7).is_err());
        assert!(Wrap::try_from(0).is_err());
        assert!(MinFilter::try_from(9729).is_ok());
        assert!(MagFilter::try_from(9984).is_err());
        assert!(Target::try_from(1).is_err());
        assert!(AlphaMode::try_from("TRANSLUCENT".to_string()).is_err());
    }
}
