//! glTF 2.0 JSON schema types.
//!
//! Field names and defaults follow the glTF 2.0 specification. Cross
//! references are [`Index`] values and stay unchecked until resolved.

use std::str::FromStr;

use glam::{Mat4, Quat, Vec3};
use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

use crate::error::{DocumentError, Result};
use crate::index::Index;
use crate::types::{
    AlphaMode, AttributeType, CameraType, ComponentType, MagFilter, MinFilter, Mode, Semantic,
    Target, Wrap,
};

/// Root glTF object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Asset information. The only required field.
    pub asset: Asset,
    /// Default scene.
    #[serde(default)]
    pub scene: Option<Index<Scene>>,
    #[serde(default)]
    pub scenes: Vec<Scene>,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub meshes: Vec<Mesh>,
    #[serde(default)]
    pub accessors: Vec<Accessor>,
    #[serde(default)]
    pub buffer_views: Vec<BufferView>,
    #[serde(default)]
    pub buffers: Vec<Buffer>,
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub textures: Vec<Texture>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub samplers: Vec<Sampler>,
    #[serde(default)]
    pub animations: Vec<Animation>,
    #[serde(default)]
    pub skins: Vec<Skin>,
    #[serde(default)]
    pub cameras: Vec<Camera>,
    /// Extension names used.
    #[serde(default)]
    pub extensions_used: Vec<String>,
    /// Extension names required to load the asset.
    #[serde(default)]
    pub extensions_required: Vec<String>,
}

impl Document {
    /// Decode a document from JSON bytes.
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        let document: Self = serde_json::from_slice(data)?;
        tracing::debug!(
            version = %document.asset.version,
            nodes = document.nodes.len(),
            meshes = document.meshes.len(),
            accessors = document.accessors.len(),
            "decoded glTF document"
        );
        Ok(document)
    }
}

impl FromStr for Document {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_slice(s.as_bytes())
    }
}

/// Asset metadata.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// glTF version.
    pub version: String,
    /// Minimum glTF version required.
    pub min_version: Option<String>,
    /// Generator name.
    pub generator: Option<String>,
    pub copyright: Option<String>,
}

/// A scene containing root nodes.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Scene {
    pub name: Option<String>,
    /// Root nodes.
    #[serde(default)]
    pub nodes: Vec<Index<Node>>,
}

/// A node in the scene graph.
///
/// Children may form cycles; nothing here rejects them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub name: Option<String>,
    #[serde(default)]
    pub children: Vec<Index<Node>>,
    pub mesh: Option<Index<Mesh>>,
    pub camera: Option<Index<Camera>>,
    pub skin: Option<Index<Skin>>,
    /// Local transformation matrix (column-major). An empty array decodes as `None`.
    #[serde(default, deserialize_with = "deserialize_matrix")]
    pub matrix: Option<Mat4>,
    pub translation: Option<Vec3>,
    /// Rotation quaternion (x, y, z, w).
    pub rotation: Option<Quat>,
    pub scale: Option<Vec3>,
    /// Morph target weights.
    #[serde(default)]
    pub weights: Vec<f32>,
}

impl Node {
    /// Local transform: the explicit matrix if present, else T * R * S.
    pub fn transform(&self) -> Mat4 {
        if let Some(matrix) = self.matrix {
            return matrix;
        }
        Mat4::from_scale_rotation_translation(
            self.scale.unwrap_or(Vec3::ONE),
            self.rotation.unwrap_or(Quat::IDENTITY),
            self.translation.unwrap_or(Vec3::ZERO),
        )
    }
}

fn deserialize_matrix<'de, D>(deserializer: D) -> std::result::Result<Option<Mat4>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<f32>::deserialize(deserializer)?;
    match values.len() {
        0 => Ok(None),
        16 => Ok(Some(Mat4::from_cols_slice(&values))),
        n => Err(D::Error::custom(format!(
            "node matrix must have 16 components, found {n}"
        ))),
    }
}

/// A mesh containing primitives.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Mesh {
    pub name: Option<String>,
    pub primitives: Vec<Primitive>,
    /// Default morph target weights.
    #[serde(default)]
    pub weights: Vec<f32>,
}

/// A mesh primitive.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Primitive {
    /// Vertex attributes in document order.
    pub attributes: IndexMap<Semantic, Index<Accessor>>,
    /// Index accessor.
    pub indices: Option<Index<Accessor>>,
    pub material: Option<Index<Material>>,
    #[serde(default)]
    pub mode: Mode,
    /// Morph targets.
    #[serde(default)]
    pub targets: Vec<IndexMap<Semantic, Index<Accessor>>>,
}

impl Primitive {
    /// The accessor bound to `semantic`, if any.
    pub fn attribute(&self, semantic: &Semantic) -> Option<Index<Accessor>> {
        self.attributes.get(semantic).copied()
    }
}

/// An accessor for typed buffer data.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accessor {
    /// Owning buffer view. Absent means the data is all zeros.
    pub buffer_view: Option<Index<BufferView>>,
    /// Byte offset within the buffer view.
    #[serde(default)]
    pub byte_offset: usize,
    pub component_type: ComponentType,
    /// Whether integer values map to [0, 1] or [-1, 1].
    #[serde(default)]
    pub normalized: bool,
    /// Number of elements.
    pub count: usize,
    #[serde(rename = "type")]
    pub attribute_type: AttributeType,
    /// Per-component maximum.
    pub max: Option<Vec<f64>>,
    /// Per-component minimum.
    pub min: Option<Vec<f64>>,
    /// Sparse storage, kept as found.
    pub sparse: Option<serde_json::Value>,
    pub name: Option<String>,
}

impl Accessor {
    /// Byte size of a single element.
    pub fn element_size(&self) -> usize {
        self.component_type.size() * self.attribute_type.component_count()
    }
}

/// A view into a buffer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferView {
    pub buffer: Index<Buffer>,
    /// Byte offset into the buffer.
    #[serde(default)]
    pub byte_offset: usize,
    pub byte_length: usize,
    /// Distance between the starts of consecutive elements.
    pub byte_stride: Option<usize>,
    pub target: Option<Target>,
    pub name: Option<String>,
}

/// A buffer containing binary data.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Buffer {
    pub byte_length: usize,
    /// Data URI or relative path. Absent means the binary chunk of a GLB.
    pub uri: Option<String>,
    pub name: Option<String>,
}

/// A PBR material.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub name: Option<String>,
    pub pbr_metallic_roughness: Option<PbrMetallicRoughness>,
    pub normal_texture: Option<NormalTextureInfo>,
    pub occlusion_texture: Option<OcclusionTextureInfo>,
    pub emissive_texture: Option<TextureInfo>,
    #[serde(default)]
    pub emissive_factor: [f32; 3],
    #[serde(default)]
    pub alpha_mode: AlphaMode,
    #[serde(default = "default_alpha_cutoff")]
    pub alpha_cutoff: f32,
    #[serde(default)]
    pub double_sided: bool,
}

fn default_alpha_cutoff() -> f32 {
    0.5
}

/// PBR metallic-roughness properties.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbrMetallicRoughness {
    #[serde(default = "default_base_color_factor")]
    pub base_color_factor: [f32; 4],
    pub base_color_texture: Option<TextureInfo>,
    #[serde(default = "default_factor")]
    pub metallic_factor: f32,
    #[serde(default = "default_factor")]
    pub roughness_factor: f32,
    pub metallic_roughness_texture: Option<TextureInfo>,
}

fn default_base_color_factor() -> [f32; 4] {
    [1.0, 1.0, 1.0, 1.0]
}

fn default_factor() -> f32 {
    1.0
}

/// Texture reference.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextureInfo {
    pub index: Index<Texture>,
    /// Texture coordinate set.
    #[serde(default)]
    pub tex_coord: u32,
}

/// Normal texture reference.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalTextureInfo {
    pub index: Index<Texture>,
    #[serde(default)]
    pub tex_coord: u32,
    #[serde(default = "default_factor")]
    pub scale: f32,
}

/// Occlusion texture reference.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcclusionTextureInfo {
    pub index: Index<Texture>,
    #[serde(default)]
    pub tex_coord: u32,
    #[serde(default = "default_factor")]
    pub strength: f32,
}

/// A texture.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Texture {
    pub sampler: Option<Index<Sampler>>,
    /// Image source.
    pub source: Option<Index<Image>>,
    pub name: Option<String>,
}

/// An image.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    /// Data URI or relative path.
    pub uri: Option<String>,
    pub mime_type: Option<String>,
    /// Image bytes stored in a buffer view (GLB).
    pub buffer_view: Option<Index<BufferView>>,
    pub name: Option<String>,
}

/// A texture sampler.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sampler {
    pub mag_filter: Option<MagFilter>,
    pub min_filter: Option<MinFilter>,
    #[serde(default)]
    pub wrap_s: Wrap,
    #[serde(default)]
    pub wrap_t: Wrap,
    pub name: Option<String>,
}

/// A camera.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Camera {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub camera_type: CameraType,
    pub perspective: Option<PerspectiveCamera>,
    pub orthographic: Option<OrthographicCamera>,
}

/// Perspective camera properties.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerspectiveCamera {
    pub aspect_ratio: Option<f32>,
    /// Vertical FOV in radians.
    pub yfov: f32,
    pub znear: f32,
    pub zfar: Option<f32>,
}

/// Orthographic camera properties.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrthographicCamera {
    pub xmag: f32,
    pub ymag: f32,
    pub znear: f32,
    pub zfar: f32,
}

/// An animation. Channels and samplers are kept as raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Animation {
    pub name: Option<String>,
    #[serde(flatten)]
    pub payload: serde_json::Map<String, serde_json::Value>,
}

/// A skin. Joint data is kept as raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Skin {
    pub name: Option<String>,
    #[serde(flatten)]
    pub payload: serde_json::Map<String, serde_json::Value>,
}
