//! tessera-document: the glTF 2.0 object graph.
//!
//! A [`Document`] is a flat set of arrays (buffers, accessors, nodes, ...)
//! whose elements point at each other through typed [`Index`] values.
//! Decoding checks shape and enumerated values only; references are checked
//! when resolved:
//!
//! ```ignore
//! use tessera_document::Document;
//!
//! let doc = Document::from_slice(&json_bytes)?;
//! let mesh = doc.nodes[0].mesh.unwrap().resolve(&doc)?;
//! ```
//!
//! Optional sections this crate does not interpret (sparse accessors,
//! animation and skin payloads) are kept as raw JSON.

pub mod error;
pub mod index;
pub mod schema;
pub mod types;
pub mod walk;

pub use error::{DocumentError, IndexError, Result, UnknownValue};
pub use index::{Index, Indexed};
pub use schema::{
    Accessor, Animation, Asset, Buffer, BufferView, Camera, Document, Image, Material, Mesh,
    Node, NormalTextureInfo, OcclusionTextureInfo, OrthographicCamera, PbrMetallicRoughness,
    PerspectiveCamera, Primitive, Sampler, Scene, Skin, Texture, TextureInfo,
};
pub use types::{
    AlphaMode, AttributeType, CameraType, ComponentType, MagFilter, MinFilter, Mode, Semantic,
    Target, Wrap,
};
pub use walk::VisitedNode;
