//! tessera-asset: loading glTF 2.0 assets.
//!
//! An [`Asset`] is a decoded [`Document`](tessera_document::Document) plus
//! the means to reach its bytes. Binary (`.glb`) and JSON (`.gltf`)
//! containers load the same way; buffers behind URIs are fetched lazily
//! through a [`ResourceProvider`] and cached per asset.
//!
//! ```ignore
//! use tessera_asset::{AccessorData, Asset};
//! use tessera_document::Semantic;
//!
//! let asset = Asset::load("Box.gltf")?;
//! let doc = asset.document();
//! let primitive = &doc.meshes[0].primitives[0];
//! let positions = primitive.attribute(&Semantic::Positions).unwrap().resolve(doc)?;
//! if let AccessorData::Vec3(points) = asset.read_accessor(positions)?.data {
//!     println!("{} vertices", points.len());
//! }
//! ```

pub mod accessor;
pub mod cache;
pub mod error;
pub mod loader;
pub mod options;
pub mod provider;
pub mod uri;

pub use accessor::{decode, AccessorCodec, AccessorData, BoundsViolation, Decoded};
pub use cache::BufferCache;
pub use error::{AssetError, Result};
pub use loader::{Asset, ByteSlice, ContainerKind};
pub use options::LoadOptions;
pub use provider::{FileSystem, ResourceProvider};
pub use uri::{DataUri, Uri};
