//! Error types for tessera-asset.

use std::path::PathBuf;

use tessera_document::{AttributeType, ComponentType, DocumentError, IndexError};
use tessera_glb::GlbError;
use thiserror::Error;

/// Result type for asset operations.
pub type Result<T> = std::result::Result<T, AssetError>;

/// Errors raised while loading an asset or resolving its bytes.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The location names neither a `.gltf` nor a `.glb` file.
    #[error("unrecognized container {location}: expected a .gltf or .glb file")]
    UnrecognizedContainer { location: PathBuf },

    #[error("unsupported GLB version {0}")]
    UnsupportedVersion(u32),

    #[error("GLB container has no JSON chunk")]
    MissingJsonChunk,

    #[error(transparent)]
    Glb(#[from] GlbError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Index(#[from] IndexError),

    /// A byte range reaches past the data it is cut from.
    #[error("{what} range {start}..{end} exceeds {len} available bytes")]
    Range {
        what: &'static str,
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("buffer has no URI and {reason}")]
    UnresolvableBuffer { reason: &'static str },

    #[error("image has neither a URI nor a buffer view")]
    UnresolvableImage,

    #[error("unsupported data URI: {reason}")]
    UnsupportedDataUri { reason: String },

    #[error("unsupported URI scheme {scheme:?}")]
    UnsupportedScheme { scheme: String },

    /// A relative URI that is absolute after decoding or climbs above the
    /// asset's directory.
    #[error("resource path {path:?} leaves the asset directory")]
    EscapingPath { path: String },

    #[error("unsupported accessor layout {component_type} {attribute_type}")]
    UnsupportedLayout {
        component_type: ComponentType,
        attribute_type: AttributeType,
    },

    /// Memory for `bytes` could not be reserved.
    #[error("cannot allocate {bytes} bytes for {what}")]
    Allocation { what: &'static str, bytes: u128 },

    #[error("byte stride {stride} is smaller than the {element_size}-byte element")]
    InvalidStride { stride: usize, element_size: usize },

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The resource provider failed; its error is passed through untouched.
    #[error("failed to read {location}: {source}")]
    Io {
        location: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AssetError {
    /// Whether the error comes from the structure of the input rather than
    /// from a lookup or an I/O failure.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::UnrecognizedContainer { .. }
                | Self::UnsupportedVersion(_)
                | Self::MissingJsonChunk
                | Self::Document(_)
                | Self::Glb(GlbError::InvalidMagic { .. } | GlbError::InvalidLength { .. })
        )
    }

    /// Whether a binary container ended early.
    pub fn is_truncation(&self) -> bool {
        matches!(self, Self::Glb(err) if err.is_truncation())
    }
}
