//! Error types for tessera-glb.

use thiserror::Error;

/// Result type for container scanning.
pub type Result<T> = std::result::Result<T, GlbError>;

/// Errors raised while scanning a binary container.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GlbError {
    /// The first four bytes are not the glTF signature.
    #[error("invalid GLB magic 0x{found:08x}")]
    InvalidMagic { found: u32 },

    /// The header declares a total length smaller than the header itself.
    #[error("invalid GLB length {length}: shorter than the 12-byte header")]
    InvalidLength { length: u32 },

    /// The stream ended before a declared structure was complete.
    #[error("truncated GLB {context}: needed {needed} bytes, {available} available")]
    Truncated {
        /// What was being read.
        context: &'static str,
        /// Bytes the structure declares.
        needed: usize,
        /// Bytes left in the stream.
        available: usize,
    },
}

impl GlbError {
    /// Whether the error reports a short read rather than malformed content.
    pub fn is_truncation(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }
}
