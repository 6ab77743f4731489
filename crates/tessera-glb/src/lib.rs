//! tessera-glb: scanner for the binary glTF container.
//!
//! A GLB file is a 12-byte header followed by length-prefixed chunks:
//!
//! ```text
//! magic:u32 version:u32 length:u32 | length:u32 type:u32 content... | ...
//! ```
//!
//! All integers are little-endian. The scanner consumes exactly
//! `length - 12` bytes of chunk data and reports a truncation error, never a
//! short read, when the stream ends early. Chunk types other than JSON and BIN
//! are kept as [`ChunkKind::Other`].
//!
//! ```ignore
//! let glb = tessera_glb::scan(&bytes)?;
//! let json = glb.json_chunk().map(|c| &c.data[..]);
//! ```

pub mod container;
pub mod error;

pub use container::{
    is_glb, scan, Chunk, ChunkKind, Glb, Header, CHUNK_BIN, CHUNK_HEADER_LEN, CHUNK_JSON,
    GLB_MAGIC, GLB_VERSION, HEADER_LEN,
};
pub use error::{GlbError, Result};
