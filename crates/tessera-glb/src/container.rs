//! GLB header and chunk scanning.

use std::sync::Arc;

use nom::{bytes::complete::take, number::complete::le_u32, sequence::tuple, IResult};

use crate::error::{GlbError, Result};

/// GLB magic number ("glTF" in little-endian).
pub const GLB_MAGIC: u32 = 0x4654_6C67;
/// Container version written by glTF 2.0 producers.
pub const GLB_VERSION: u32 = 2;
/// JSON chunk type ("JSON" in little-endian).
pub const CHUNK_JSON: u32 = 0x4E4F_534A;
/// Binary chunk type ("BIN\0" in little-endian).
pub const CHUNK_BIN: u32 = 0x004E_4942;

/// Size of the file header in bytes.
pub const HEADER_LEN: usize = 12;
/// Size of a chunk header in bytes.
pub const CHUNK_HEADER_LEN: usize = 8;

/// The 12-byte file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub magic: u32,
    pub version: u32,
    /// Declared length of the whole container, header included.
    pub length: u32,
}

/// Chunk type, classified by exact match against the reserved codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkKind {
    Json,
    Bin,
    /// Any other type code, kept as found.
    Other(u32),
}

impl ChunkKind {
    /// Classify a raw chunk type code.
    pub fn from_code(code: u32) -> Self {
        match code {
            CHUNK_JSON => Self::Json,
            CHUNK_BIN => Self::Bin,
            other => Self::Other(other),
        }
    }

    /// The raw type code.
    pub fn code(self) -> u32 {
        match self {
            Self::Json => CHUNK_JSON,
            Self::Bin => CHUNK_BIN,
            Self::Other(code) => code,
        }
    }
}

/// A chunk and its content.
///
/// Content is reference counted so loaders can hand it out without copying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub kind: ChunkKind,
    pub data: Arc<[u8]>,
}

impl Chunk {
    /// Content length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the chunk has no content.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A scanned binary container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glb {
    pub header: Header,
    /// Every chunk in file order, unknown kinds included.
    pub chunks: Vec<Chunk>,
}

impl Glb {
    /// The first JSON chunk. By convention this is chunk 0.
    pub fn json_chunk(&self) -> Option<&Chunk> {
        self.chunks.iter().find(|c| c.kind == ChunkKind::Json)
    }

    /// The first BIN chunk. By convention this is chunk 1.
    pub fn bin_chunk(&self) -> Option<&Chunk> {
        self.chunks.iter().find(|c| c.kind == ChunkKind::Bin)
    }

    /// Number of BIN chunks present.
    pub fn bin_chunk_count(&self) -> usize {
        self.chunks.iter().filter(|c| c.kind == ChunkKind::Bin).count()
    }
}

/// Check for the GLB magic number without scanning further.
pub fn is_glb(data: &[u8]) -> bool {
    data.len() >= 4 && u32::from_le_bytes([data[0], data[1], data[2], data[3]]) == GLB_MAGIC
}

/// Scanner progress.
enum State<'a> {
    ReadHeader(&'a [u8]),
    /// Remaining chunk bytes within the declared length.
    ReadChunks(&'a [u8]),
    Done,
}

/// Scan a binary container into its header and ordered chunk list.
///
/// Exactly `header.length - 12` bytes after the header are consumed as chunks.
/// Bytes past the declared length are ignored.
pub fn scan(data: &[u8]) -> Result<Glb> {
    let mut header = None;
    let mut chunks = Vec::new();
    let mut state = State::ReadHeader(data);

    loop {
        state = match state {
            State::ReadHeader(input) => {
                let (rest, parsed) = parse_header(input)
                    .map_err(|_| truncated("header", HEADER_LEN, input.len()))?;
                if parsed.magic != GLB_MAGIC {
                    return Err(GlbError::InvalidMagic { found: parsed.magic });
                }
                let body_len = (parsed.length as usize)
                    .checked_sub(HEADER_LEN)
                    .ok_or(GlbError::InvalidLength { length: parsed.length })?;
                if rest.len() < body_len {
                    return Err(truncated("body", body_len, rest.len()));
                }
                if rest.len() > body_len {
                    tracing::warn!(
                        trailing = rest.len() - body_len,
                        "ignoring bytes past declared GLB length"
                    );
                }
                tracing::debug!(version = parsed.version, length = parsed.length, "GLB header");
                header = Some(parsed);
                State::ReadChunks(&rest[..body_len])
            }
            State::ReadChunks(input) if input.is_empty() => State::Done,
            State::ReadChunks(input) => {
                let (rest, (length, code)) = parse_chunk_header(input)
                    .map_err(|_| truncated("chunk header", CHUNK_HEADER_LEN, input.len()))?;
                let length = length as usize;
                let (rest, content) = take_content(rest, length)
                    .map_err(|_| truncated("chunk content", length, rest.len()))?;
                let kind = ChunkKind::from_code(code);
                tracing::debug!(?kind, length, "GLB chunk");
                chunks.push(Chunk { kind, data: Arc::from(content) });
                State::ReadChunks(rest)
            }
            State::Done => break,
        };
    }

    match header {
        Some(header) => Ok(Glb { header, chunks }),
        None => Err(truncated("header", HEADER_LEN, data.len())),
    }
}

fn parse_header(input: &[u8]) -> IResult<&[u8], Header> {
    let (input, (magic, version, length)) = tuple((le_u32, le_u32, le_u32))(input)?;
    Ok((input, Header { magic, version, length }))
}

fn parse_chunk_header(input: &[u8]) -> IResult<&[u8], (u32, u32)> {
    tuple((le_u32, le_u32))(input)
}

fn take_content(input: &[u8], length: usize) -> IResult<&[u8], &[u8]> {
    take(length)(input)
}

fn truncated(context: &'static str, needed: usize, available: usize) -> GlbError {
    GlbError::Truncated { context, needed, available }
}
