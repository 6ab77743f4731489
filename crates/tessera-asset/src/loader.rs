//! The loaded asset and its byte resolution.

use std::fmt;
use std::ops::{Deref, Range};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tessera_document::{Accessor, Buffer, BufferView, Document, Image};
use tessera_glb::{Glb, GLB_VERSION};

use crate::accessor::{self, AccessorCodec, Decoded};
use crate::cache::BufferCache;
use crate::error::{AssetError, Result};
use crate::options::LoadOptions;
use crate::provider::{FileSystem, ResourceProvider};
use crate::uri::Uri;

/// The two container forms.
#[derive(Debug, Clone)]
pub enum ContainerKind {
    /// A `.gltf` JSON file. Buffers live behind URIs.
    Json,
    /// A `.glb` file, with its scanned chunks.
    Binary(Glb),
}

impl ContainerKind {
    pub fn is_binary(&self) -> bool {
        matches!(self, Self::Binary(_))
    }
}

/// File forms recognised by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileKind {
    Gltf,
    Glb,
}

impl FileKind {
    fn of(location: &Path) -> Result<Self> {
        let extension = location
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("gltf") => Ok(Self::Gltf),
            Some("glb") => Ok(Self::Glb),
            _ => Err(AssetError::UnrecognizedContainer { location: location.to_path_buf() }),
        }
    }
}

/// Shared bytes cut down to a sub-range, without copying.
#[derive(Clone)]
pub struct ByteSlice {
    bytes: Arc<[u8]>,
    range: Range<usize>,
}

impl ByteSlice {
    fn whole(bytes: Arc<[u8]>) -> Self {
        let range = 0..bytes.len();
        Self { bytes, range }
    }

    /// Cut `[offset, offset + len)` out of `bytes`, or fail with a range error.
    fn cut(bytes: Arc<[u8]>, what: &'static str, offset: usize, len: usize) -> Result<Self> {
        match offset.checked_add(len) {
            Some(end) if end <= bytes.len() => Ok(Self { bytes, range: offset..end }),
            end => Err(AssetError::Range {
                what,
                start: offset,
                end: end.unwrap_or(usize::MAX),
                len: bytes.len(),
            }),
        }
    }

    /// The bytes this slice was cut from.
    pub fn source(&self) -> &Arc<[u8]> {
        &self.bytes
    }

    /// Position within [`source`](Self::source).
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }
}

impl Deref for ByteSlice {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes[self.range.clone()]
    }
}

impl AsRef<[u8]> for ByteSlice {
    fn as_ref(&self) -> &[u8] {
        self
    }
}

impl fmt::Debug for ByteSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteSlice")
            .field("range", &self.range)
            .field("source_len", &self.bytes.len())
            .finish()
    }
}

/// A glTF asset with its document decoded and its bytes on demand.
///
/// Buffer bytes behind a URI are fetched on first use and kept for the
/// lifetime of the asset; each asset owns its own cache. `Asset` is `Sync`,
/// and concurrent requests for one URI share a single fetch.
pub struct Asset {
    location: PathBuf,
    kind: ContainerKind,
    document: Document,
    options: LoadOptions,
    provider: Box<dyn ResourceProvider>,
    cache: BufferCache,
}

impl Asset {
    /// Load from the file system with default options.
    pub fn load(location: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_options(location, FileSystem, LoadOptions::default())
    }

    /// Load through `provider`, which also serves every sibling resource.
    pub fn load_with_options<P>(
        location: impl AsRef<Path>,
        provider: P,
        options: LoadOptions,
    ) -> Result<Self>
    where
        P: ResourceProvider + 'static,
    {
        let location = location.as_ref();
        let file_kind = FileKind::of(location)?;
        let data = provider.read(location).map_err(|source| AssetError::Io {
            location: location.to_path_buf(),
            source,
        })?;
        Self::decode(location.to_path_buf(), file_kind, &data, Box::new(provider), options)
    }

    /// Decode an asset already in memory.
    ///
    /// `location` picks the container form and anchors sibling URIs.
    pub fn from_bytes<P>(
        location: impl AsRef<Path>,
        data: &[u8],
        provider: P,
        options: LoadOptions,
    ) -> Result<Self>
    where
        P: ResourceProvider + 'static,
    {
        let location = location.as_ref();
        let file_kind = FileKind::of(location)?;
        Self::decode(location.to_path_buf(), file_kind, data, Box::new(provider), options)
    }

    fn decode(
        location: PathBuf,
        file_kind: FileKind,
        data: &[u8],
        provider: Box<dyn ResourceProvider>,
        options: LoadOptions,
    ) -> Result<Self> {
        tracing::debug!(location = %location.display(), kind = ?file_kind, len = data.len(), "decoding asset");

        let (kind, document) = match file_kind {
            FileKind::Gltf => (ContainerKind::Json, Document::from_slice(data)?),
            FileKind::Glb => {
                let glb = tessera_glb::scan(data)?;
                if options.strict_version && glb.header.version != GLB_VERSION {
                    return Err(AssetError::UnsupportedVersion(glb.header.version));
                }
                let json = glb.json_chunk().ok_or(AssetError::MissingJsonChunk)?;
                let document = Document::from_slice(&json.data)?;
                if glb.bin_chunk_count() > 1 {
                    tracing::warn!(
                        count = glb.bin_chunk_count(),
                        "several BIN chunks, only the first is addressable"
                    );
                }
                (ContainerKind::Binary(glb), document)
            }
        };

        if !document.extensions_required.is_empty() {
            tracing::warn!(
                extensions = ?document.extensions_required,
                "asset requires extensions that are not interpreted"
            );
        }

        Ok(Self {
            location,
            kind,
            document,
            options,
            provider,
            cache: BufferCache::new(),
        })
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn kind(&self) -> &ContainerKind {
        &self.kind
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn options(&self) -> LoadOptions {
        self.options
    }

    /// The resolved-URI cache.
    pub fn cache(&self) -> &BufferCache {
        &self.cache
    }

    /// Bytes of a buffer.
    ///
    /// A buffer without a URI is the BIN chunk of a binary container. URI
    /// buffers are resolved once and cached by URI text.
    pub fn buffer_data(&self, buffer: &Buffer) -> Result<Arc<[u8]>> {
        let bytes = match &buffer.uri {
            Some(uri) => self.uri_data(uri)?,
            None => self.bin_chunk()?,
        };
        if bytes.len() < buffer.byte_length {
            tracing::warn!(
                declared = buffer.byte_length,
                actual = bytes.len(),
                "buffer shorter than its byteLength"
            );
        }
        Ok(bytes)
    }

    /// Bytes of a buffer view: `[byteOffset, byteOffset + byteLength)` of its buffer.
    pub fn buffer_view_data(&self, view: &BufferView) -> Result<ByteSlice> {
        let buffer = view.buffer.resolve(&self.document)?;
        let bytes = self.buffer_data(buffer)?;
        ByteSlice::cut(bytes, "buffer view", view.byte_offset, view.byte_length)
    }

    /// Bytes covered by an accessor, from its first element to the end of
    /// its last.
    ///
    /// An accessor without a buffer view reads as `count * element size`
    /// zero bytes.
    pub fn accessor_data(&self, accessor: &Accessor) -> Result<ByteSlice> {
        let element_size = accessor.element_size();
        let Some(view) = accessor.buffer_view else {
            return zeroed(accessor.count as u128 * element_size as u128).map(ByteSlice::whole);
        };

        let view = view.resolve(&self.document)?;
        let stride = accessor::element_stride(element_size, view.byte_stride)?;
        let start = accessor.byte_offset.checked_add(view.byte_offset);
        let span = accessor::span(accessor.count, element_size, stride);
        let buffer = view.buffer.resolve(&self.document)?;
        let bytes = self.buffer_data(buffer)?;
        match (start, span) {
            (Some(start), Some(span)) => ByteSlice::cut(bytes, "accessor", start, span),
            _ => Err(AssetError::Range {
                what: "accessor",
                start: start.unwrap_or(usize::MAX),
                end: usize::MAX,
                len: bytes.len(),
            }),
        }
    }

    /// Decode an accessor with this asset's options.
    pub fn read_accessor(&self, accessor: &Accessor) -> Result<Decoded> {
        let stride = match accessor.buffer_view {
            Some(view) => view.resolve(&self.document)?.byte_stride,
            None => None,
        };
        let bytes = self.accessor_data(accessor)?;
        let codec = AccessorCodec { check_bounds: self.options.check_bounds };
        codec.decode(accessor, &bytes, stride)
    }

    /// Encoded bytes of an image, from its URI or its buffer view.
    pub fn image_data(&self, image: &Image) -> Result<ByteSlice> {
        match (&image.uri, image.buffer_view) {
            (Some(uri), _) => self.uri_data(uri).map(ByteSlice::whole),
            (None, Some(view)) => self.buffer_view_data(view.resolve(&self.document)?),
            (None, None) => Err(AssetError::UnresolvableImage),
        }
    }

    fn bin_chunk(&self) -> Result<Arc<[u8]>> {
        match &self.kind {
            ContainerKind::Binary(glb) => glb
                .bin_chunk()
                .map(|chunk| Arc::clone(&chunk.data))
                .ok_or(AssetError::UnresolvableBuffer {
                    reason: "the binary container has no BIN chunk",
                }),
            ContainerKind::Json => Err(AssetError::UnresolvableBuffer {
                reason: "the asset is not a binary container",
            }),
        }
    }

    fn uri_data(&self, uri: &str) -> Result<Arc<[u8]>> {
        self.cache.get_or_fetch(uri, || match Uri::parse(uri)? {
            Uri::Data(data) => data.decode(),
            Uri::Relative(path) => {
                let location = self.sibling(&path);
                tracing::debug!(location = %location.display(), "fetching sibling resource");
                self.provider
                    .read(&location)
                    .map_err(|source| AssetError::Io { location, source })
            }
        })
    }

    /// Path of a resource next to the asset.
    fn sibling(&self, path: &str) -> PathBuf {
        match self.location.parent() {
            Some(dir) => dir.join(path),
            None => PathBuf::from(path),
        }
    }
}

/// `bytes` zeros, or an allocation error instead of an abort.
fn zeroed(bytes: u128) -> Result<Arc<[u8]>> {
    let too_large = || AssetError::Allocation { what: "zero-filled accessor", bytes };
    let len = usize::try_from(bytes)
        .ok()
        .filter(|&len| len <= isize::MAX as usize)
        .ok_or_else(too_large)?;
    let mut zeros = Vec::new();
    zeros.try_reserve_exact(len).map_err(|_| too_large())?;
    zeros.resize(len, 0);
    Ok(zeros.into())
}

impl fmt::Debug for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Asset")
            .field("location", &self.location)
            .field("binary", &self.kind.is_binary())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
