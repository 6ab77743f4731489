//! Where asset bytes come from.

use std::io;
use std::path::Path;

/// Reads whole resources by location.
///
/// Used for the top-level asset and for every sibling buffer or image it
/// names. Implementations must be shareable across threads; the loader
/// guarantees it asks for a given buffer URI at most once.
pub trait ResourceProvider: Send + Sync {
    fn read(&self, location: &Path) -> io::Result<Vec<u8>>;
}

/// Reads from the local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystem;

impl ResourceProvider for FileSystem {
    fn read(&self, location: &Path) -> io::Result<Vec<u8>> {
        tracing::debug!(location = %location.display(), "reading file");
        std::fs::read(location)
    }
}

impl<P: ResourceProvider + ?Sized> ResourceProvider for std::sync::Arc<P> {
    fn read(&self, location: &Path) -> io::Result<Vec<u8>> {
        (**self).read(location)
    }
}
