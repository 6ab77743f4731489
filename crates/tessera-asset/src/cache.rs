//! Per-asset memo of resolved URI bytes.
//!
//! The map lock is held only long enough to find or create a slot; the fetch
//! itself runs under that slot's own lock. Concurrent requests for one URI
//! therefore wait for the first fetch instead of repeating it, while requests
//! for other URIs proceed. A failed fetch caches nothing: its slot is
//! dropped unless another request is already waiting on it, so a later
//! request retries.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::Result;

type Slot = Mutex<Option<Arc<[u8]>>>;

/// Bytes keyed by the URI text they were resolved from.
#[derive(Debug, Default)]
pub struct BufferCache {
    slots: Mutex<HashMap<String, Arc<Slot>>>,
}

impl BufferCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached bytes for `uri`, running `fetch` on a miss.
    pub fn get_or_fetch<F>(&self, uri: &str, fetch: F) -> Result<Arc<[u8]>>
    where
        F: FnOnce() -> Result<Vec<u8>>,
    {
        let slot = Arc::clone(lock(&self.slots).entry(uri.to_string()).or_default());

        let mut entry = lock(&slot);
        if let Some(bytes) = entry.as_ref() {
            tracing::debug!(uri = %short(uri), "buffer cache hit");
            return Ok(Arc::clone(bytes));
        }

        let bytes: Arc<[u8]> = match fetch() {
            Ok(bytes) => bytes.into(),
            Err(err) => {
                drop(entry);
                self.discard(uri, &slot);
                return Err(err);
            }
        };
        tracing::debug!(uri = %short(uri), len = bytes.len(), "buffer cached");
        *entry = Some(Arc::clone(&bytes));
        Ok(bytes)
    }

    /// Remove an empty slot nobody else is holding.
    fn discard(&self, uri: &str, slot: &Arc<Slot>) {
        let mut slots = lock(&self.slots);
        // Others reach a slot only through the map, so with the map locked a
        // count of two (map and caller) means no one is waiting on it.
        let unused = slots.get(uri).is_some_and(|held| Arc::ptr_eq(held, slot))
            && Arc::strong_count(slot) == 2
            && lock(slot).is_none();
        if unused {
            slots.remove(uri);
        }
    }

    /// Whether `uri` has resolved bytes.
    pub fn contains(&self, uri: &str) -> bool {
        let slot = lock(&self.slots).get(uri).cloned();
        slot.is_some_and(|slot| lock(&slot).is_some())
    }

    /// Number of URIs with resolved bytes.
    pub fn len(&self) -> usize {
        let slots: Vec<_> = lock(&self.slots).values().cloned().collect();
        slots.iter().filter(|slot| lock(slot).is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A panic in another fetch leaves the data consistent; keep going.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Data URIs can be megabytes long; log their head only.
fn short(uri: &str) -> &str {
    match uri.char_indices().nth(64) {
        Some((end, _)) => &uri[..end],
        None => uri,
    }
}
