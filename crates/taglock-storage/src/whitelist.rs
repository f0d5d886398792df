//! Fixed-capacity authorized-tag store with durable backing.
//!
//! The whitelist is a 128-slot array of tag identifiers, zero meaning
//! empty. It is loaded once at construction, mutated only through
//! [`Whitelist::toggle`], and persisted back to durable storage as a
//! whole-array blob after every mutation. A single store-wide lock
//! linearizes searches and mutations across the local scan task and
//! the remote management task.
//!
//! # Persistence
//!
//! The durable layout is a hard compatibility constraint: exactly
//! [`MAX_TAGS`] little-endian u32 slots ([`WHITELIST_BLOB_LEN`] bytes)
//! under the fixed key [`WHITELIST_BLOB_KEY`], no schema version.
//! Persistence is best-effort: a failed durable write after a
//! successful in-memory toggle is reported but NOT rolled back, so
//! memory and storage may diverge until the next successful mutation.

use crate::blob::BlobStore;
use crate::error::{StorageError, StorageResult};
use taglock_core::TagId;
use taglock_core::constants::{MAX_TAGS, TAG_SLOT_BYTES, WHITELIST_BLOB_KEY, WHITELIST_BLOB_LEN};
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Outcome of a successful toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// Tag was absent and is now stored in the given slot.
    Added(usize),

    /// Tag was present in the given slot, which is now empty.
    Removed(usize),
}

/// Concurrency-safe whitelist of authorized tags.
///
/// # Examples
///
/// ```
/// use taglock_core::TagId;
/// use taglock_storage::blob::MemoryBlobStore;
/// use taglock_storage::whitelist::Whitelist;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let whitelist = Whitelist::load(MemoryBlobStore::new()).await;
///     let tag = TagId::new(42)?;
///
///     whitelist.toggle(tag).await?;
///     assert!(whitelist.search(tag).await.is_some());
///
///     whitelist.toggle(tag).await?;
///     assert!(whitelist.search(tag).await.is_none());
///     Ok(())
/// }
/// ```
pub struct Whitelist<B> {
    store: B,
    slots: Mutex<[u32; MAX_TAGS]>,
    load_error: Option<StorageError>,
}

impl<B: BlobStore> Whitelist<B> {
    /// Construct the whitelist from durable storage.
    ///
    /// Virgin storage (no blob) starts empty; a blob larger than
    /// capacity is truncated to capacity, never reallocated beyond the
    /// fixed bound. A storage failure is recorded and logged, leaving
    /// the array all-zero — construction never aborts the process.
    ///
    /// Runs before the lock-protected phase: callers must load before
    /// spawning any task that shares the store.
    pub async fn load(store: B) -> Self {
        let mut slots = [0u32; MAX_TAGS];
        let mut load_error = None;

        match store.get(WHITELIST_BLOB_KEY).await {
            Ok(Some(blob)) => {
                for (slot, chunk) in slots
                    .iter_mut()
                    .zip(blob.chunks_exact(TAG_SLOT_BYTES))
                {
                    *slot = u32::from_le_bytes(chunk.try_into().expect("chunk is 4 bytes"));
                }
                let occupied = slots.iter().filter(|&&s| s != 0).count();
                info!(occupied, blob_len = blob.len(), "whitelist loaded");
            }
            Ok(None) => {
                info!("no persisted whitelist, starting empty");
            }
            Err(e) => {
                warn!(error = %e, "whitelist load failed, starting empty");
                load_error = Some(e);
            }
        }

        Self {
            store,
            slots: Mutex::new(slots),
            load_error,
        }
    }

    /// The error recorded if load-time storage access failed.
    #[must_use]
    pub fn load_error(&self) -> Option<&StorageError> {
        self.load_error.as_ref()
    }

    /// Find the slot holding `tag`, if any.
    ///
    /// Linear scan under the store lock. An empty slot can never
    /// match: `TagId` is non-zero by construction and the comparison
    /// is constant-time per slot.
    pub async fn search(&self, tag: TagId) -> Option<usize> {
        let slots = self.slots.lock().await;
        slots.iter().position(|&slot| tag.matches_slot(slot))
    }

    /// Toggle the membership of `tag`: remove it if present, add it to
    /// the first free slot if absent.
    ///
    /// On success the entire array is serialized and persisted as a
    /// single blob write before the lock is released, so durable
    /// writes are ordered exactly like their mutations.
    ///
    /// # Errors
    /// - `StorageError::CapacityExceeded` if the tag is absent and no
    ///   slot is free; no mutation and no durable write happen.
    /// - Any storage error from the blob write; the in-memory mutation
    ///   is NOT rolled back (best-effort persistence, the in-memory
    ///   and durable state diverge until the next successful toggle).
    pub async fn toggle(&self, tag: TagId) -> StorageResult<Toggle> {
        let mut slots = self.slots.lock().await;

        let outcome = if let Some(index) = slots.iter().position(|&slot| tag.matches_slot(slot)) {
            slots[index] = 0;
            info!(%tag, index, "tag removed from whitelist");
            Toggle::Removed(index)
        } else if let Some(index) = slots.iter().position(|&slot| slot == 0) {
            slots[index] = tag.as_u32();
            info!(%tag, index, "tag added to whitelist");
            Toggle::Added(index)
        } else {
            warn!(%tag, "whitelist full, tag not added");
            return Err(StorageError::CapacityExceeded { capacity: MAX_TAGS });
        };

        let mut blob = [0u8; WHITELIST_BLOB_LEN];
        for (chunk, slot) in blob.chunks_exact_mut(TAG_SLOT_BYTES).zip(slots.iter()) {
            chunk.copy_from_slice(&slot.to_le_bytes());
        }

        if let Err(e) = self.store.put(WHITELIST_BLOB_KEY, &blob).await {
            warn!(error = %e, "whitelist persist failed, in-memory state ahead of storage");
            return Err(e);
        }

        Ok(outcome)
    }

    /// Number of occupied slots.
    pub async fn occupied(&self) -> usize {
        let slots = self.slots.lock().await;
        slots.iter().filter(|&&slot| slot != 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::MemoryBlobStore;

    fn tag(raw: u32) -> TagId {
        TagId::new(raw).unwrap()
    }

    async fn persisted(store: &MemoryBlobStore) -> Option<Vec<u8>> {
        store.get(WHITELIST_BLOB_KEY).await.unwrap()
    }

    #[tokio::test]
    async fn test_virgin_storage_starts_empty() {
        let whitelist = Whitelist::load(MemoryBlobStore::new()).await;

        assert!(whitelist.load_error().is_none());
        assert_eq!(whitelist.occupied().await, 0);
        assert!(whitelist.search(tag(1)).await.is_none());
    }

    #[tokio::test]
    async fn test_toggle_add_then_search() {
        let store = MemoryBlobStore::new();
        let whitelist = Whitelist::load(store.clone()).await;

        assert_eq!(whitelist.toggle(tag(42)).await.unwrap(), Toggle::Added(0));
        assert_eq!(whitelist.search(tag(42)).await, Some(0));

        // Persisted blob equals the in-memory array.
        let blob = persisted(&store).await.unwrap();
        assert_eq!(blob.len(), WHITELIST_BLOB_LEN);
        assert_eq!(&blob[..4], &42u32.to_le_bytes());
        assert!(blob[4..].iter().all(|&b| b == 0));
    }

    #[tokio::test]
    async fn test_toggle_involution() {
        let store = MemoryBlobStore::new();
        let whitelist = Whitelist::load(store.clone()).await;

        whitelist.toggle(tag(7)).await.unwrap();
        let occupied_before = whitelist.occupied().await;

        assert_eq!(whitelist.toggle(tag(42)).await.unwrap(), Toggle::Added(1));
        assert_eq!(whitelist.toggle(tag(42)).await.unwrap(), Toggle::Removed(1));

        assert!(whitelist.search(tag(42)).await.is_none());
        assert_eq!(whitelist.occupied().await, occupied_before);

        // The freed slot is zero in the persisted blob too.
        let blob = persisted(&store).await.unwrap();
        assert_eq!(&blob[4..8], &[0u8; 4]);
    }

    #[tokio::test]
    async fn test_removed_slot_is_reused() {
        let whitelist = Whitelist::load(MemoryBlobStore::new()).await;

        whitelist.toggle(tag(1)).await.unwrap();
        whitelist.toggle(tag(2)).await.unwrap();
        whitelist.toggle(tag(1)).await.unwrap(); // frees slot 0

        assert_eq!(whitelist.toggle(tag(3)).await.unwrap(), Toggle::Added(0));
        assert_eq!(whitelist.search(tag(2)).await, Some(1));
    }

    #[tokio::test]
    async fn test_capacity_exceeded_leaves_array_unchanged() {
        let store = MemoryBlobStore::new();
        let whitelist = Whitelist::load(store.clone()).await;

        for raw in 1..=MAX_TAGS as u32 {
            whitelist.toggle(tag(raw)).await.unwrap();
        }
        assert_eq!(whitelist.occupied().await, MAX_TAGS);
        let blob_before = persisted(&store).await.unwrap();

        let result = whitelist.toggle(tag(9999)).await;
        assert!(matches!(
            result,
            Err(StorageError::CapacityExceeded { capacity: MAX_TAGS })
        ));

        assert_eq!(whitelist.occupied().await, MAX_TAGS);
        assert!(whitelist.search(tag(9999)).await.is_none());
        assert_eq!(persisted(&store).await.unwrap(), blob_before);
    }

    #[tokio::test]
    async fn test_toggle_present_tag_when_full_succeeds() {
        let whitelist = Whitelist::load(MemoryBlobStore::new()).await;

        for raw in 1..=MAX_TAGS as u32 {
            whitelist.toggle(tag(raw)).await.unwrap();
        }

        assert_eq!(whitelist.toggle(tag(64)).await.unwrap(), Toggle::Removed(63));
        assert_eq!(whitelist.occupied().await, MAX_TAGS - 1);
    }

    #[tokio::test]
    async fn test_oversized_blob_truncated_to_capacity() {
        let store = MemoryBlobStore::new();
        let mut blob = Vec::new();
        for raw in 1..=(MAX_TAGS as u32 + 16) {
            blob.extend_from_slice(&raw.to_le_bytes());
        }
        store.put(WHITELIST_BLOB_KEY, &blob).await.unwrap();

        let whitelist = Whitelist::load(store).await;

        assert_eq!(whitelist.occupied().await, MAX_TAGS);
        assert!(whitelist.search(tag(MAX_TAGS as u32)).await.is_some());
        assert!(whitelist.search(tag(MAX_TAGS as u32 + 1)).await.is_none());
    }

    #[tokio::test]
    async fn test_short_blob_fills_prefix() {
        let store = MemoryBlobStore::new();
        let mut blob = Vec::new();
        for raw in [10u32, 20, 30] {
            blob.extend_from_slice(&raw.to_le_bytes());
        }
        store.put(WHITELIST_BLOB_KEY, &blob).await.unwrap();

        let whitelist = Whitelist::load(store).await;

        assert_eq!(whitelist.occupied().await, 3);
        assert_eq!(whitelist.search(tag(20)).await, Some(1));
    }

    #[tokio::test]
    async fn test_load_failure_records_error_and_starts_empty() {
        let store = MemoryBlobStore::new();
        store.put(WHITELIST_BLOB_KEY, &[1, 0, 0, 0]).await.unwrap();
        store.set_fail_reads(true);

        let whitelist = Whitelist::load(store).await;

        assert!(matches!(
            whitelist.load_error(),
            Some(StorageError::Unavailable(_))
        ));
        assert_eq!(whitelist.occupied().await, 0);
    }

    #[tokio::test]
    async fn test_persist_failure_keeps_in_memory_mutation() {
        let store = MemoryBlobStore::new();
        let whitelist = Whitelist::load(store.clone()).await;

        whitelist.toggle(tag(1)).await.unwrap();
        store.set_fail_writes(true);

        // The toggle reports the failure but the mutation sticks.
        assert!(whitelist.toggle(tag(2)).await.is_err());
        assert_eq!(whitelist.search(tag(2)).await, Some(1));

        // Durable copy still reflects the last successful write.
        store.set_fail_writes(false);
        let blob = persisted(&store).await.unwrap();
        assert_eq!(&blob[4..8], &[0u8; 4]);

        // Next successful mutation reconverges storage with memory.
        whitelist.toggle(tag(3)).await.unwrap();
        let blob = persisted(&store).await.unwrap();
        assert_eq!(&blob[4..8], &2u32.to_le_bytes());
        assert_eq!(&blob[8..12], &3u32.to_le_bytes());
    }
}
