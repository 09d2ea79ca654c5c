//! In-memory link store

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{LinkStore, StorageResult};
use crate::collection::LinkCollection;
use crate::models::Link;

/// Link store holding its snapshot in memory.
///
/// Behaves like a document on disk: `load` hands out a fresh copy and `save`
/// replaces the snapshot. Counts saves so callers can verify that pure reads
/// and misses never write.
#[derive(Debug, Default)]
pub struct MemoryLinkStore {
    snapshot: Mutex<Vec<Link>>,
    saves: AtomicUsize,
}

impl MemoryLinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing snapshot, in stored order
    pub fn with_links(links: Vec<Link>) -> Self {
        Self {
            snapshot: Mutex::new(links),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of completed saves
    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Current snapshot, in stored order
    pub fn snapshot(&self) -> Vec<Link> {
        self.snapshot
            .lock()
            .map(|links| links.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl LinkStore for MemoryLinkStore {
    fn load(&self) -> LinkCollection {
        LinkCollection::from_links(self.snapshot())
    }

    fn save(&self, links: &LinkCollection) -> StorageResult<()> {
        let mut snapshot = self
            .snapshot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *snapshot = links.as_slice().to_vec();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
