//! Storage layer
//!
//! Persists the entire link collection as one document. A store owns no
//! in-memory state between operation-cycles: every `load` re-reads the
//! backing document and every `save` replaces it.
//!
//! ## Implementations
//!
//! - **JsonLinkStore**: `links.json` in the data directory
//! - **MemoryLinkStore**: in-process snapshot, for tests and embedding

pub mod error;
pub mod memory;
pub mod persistence;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryLinkStore;
pub use persistence::JsonLinkStore;

use crate::collection::LinkCollection;

/// Whole-collection persistence used by the registry
pub trait LinkStore: Send + Sync {
    /// Load the collection in canonical order.
    ///
    /// Never fails: a missing, unreadable or malformed document is an empty
    /// collection.
    fn load(&self) -> LinkCollection;

    /// Replace the persisted collection with `links`
    fn save(&self, links: &LinkCollection) -> StorageResult<()>;
}

impl<T: LinkStore + ?Sized> LinkStore for Box<T> {
    fn load(&self) -> LinkCollection {
        (**self).load()
    }

    fn save(&self, links: &LinkCollection) -> StorageResult<()> {
        (**self).save(links)
    }
}

/// Diagnostic view of the backing document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreHealth {
    /// No document yet
    Missing,
    /// Document parsed; names in `duplicates` cannot be resolved
    Healthy {
        links: usize,
        duplicates: Vec<String>,
    },
    /// Document exists but could not be read or parsed
    Unreadable {
        details: String,
        suggestion: Option<String>,
    },
}
