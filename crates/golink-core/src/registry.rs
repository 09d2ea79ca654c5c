//! Link registry
//!
//! The `LinkRegistry` runs every operation as one operation-cycle: load the
//! whole collection from the store, apply at most one mutation, and save the
//! collection back before returning if anything changed.
//!
//! Cycles are serialized by a single lock held across load, mutate and save,
//! so two concurrent redirects to the same name always count two visits and
//! concurrent writers never overwrite each other.
//!
//! ## Usage
//!
//! ```ignore
//! let registry = LinkRegistry::open(&config);
//!
//! let (link, was_created) = registry.add_or_update_link("gh", "https://github.com")?;
//! if let Some(link) = registry.resolve_and_count("GH")? {
//!     redirect_to(&link.url);
//! }
//! ```

use std::sync::{Mutex, MutexGuard};

use thiserror::Error;
use tracing::{debug, info};

use crate::collection::LinkCollection;
use crate::config::Config;
use crate::models::{normalize_name, Link};
use crate::storage::{JsonLinkStore, LinkStore, StorageError};

/// Errors returned by mutating registry operations
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The collection could not be persisted; the mutation did not happen
    #[error("Failed to save links: {0}")]
    Storage(#[from] StorageError),

    /// Link names must contain something other than whitespace
    #[error("Link name must not be empty")]
    EmptyName,
}

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Name-keyed operations over a link store
#[derive(Debug)]
pub struct LinkRegistry<S = JsonLinkStore> {
    store: S,
    cycle: Mutex<()>,
}

impl LinkRegistry<JsonLinkStore> {
    /// Open the registry over `links.json` in the configured data directory
    pub fn open(config: &Config) -> Self {
        Self::new(JsonLinkStore::from_config(config))
    }
}

impl<S: LinkStore> LinkRegistry<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            cycle: Mutex::new(()),
        }
    }

    /// Get the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    // ==================== Reads ====================

    /// All links in canonical order
    pub fn list(&self) -> LinkCollection {
        let _cycle = self.lock();
        self.store.load()
    }

    /// The unique link addressed by `name`, if any
    pub fn find_link(&self, name: &str) -> Option<Link> {
        let _cycle = self.lock();
        self.store.load().find(name).cloned()
    }

    /// Names starting with `prefix`, case-insensitively, in canonical order
    pub fn suggest(&self, prefix: &str) -> Vec<String> {
        let _cycle = self.lock();
        self.store.load().names_with_prefix(prefix)
    }

    // ==================== Writes ====================

    /// Create a link, or repoint an existing one and reset its visits.
    ///
    /// Returns the stored link and `true` if it was created.
    pub fn add_or_update_link(&self, name: &str, url: &str) -> RegistryResult<(Link, bool)> {
        let key = normalize_name(name);
        if key.is_empty() {
            return Err(RegistryError::EmptyName);
        }

        let (link, was_created) = {
            let _cycle = self.lock();
            let mut links = self.store.load();
            let outcome = links.upsert(&key, url);
            self.store.save(&links)?;
            outcome
        };

        if was_created {
            info!("Added link '{}' -> {}", link.name, link.url);
        } else {
            info!("Updated link '{}' -> {}", link.name, link.url);
        }
        Ok((link, was_created))
    }

    /// Count a visit to `name` and return the link to redirect to.
    ///
    /// A miss returns `None` and writes nothing.
    pub fn resolve_and_count(&self, name: &str) -> RegistryResult<Option<Link>> {
        let resolved = self.mutate(|links| {
            links.find_mut(name).map(|link| {
                link.record_visit();
                link.clone()
            })
        })?;

        match &resolved {
            Some(link) => debug!("Resolved '{}' (visits={})", link.name, link.visits),
            None => debug!("No link named '{}'", normalize_name(name)),
        }
        Ok(resolved)
    }

    /// Delete `name` and return the removed link.
    ///
    /// A miss returns `None` and writes nothing.
    pub fn delete_link(&self, name: &str) -> RegistryResult<Option<Link>> {
        let removed = self.mutate(|links| links.remove(name))?;

        if let Some(link) = &removed {
            info!("Deleted link '{}' -> {}", link.name, link.url);
        }
        Ok(removed)
    }

    /// Run one load-mutate-save cycle.
    ///
    /// `apply` returns `Some` when it changed the collection; only then is the
    /// collection saved.
    fn mutate<T>(
        &self,
        apply: impl FnOnce(&mut LinkCollection) -> Option<T>,
    ) -> RegistryResult<Option<T>> {
        let _cycle = self.lock();
        let mut links = self.store.load();

        let outcome = apply(&mut links);
        if outcome.is_some() {
            self.store.save(&links)?;
        }
        Ok(outcome)
    }

    /// Enter the critical section.
    ///
    /// The guarded state lives in the store, not behind the mutex, so a
    /// panic in another cycle leaves nothing inconsistent to recover from.
    fn lock(&self) -> MutexGuard<'_, ()> {
        self.cycle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
