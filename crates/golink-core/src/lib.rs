//! golink Core Library
//!
//! This crate provides the link registry behind golink, a personal go-link
//! redirector: short names map to long URLs, and visiting `/<name>` redirects
//! to the URL while counting the visit.
//!
//! # Architecture
//!
//! - **Link Store**: persists the whole collection as one JSON document
//! - **Link Registry**: load-mutate-save operation-cycles over the store
//!
//! Nothing is cached between operations; the store is re-read every time.
//!
//! # Quick Start
//!
//! ```text
//! let registry = LinkRegistry::open(&Config::load()?);
//!
//! registry.add_or_update_link("gh", "https://github.com")?;
//! let link = registry.resolve_and_count("gh")?;
//! let names = registry.suggest("g");
//! ```
//!
//! # Modules
//!
//! - `registry`: Operation-cycles (main entry point)
//! - `collection`: In-memory working set and ranking
//! - `models`: The `Link` record and name normalization
//! - `storage`: Link store trait and implementations
//! - `config`: Application configuration

pub mod collection;
pub mod config;
pub mod models;
pub mod registry;
pub mod storage;

pub use collection::LinkCollection;
pub use config::Config;
pub use models::{normalize_name, Link};
pub use registry::{LinkRegistry, RegistryError, RegistryResult};
pub use storage::{
    JsonLinkStore, LinkStore, MemoryLinkStore, StorageError, StorageResult, StoreHealth,
};
