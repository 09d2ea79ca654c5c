//! JSON file persistence for the link collection
//!
//! The whole collection lives in a single JSON document, rewritten in full on
//! every save. Saves use atomic writes (write to temp file, then rename) so a
//! reader never observes a half-written document.
//!
//! Storage location: `<data_dir>/links.json` (configurable via `Config`)
//!
//! Files:
//! - `links.json` - Array of `{name, url, date, visits}` records
//! - `links.json.corrupt` - The last document that could not be read or parsed

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::error::{StorageError, StorageResult};
use super::{LinkStore, StoreHealth};
use crate::collection::{duplicate_names, LinkCollection};
use crate::config::Config;
use crate::models::Link;

/// Link store backed by one JSON file
#[derive(Debug, Clone)]
pub struct JsonLinkStore {
    path: PathBuf,
}

impl JsonLinkStore {
    /// Create a store for the document at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store for the links document in the configured data directory
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.links_path())
    }

    /// Path of the links document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path where an unreadable document is kept before being ignored
    pub fn corrupt_backup_path(&self) -> PathBuf {
        sibling(&self.path, ".corrupt")
    }

    /// Check if the links document exists on disk
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read the document without degrading errors.
    ///
    /// Returns `None` if the document doesn't exist. A zero-length or
    /// whitespace-only document is an empty collection.
    pub fn read(&self) -> StorageResult<Option<Vec<Link>>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                return Err(StorageError::from_io(e, self.path.clone()))
            }
            Err(source) => {
                return Err(StorageError::ReadError {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Some(Vec::new()));
        }

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| StorageError::CorruptDocument {
                path: self.path.clone(),
                details: e.to_string(),
            })
    }

    /// Report the state of the document for diagnostics
    pub fn inspect(&self) -> StoreHealth {
        match self.read() {
            Ok(None) => StoreHealth::Missing,
            Ok(Some(links)) => StoreHealth::Healthy {
                links: links.len(),
                duplicates: duplicate_names(&links),
            },
            Err(e) => StoreHealth::Unreadable {
                details: e.to_string(),
                suggestion: e.recovery_suggestion().map(str::to_string),
            },
        }
    }

    /// Keep a document that could not be loaded out of the next save's way.
    ///
    /// Copies it when its bytes are readable, otherwise moves it aside.
    fn backup_unreadable(&self) {
        let backup = self.corrupt_backup_path();
        if fs::copy(&self.path, &backup).is_ok() {
            warn!("Copied unreadable links document to {:?}", backup);
            return;
        }
        match fs::rename(&self.path, &backup) {
            Ok(()) => warn!("Moved unreadable links document to {:?}", backup),
            Err(e) => warn!("Could not back up {:?} to {:?}: {}", self.path, backup, e),
        }
    }
}

impl LinkStore for JsonLinkStore {
    fn load(&self) -> LinkCollection {
        match self.read() {
            Ok(Some(links)) => {
                debug!("Loaded {} link(s) from {:?}", links.len(), self.path);
                LinkCollection::from_links(links)
            }
            Ok(None) => {
                debug!("No links document at {:?}, starting empty", self.path);
                LinkCollection::new()
            }
            Err(e) => {
                warn!("Treating links store as empty: {}", e);
                self.backup_unreadable();
                LinkCollection::new()
            }
        }
    }

    fn save(&self, links: &LinkCollection) -> StorageResult<()> {
        let bytes = serde_json::to_vec_pretty(links)?;
        atomic_write(&self.path, &bytes)?;
        debug!("Saved {} link(s) to {:?}", links.len(), self.path);
        Ok(())
    }
}

/// `path` with `suffix` appended to its file name
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let temp_path = sibling(path, ".tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::from_io(e, temp_path.clone()))?;
    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;
    file.sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|source| StorageError::AtomicWriteFailed {
        from: temp_path.clone(),
        to: path.to_path_buf(),
        source,
    })?;

    Ok(())
}
