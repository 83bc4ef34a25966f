//! Key-value persistence for locally stored state.
//!
//! [`KeyValueBackend`] is the only thing the history store knows about
//! storage. [`FileBackend`] keeps one JSON file per key in a directory;
//! [`MemoryBackend`] keeps everything in a map and can be told to fail.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use thiserror::Error;

/// Storage operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageOperation {
    Read,
    Write,
    Remove,
}

impl fmt::Display for StorageOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StorageOperation::Read => "read",
            StorageOperation::Write => "write",
            StorageOperation::Remove => "remove",
        };
        f.write_str(name)
    }
}

/// I/O-level failure from a backend.
#[derive(Error, Debug)]
#[error("Persistence failure during {operation}: {cause}")]
pub struct PersistenceError {
    pub operation: StorageOperation,
    #[source]
    pub cause: io::Error,
}

impl PersistenceError {
    pub fn new(operation: StorageOperation, cause: io::Error) -> Self {
        Self { operation, cause }
    }
}

/// Opaque string blobs addressed by key.
pub trait KeyValueBackend {
    /// `Ok(None)` when nothing is stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Replace the value under `key` in a single write.
    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError>;

    /// Removing a missing key succeeds.
    fn remove(&self, key: &str) -> Result<(), PersistenceError>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(PersistenceError::new(StorageOperation::Read, err)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let write_err = |err: io::Error| PersistenceError::new(StorageOperation::Write, err);

        fs::create_dir_all(&self.dir).map_err(write_err)?;

        // Write a sibling then rename over the target so readers only ever
        // see a complete blob.
        let target = self.path_for(key);
        let staging = self.dir.join(format!(".{}.json.tmp", key));
        fs::write(&staging, value).map_err(write_err)?;
        fs::rename(&staging, &target).map_err(|err| {
            let _ = fs::remove_file(&staging);
            write_err(err)
        })?;

        tracing::trace!(path = %target.display(), bytes = value.len(), "Blob written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(PersistenceError::new(StorageOperation::Remove, err)),
        }
    }
}

/// In-memory backend, mainly for tests.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
    failing: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every operation fails as if storage were unavailable.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self, operation: StorageOperation) -> Result<(), PersistenceError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PersistenceError::new(
                operation,
                io::Error::new(io::ErrorKind::Other, "storage unavailable"),
            ));
        }
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still structurally valid.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        self.check(StorageOperation::Read)?;
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.check(StorageOperation::Write)?;
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        self.check(StorageOperation::Remove)?;
        self.lock().remove(key);
        Ok(())
    }
}

impl<B: KeyValueBackend + ?Sized> KeyValueBackend for &B {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        (**self).remove(key)
    }
}
