use crate::utils::{Result, TrackerError};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// A single key-value slot holding the serialized report list.
///
/// The store reads the whole slot at startup and rewrites it on every
/// mutation, so backends only need whole-payload read/write.
pub trait StorageBackend: Send + Sync {
    /// Current slot contents, or `None` if nothing was ever written.
    fn read(&self) -> Result<Option<String>>;

    fn write(&self, payload: &str) -> Result<()>;
}

/// JSON file on disk. Parent directories are created on first write.
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StorageBackend for FileBackend {
    fn read(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(&self.path)?))
    }

    fn write(&self, payload: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, payload)?;
        Ok(())
    }
}

/// In-memory slot. Deterministic backend for tests and embedding; clones
/// share the same slot.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self) -> Result<Option<String>> {
        let slot = self
            .slot
            .lock()
            .map_err(|e| TrackerError::StorageError(format!("poisoned slot lock: {e}")))?;
        Ok(slot.clone())
    }

    fn write(&self, payload: &str) -> Result<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|e| TrackerError::StorageError(format!("poisoned slot lock: {e}")))?;
        *slot = Some(payload.to_string());
        Ok(())
    }
}
