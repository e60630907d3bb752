//! Storage backends for the serialized catalog.
//!
//! A backend holds exactly one document: the whole catalog as JSON.

use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

/// Where the serialized catalog lives
pub trait CatalogBackend: Send + Sync {
    /// Read the stored document, `None` if nothing is stored.
    fn load(&self) -> io::Result<Option<String>>;

    /// Replace the stored document.
    fn save(&self, data: &str) -> io::Result<()>;

    /// Delete the stored document. Removing nothing is not an error.
    fn remove(&self) -> io::Result<()>;

    /// Size of the stored document in bytes, `None` if nothing is stored.
    fn stored_len(&self) -> io::Result<Option<u64>>;
}

/// JSON file on the local filesystem
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("tmp")
    }
}

impl CatalogBackend for FileBackend {
    fn load(&self) -> io::Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save(&self, data: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        // Write to temp file, then rename over the document
        let temp_path = self.temp_path();
        if let Err(e) = std::fs::write(&temp_path, data) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(e);
        }
        std::fs::rename(&temp_path, &self.path)
    }

    fn remove(&self) -> io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }

    fn stored_len(&self) -> io::Result<Option<u64>> {
        match std::fs::metadata(&self.path) {
            Ok(meta) => Ok(Some(meta.len())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// In-process document slot with an optional byte quota
#[derive(Debug, Default)]
pub struct MemoryBackend {
    data: Mutex<Option<String>>,
    quota: Option<usize>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject saves larger than `quota` bytes.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            data: Mutex::new(None),
            quota: Some(quota),
        }
    }
}

impl CatalogBackend for MemoryBackend {
    fn load(&self) -> io::Result<Option<String>> {
        Ok(self.data.lock().clone())
    }

    fn save(&self, data: &str) -> io::Result<()> {
        if let Some(quota) = self.quota {
            if data.len() > quota {
                return Err(io::Error::new(
                    io::ErrorKind::Other,
                    format!("quota exceeded: {} > {} bytes", data.len(), quota),
                ));
            }
        }
        *self.data.lock() = Some(data.to_string());
        Ok(())
    }

    fn remove(&self) -> io::Result<()> {
        *self.data.lock() = None;
        Ok(())
    }

    fn stored_len(&self) -> io::Result<Option<u64>> {
        Ok(self.data.lock().as_ref().map(|d| d.len() as u64))
    }
}
