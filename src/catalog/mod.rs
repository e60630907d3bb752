//! Catalog of generated looks.
//!
//! Items are kept newest first. When a backend is attached, every change
//! rewrites the whole catalog as one JSON document with size-based
//! eviction:
//!
//! 1. If the document exceeds `max_bytes`, only the `trim_to` newest items
//!    are written.
//! 2. If the write fails, an emergency write keeps the `emergency_trim_to`
//!    newest items.
//! 3. If that fails too, the stored document is removed and the change
//!    reports [`CatalogError`].
//!
//! Eviction only affects what is persisted; the in-memory list is kept
//! whole until the process restarts. Persistence is blocking I/O, so async
//! callers run `put` and `remove` on the blocking pool.
//!
//! # Example
//!
//! ```ignore
//! use vestidor::catalog::{CatalogStore, FileBackend, CatalogLimits};
//!
//! let store = CatalogStore::open(Box::new(FileBackend::new("catalog.json")), CatalogLimits::default())?;
//! let item = store.put("Linen dress", "Red linen midi dress", &artifact, &sources, vec![])?;
//! ```

pub mod backend;
pub mod error;
pub mod metadata;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};
use uuid::Uuid;

pub use backend::{CatalogBackend, FileBackend, MemoryBackend};
pub use error::CatalogError;
pub use metadata::{CatalogMetadata, Gender, GarmentStyle, GarmentType, Occasion, Season};

use crate::codec;
use crate::constants::{
    DEFAULT_CATALOG_EMERGENCY_TRIM_TO, DEFAULT_CATALOG_MAX_BYTES, DEFAULT_CATALOG_TRIM_TO,
};
use crate::generation::{GeneratedArtifact, ReferenceImages};

/// Base64 image as stored in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredImage {
    pub base64_data: String,
    pub media_type: String,
}

impl From<&GeneratedArtifact> for StoredImage {
    fn from(artifact: &GeneratedArtifact) -> Self {
        Self {
            base64_data: artifact.to_base64(),
            media_type: artifact.media_type.clone(),
        }
    }
}

impl StoredImage {
    pub fn decode(&self) -> Result<Vec<u8>, codec::CodecError> {
        codec::decode_base64(&self.base64_data)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image: StoredImage,
    /// Original subject image as a data URI
    pub model_image: Option<String>,
    /// Original garment image as a data URI
    pub garment_image: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub metadata: CatalogMetadata,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogDocument {
    items: Vec<CatalogItem>,
}

/// Eviction thresholds for the persisted catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogLimits {
    pub max_bytes: usize,
    pub trim_to: usize,
    pub emergency_trim_to: usize,
}

impl Default for CatalogLimits {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_CATALOG_MAX_BYTES,
            trim_to: DEFAULT_CATALOG_TRIM_TO,
            emergency_trim_to: DEFAULT_CATALOG_EMERGENCY_TRIM_TO,
        }
    }
}

impl CatalogLimits {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_bytes == 0 {
            return Err("catalog max_bytes must be greater than 0".to_string());
        }
        if self.trim_to == 0 {
            return Err("catalog trim_to must be greater than 0".to_string());
        }
        if self.emergency_trim_to > self.trim_to {
            return Err(format!(
                "catalog emergency_trim_to ({}) must not exceed trim_to ({})",
                self.emergency_trim_to, self.trim_to
            ));
        }
        Ok(())
    }
}

/// Snapshot of persisted catalog usage
#[derive(Debug, Clone, PartialEq)]
pub struct StorageInfo {
    pub size_kb: f64,
    pub item_count: usize,
    pub has_data: bool,
}

/// Newest-first catalog with optional persistence
pub struct CatalogStore {
    items: RwLock<Vec<CatalogItem>>,
    backend: Option<Box<dyn CatalogBackend>>,
    limits: CatalogLimits,
}

impl std::fmt::Debug for CatalogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogStore")
            .field("items", &self.items.read().len())
            .field("persistent", &self.backend.is_some())
            .field("limits", &self.limits)
            .finish()
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl CatalogStore {
    /// A catalog that is never persisted.
    pub fn in_memory() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
            backend: None,
            limits: CatalogLimits::default(),
        }
    }

    /// Load the catalog from `backend` and persist every later change to it.
    pub fn open(
        backend: Box<dyn CatalogBackend>,
        limits: CatalogLimits,
    ) -> Result<Self, CatalogError> {
        limits.validate().map_err(CatalogError::InvalidLimits)?;

        let mut items = match backend.load()? {
            Some(data) => serde_json::from_str::<CatalogDocument>(&data)?.items,
            None => Vec::new(),
        };
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        debug!(items = items.len(), "Loaded catalog");

        Ok(Self {
            items: RwLock::new(items),
            backend: Some(backend),
            limits,
        })
    }

    /// Add a generated look at the front of the catalog.
    pub fn put(
        &self,
        title: &str,
        description: &str,
        artifact: &GeneratedArtifact,
        sources: &ReferenceImages,
        tags: Vec<String>,
    ) -> Result<CatalogItem, CatalogError> {
        let item = CatalogItem {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: description.to_string(),
            image: StoredImage::from(artifact),
            model_image: sources
                .subject
                .as_ref()
                .map(|image| codec::to_data_uri(&image.media_type, &image.data)),
            garment_image: sources
                .garment
                .as_ref()
                .map(|image| codec::to_data_uri(&image.media_type, &image.data)),
            created_at: Utc::now(),
            tags,
            metadata: CatalogMetadata::infer(title, description),
        };

        let mut items = self.items.write();
        items.insert(0, item.clone());
        self.persist(&items)?;
        Ok(item)
    }

    /// All items, newest first.
    pub fn list(&self) -> Vec<CatalogItem> {
        self.items.read().clone()
    }

    pub fn get(&self, id: &Uuid) -> Option<CatalogItem> {
        self.items.read().iter().find(|item| &item.id == id).cloned()
    }

    pub fn remove(&self, id: &Uuid) -> Result<Option<CatalogItem>, CatalogError> {
        let mut items = self.items.write();
        let Some(index) = items.iter().position(|item| &item.id == id) else {
            return Ok(None);
        };
        let removed = items.remove(index);
        self.persist(&items)?;
        Ok(Some(removed))
    }

    /// Drop every item and delete the stored document.
    pub fn clear(&self) -> Result<(), CatalogError> {
        self.items.write().clear();
        if let Some(backend) = &self.backend {
            backend.remove()?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    pub fn storage_info(&self) -> StorageInfo {
        let item_count = self.len();
        let stored = self
            .backend
            .as_ref()
            .and_then(|backend| backend.stored_len().ok().flatten());

        match stored {
            Some(bytes) => StorageInfo {
                size_kb: bytes as f64 / 1024.0,
                item_count,
                has_data: true,
            },
            None => StorageInfo {
                size_kb: 0.0,
                item_count,
                has_data: false,
            },
        }
    }

    fn persist(&self, items: &[CatalogItem]) -> Result<(), CatalogError> {
        let Some(backend) = &self.backend else {
            return Ok(());
        };

        let Err(e) = self.save_trimmed(backend.as_ref(), items) else {
            return Ok(());
        };
        warn!(error = %e, "Catalog save failed, keeping newest items only");

        let keep = self.limits.emergency_trim_to.min(items.len());
        let emergency = Self::serialize(&items[..keep])
            .map_err(CatalogError::from)
            .and_then(|data| backend.save(&data).map_err(CatalogError::from));

        match emergency {
            Ok(()) => {
                warn!(items = keep, "Catalog reduced by emergency save");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Emergency catalog save failed, removing stored catalog");
                if let Err(remove_err) = backend.remove() {
                    error!(error = %remove_err, "Failed to remove stored catalog");
                }
                Err(e)
            }
        }
    }

    fn save_trimmed(
        &self,
        backend: &dyn CatalogBackend,
        items: &[CatalogItem],
    ) -> Result<(), CatalogError> {
        let data = Self::serialize(items)?;
        debug!(
            size_kb = data.len() / 1024,
            items = items.len(),
            "Saving catalog"
        );

        if data.len() > self.limits.max_bytes {
            let keep = self.limits.trim_to.min(items.len());
            warn!(
                size = data.len(),
                max_bytes = self.limits.max_bytes,
                keep,
                "Catalog too large, keeping newest items"
            );
            backend.save(&Self::serialize(&items[..keep])?)?;
        } else {
            backend.save(&data)?;
        }
        Ok(())
    }

    fn serialize(items: &[CatalogItem]) -> Result<String, serde_json::Error> {
        #[derive(Serialize)]
        struct Borrowed<'a> {
            items: &'a [CatalogItem],
        }
        serde_json::to_string(&Borrowed { items })
    }
}
