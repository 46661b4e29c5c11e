use std::path::{Path, PathBuf};
use std::sync::Arc;

use models::Entity;
use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs, sync::Mutex};
use tracing::{debug, info, warn};

use crate::errors::StoreError;
use crate::storage::collection::{Collection, DuplicatePolicy};

/// Collection optionally mirrored to a JSON array file.
///
/// Without a path the store is memory-only. With a path, an existing file is loaded once at
/// open and every mutation rewrites the whole file. Saves go to `<file>.tmp` first and are
/// renamed over the target, so readers never observe a half-written file.
///
/// A failed save leaves the in-memory collection already mutated; the error is returned and the
/// next successful save brings the file back in line.
#[derive(Clone)]
pub struct JsonFileStore<T> {
    collection: Collection<T>,
    file_path: Option<PathBuf>,
    save_lock: Arc<Mutex<()>>,
}

impl<T> JsonFileStore<T>
where
    T: Entity + Serialize + DeserializeOwned,
{
    /// Memory-only store.
    pub fn in_memory() -> Self {
        Self { collection: Collection::new(), file_path: None, save_lock: Arc::new(Mutex::new(())) }
    }

    /// Open the store, loading `path` when it exists. A missing file starts empty;
    /// an unreadable or malformed one is an error.
    pub async fn open<P: Into<PathBuf>>(path: Option<P>) -> Result<Self, StoreError> {
        let Some(file_path) = path.map(Into::into) else {
            return Ok(Self::in_memory());
        };

        let items: Vec<T> = match fs::read(&file_path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Vec::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| StoreError::durability(&file_path, "parse", e))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(StoreError::durability(&file_path, "read", e)),
        };
        info!(path = %file_path.display(), count = items.len(), "storage file loaded");

        Ok(Self {
            collection: Collection::from_vec(items),
            file_path: Some(file_path),
            save_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn collection(&self) -> &Collection<T> {
        &self.collection
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Write the full collection to the file; no-op for memory-only stores.
    pub async fn save(&self) -> Result<(), StoreError> {
        let Some(path) = &self.file_path else {
            return Ok(());
        };
        let _guard = self.save_lock.lock().await;

        let data = self
            .collection
            .with_items(|items| serde_json::to_vec(items))
            .await
            .map_err(|e| StoreError::durability(path, "serialize", e))?;

        let tmp = tmp_path(path);
        let result = async {
            fs::write(&tmp, &data).await.map_err(|e| StoreError::durability(&tmp, "write", e))?;
            fs::rename(&tmp, path).await.map_err(|e| StoreError::durability(path, "replace", e))
        }
        .await;

        match &result {
            Ok(()) => debug!(path = %path.display(), bytes = data.len(), "storage file saved"),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "storage file save failed");
                let _ = fs::remove_file(&tmp).await;
            }
        }
        result
    }

    /// Append and persist.
    pub async fn insert(&self, entity: T, policy: DuplicatePolicy) -> Result<(), StoreError> {
        self.collection
            .add_with(entity, policy)
            .await
            .map_err(|rejected| StoreError::Duplicate { id: rejected.id().to_string() })?;
        self.save().await
    }

    /// Replace the entity with the same Id (or append) and persist.
    pub async fn upsert(&self, entity: T) -> Result<bool, StoreError> {
        let replaced = self.collection.replace(entity).await;
        self.save().await?;
        Ok(replaced)
    }

    /// Remove by Id and persist; returns whether an entity existed.
    pub async fn remove(&self, id: &str) -> Result<bool, StoreError> {
        let existed = self.collection.remove(id).await.is_some();
        self.save().await?;
        Ok(existed)
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut raw = path.as_os_str().to_owned();
    raw.push(".tmp");
    PathBuf::from(raw)
}
