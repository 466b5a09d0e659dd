use std::{collections::HashMap, path::{Path, PathBuf}, sync::Arc};

use async_trait::async_trait;
use tokio::{fs, sync::RwLock};
use tracing::{debug, warn};

use crate::errors::StoreError;
use crate::storage::kv::KeyValueStore;

/// JSON file-backed key-value store.
///
/// Keeps every key of the device store in one `{ key: text }` JSON object.
/// A mutation is written to disk before it becomes visible to readers, so a
/// failed write leaves both the file and the in-memory view untouched.
#[derive(Clone)]
pub struct FileKvStore {
    inner: Arc<RwLock<HashMap<String, String>>>,
    file_path: PathBuf,
}

impl FileKvStore {
    /// Open the store at a path. Creates the file with an empty map if missing.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, StoreError> {
        let file_path = path.into();
        let label = file_path.display().to_string();
        if let Some(parent) = file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(|e| StoreError::storage("open", &label, e))?;
            }
        }

        let map: HashMap<String, String> = match fs::read(&file_path).await {
            Ok(bytes) if bytes.is_empty() => HashMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| StoreError::deserialize(&label, e))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let empty: HashMap<String, String> = HashMap::new();
                write_atomic(&file_path, &empty).await.map_err(|e| StoreError::storage("open", &label, e))?;
                debug!(path = %label, "created empty storage file");
                empty
            }
            Err(e) => return Err(StoreError::storage("open", &label, e)),
        };

        Ok(Arc::new(Self { inner: Arc::new(RwLock::new(map)), file_path }))
    }

    /// Apply a mutation to a copy of the map, persist it, then publish it.
    async fn commit<F>(&self, op: &'static str, key: &str, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut HashMap<String, String>),
    {
        let mut map = self.inner.write().await;
        let mut next = map.clone();
        f(&mut next);
        if let Err(e) = write_atomic(&self.file_path, &next).await {
            warn!(op, %key, error = %e, "storage write failed");
            return Err(StoreError::storage(op, key, e));
        }
        *map = next;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

async fn write_atomic(path: &Path, map: &HashMap<String, String>) -> std::io::Result<()> {
    let data = serde_json::to_vec(map)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    fs::write(&tmp, data).await?;
    fs::rename(&tmp, path).await
}

#[async_trait]
impl KeyValueStore for FileKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let map = self.inner.read().await;
        Ok(map.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.commit("set", key, |m| {
            m.insert(key.to_string(), value);
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.commit("remove", key, |m| {
            m.remove(key);
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmp_path() -> PathBuf {
        std::env::temp_dir().join(format!("file_kv_store_{}.json", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn file_kv_store_persists_across_reopen() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = FileKvStore::new(&tmp).await?;

        // initially empty
        assert_eq!(store.get("a").await?, None);

        store.set("a", "1".into()).await?;
        store.set("b", "2".into()).await?;
        store.set("a", "10".into()).await?;
        store.remove("b").await?;
        // removing a missing key is fine
        store.remove("zzz").await?;

        let reopened = FileKvStore::new(&tmp).await?;
        assert_eq!(reopened.get("a").await?.as_deref(), Some("10"));
        assert_eq!(reopened.get("b").await?, None);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_is_reported() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        tokio::fs::write(&tmp, b"{not json").await?;
        let err = FileKvStore::new(&tmp).await.err().expect("corrupt file must fail");
        assert!(matches!(err, StoreError::Deserialize { .. }));
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}
