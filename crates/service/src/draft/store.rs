use std::future::Future;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};

use crate::draft::model::Draft;
use crate::errors::StoreError;
use crate::storage::kv::KeyValueStore;

/// Outcome of `DraftStore::submit_with` when it does not succeed.
#[derive(Debug, Error)]
pub enum SubmitError<E> {
    /// The submit function failed; the draft is kept for a later attempt.
    #[error("submission failed: {0}")]
    Rejected(E),
    /// The submission went through but the persisted draft could not be removed.
    #[error("submitted, but the draft could not be cleared: {0}")]
    Cleanup(StoreError),
}

/// Aggregates partial form input across screens and persists it as one unit
/// under a fixed key.
///
/// `update` only touches memory. `save_draft`, `load_draft` and `clear` go to
/// the adapter and are serialized against each other, so two overlapping saves
/// land in the order they were issued.
pub struct DraftStore {
    kv: Arc<dyn KeyValueStore>,
    key: String,
    draft: RwLock<Draft>,
    writer: Mutex<()>,
}

impl DraftStore {
    pub fn new(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self { kv, key: key.into(), draft: RwLock::new(Draft::new()), writer: Mutex::new(()) }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Shallow-merge `partial` into the in-memory draft; `partial` wins on collision.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::draft::{Draft, DraftStore};
    /// use service::storage::MemoryKvStore;
    /// use serde_json::json;
    /// let store = DraftStore::new(Arc::new(MemoryKvStore::new()), "setup_draft");
    /// tokio_test::block_on(async {
    ///     store.update(Draft::from_value(json!({"name": "A"})).unwrap()).await;
    ///     store.update(Draft::from_value(json!({"email": "b@x.com"})).unwrap()).await;
    ///     store.update(Draft::from_value(json!({"name": "B"})).unwrap()).await;
    ///     assert_eq!(store.snapshot().await.into_value(), json!({"name": "B", "email": "b@x.com"}));
    /// });
    /// ```
    pub async fn update(&self, partial: Draft) {
        debug!(key = %self.key, fields = partial.len(), "draft_merge");
        self.draft.write().await.merge(partial);
    }

    /// Merge a raw JSON value; it must be an object.
    pub async fn update_value(&self, partial: Value) -> Result<(), StoreError> {
        self.update(Draft::from_value(partial)?).await;
        Ok(())
    }

    /// Merge a typed form view such as `VendorSetup`.
    pub async fn update_with<T: Serialize>(&self, view: &T) -> Result<(), StoreError> {
        self.update(Draft::from_serialize(view)?).await;
        Ok(())
    }

    pub async fn snapshot(&self) -> Draft {
        self.draft.read().await.clone()
    }

    pub async fn field(&self, name: &str) -> Option<Value> {
        self.draft.read().await.get(name).cloned()
    }

    pub async fn typed<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        self.draft.read().await.typed()
    }

    pub async fn is_empty(&self) -> bool {
        self.draft.read().await.is_empty()
    }

    /// Write the current draft under the draft key. Adapter errors propagate.
    #[instrument(skip(self), fields(key = %self.key))]
    pub async fn save_draft(&self) -> Result<(), StoreError> {
        let _guard = self.writer.lock().await;
        let snapshot = self.draft.read().await.clone();
        let text = snapshot.to_text(&self.key)?;
        if let Err(e) = self.kv.set(&self.key, text).await {
            warn!(error = %e, "draft_save_failed");
            return Err(e);
        }
        info!(fields = snapshot.len(), "draft_saved");
        Ok(())
    }

    /// Replace the in-memory draft with the persisted one.
    ///
    /// Returns `false` and leaves memory untouched when nothing was saved.
    /// Corrupt stored text is an error and also leaves memory untouched.
    #[instrument(skip(self), fields(key = %self.key))]
    pub async fn load_draft(&self) -> Result<bool, StoreError> {
        let _guard = self.writer.lock().await;
        let Some(text) = self.kv.get(&self.key).await? else {
            debug!("no persisted draft");
            return Ok(false);
        };
        let loaded = Draft::from_text(&self.key, &text).map_err(|e| {
            warn!(error = %e, "draft_load_failed");
            e
        })?;
        info!(fields = loaded.len(), "draft_loaded");
        *self.draft.write().await = loaded;
        Ok(true)
    }

    /// Remove the persisted draft and empty the in-memory one.
    ///
    /// Memory is emptied even when the removal fails; the removal error is
    /// still returned.
    #[instrument(skip(self), fields(key = %self.key))]
    pub async fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.writer.lock().await;
        self.clear_locked().await
    }

    async fn clear_locked(&self) -> Result<(), StoreError> {
        let removed = self.kv.remove(&self.key).await;
        *self.draft.write().await = Draft::new();
        match &removed {
            Ok(()) => info!(key = %self.key, "draft_cleared"),
            Err(e) => warn!(key = %self.key, error = %e, "draft_clear_failed"),
        }
        removed
    }

    /// Hand a snapshot of the draft to `submit`; clear the draft once it succeeds.
    ///
    /// A failed submission keeps both the in-memory and the persisted draft.
    #[instrument(skip(self, submit), fields(key = %self.key))]
    pub async fn submit_with<F, Fut, T, E>(&self, submit: F) -> Result<T, SubmitError<E>>
    where
        F: FnOnce(Draft) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let _guard = self.writer.lock().await;
        let snapshot = self.draft.read().await.clone();
        match submit(snapshot).await {
            Ok(out) => {
                info!("draft_submitted");
                self.clear_locked().await.map_err(SubmitError::Cleanup)?;
                Ok(out)
            }
            Err(e) => {
                warn!(error = %e, "draft_submit_failed");
                Err(SubmitError::Rejected(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::vendor::VendorSetup;
    use crate::storage::MemoryKvStore;
    use serde_json::json;

    fn store() -> (Arc<MemoryKvStore>, DraftStore) {
        let kv = Arc::new(MemoryKvStore::new());
        let store = DraftStore::new(kv.clone(), "setup_draft");
        (kv, store)
    }

    fn draft(v: Value) -> Draft {
        Draft::from_value(v).unwrap()
    }

    #[tokio::test]
    async fn update_merges_in_order() {
        let (_, store) = store();
        store.update(draft(json!({"name": "A"}))).await;
        store.update(draft(json!({"email": "b@x.com"}))).await;
        assert_eq!(store.snapshot().await.into_value(), json!({"name": "A", "email": "b@x.com"}));

        store.update(draft(json!({"name": "B"}))).await;
        assert_eq!(store.snapshot().await.into_value(), json!({"name": "B", "email": "b@x.com"}));
    }

    #[tokio::test]
    async fn update_does_not_persist() -> Result<(), anyhow::Error> {
        let (kv, store) = store();
        store.update(draft(json!({"name": "A"}))).await;
        assert_eq!(kv.get("setup_draft").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn save_then_load_restores_saved_value() -> Result<(), anyhow::Error> {
        let (_, store) = store();
        store.update(draft(json!({"name": "A", "tags": ["x", "y"], "n": 3}))).await;
        let before = store.snapshot().await;
        store.save_draft().await?;

        assert!(store.load_draft().await?);
        assert_eq!(store.snapshot().await, before);
        Ok(())
    }

    #[tokio::test]
    async fn load_replaces_instead_of_merging() -> Result<(), anyhow::Error> {
        let (_, store) = store();
        store.update(draft(json!({"name": "A"}))).await;
        store.save_draft().await?;
        store.update(draft(json!({"email": "later@x.com"}))).await;

        store.load_draft().await?;
        assert_eq!(store.snapshot().await.into_value(), json!({"name": "A"}));
        Ok(())
    }

    #[tokio::test]
    async fn load_without_saved_draft_keeps_memory() -> Result<(), anyhow::Error> {
        let (_, store) = store();
        store.update(draft(json!({"name": "A"}))).await;
        assert!(!store.load_draft().await?);
        assert_eq!(store.snapshot().await.into_value(), json!({"name": "A"}));
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_persisted_text_is_an_error() -> Result<(), anyhow::Error> {
        let (kv, store) = store();
        store.update(draft(json!({"name": "A"}))).await;
        kv.set("setup_draft", "not json".into()).await?;

        let err = store.load_draft().await.unwrap_err();
        assert!(matches!(err, StoreError::Deserialize { .. }));
        assert_eq!(store.field("name").await, Some(json!("A")));
        Ok(())
    }

    #[tokio::test]
    async fn save_failure_propagates() {
        let (kv, store) = store();
        store.update(draft(json!({"name": "A"}))).await;
        kv.fail_writes(true);
        assert!(store.save_draft().await.unwrap_err().is_storage());
        assert_eq!(store.field("name").await, Some(json!("A")));
    }

    #[tokio::test]
    async fn clear_resets_memory_and_storage() -> Result<(), anyhow::Error> {
        let (kv, store) = store();
        store.update(draft(json!({"name": "A"}))).await;
        store.save_draft().await?;

        store.clear().await?;
        assert!(store.is_empty().await);
        assert_eq!(kv.get("setup_draft").await?, None);

        // clearing an empty store is fine too
        store.clear().await?;
        Ok(())
    }

    #[tokio::test]
    async fn clear_failure_still_empties_memory() {
        let (kv, store) = store();
        store.update(draft(json!({"name": "A"}))).await;
        kv.fail_writes(true);
        assert!(store.clear().await.is_err());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn typed_views_merge_without_erasing() -> Result<(), anyhow::Error> {
        let (_, store) = store();
        store.update_with(&VendorSetup { store_name: Some("Ada's".into()), ..Default::default() }).await?;
        store.update_with(&VendorSetup { email: Some("ada@example.com".into()), ..Default::default() }).await?;

        let view: VendorSetup = store.typed().await?;
        assert_eq!(view.store_name.as_deref(), Some("Ada's"));
        assert_eq!(view.email.as_deref(), Some("ada@example.com"));
        Ok(())
    }

    #[tokio::test]
    async fn successful_submit_clears_the_draft() -> Result<(), anyhow::Error> {
        let (kv, store) = store();
        store.update(draft(json!({"name": "A"}))).await;
        store.save_draft().await?;

        let seen = store
            .submit_with(|d| async move { Ok::<_, String>(d.len()) })
            .await?;
        assert_eq!(seen, 1);
        assert!(store.is_empty().await);
        assert_eq!(kv.get("setup_draft").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn failed_submit_keeps_the_draft() -> Result<(), anyhow::Error> {
        let (kv, store) = store();
        store.update(draft(json!({"name": "A"}))).await;
        store.save_draft().await?;

        let err = store
            .submit_with(|_| async { Err::<(), _>("offline".to_string()) })
            .await
            .unwrap_err();
        assert!(matches!(err, SubmitError::Rejected(ref m) if m == "offline"));
        assert_eq!(store.field("name").await, Some(json!("A")));
        assert!(kv.get("setup_draft").await?.is_some());
        Ok(())
    }
}
