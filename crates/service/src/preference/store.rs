use std::sync::Arc;

use arc_swap::ArcSwap;
use common::Language;
use tokio::sync::{watch, Mutex};
use tracing::{info, instrument, warn};

use crate::errors::StoreError;
use crate::storage::kv::KeyValueStore;

/// What `PreferenceStore::initialize` found under the language key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Restored(Language),
    Missing,
    /// A value is stored but is not a recognized code; the default stays active.
    Unrecognized(String),
}

/// Holds the selected language for the session and persists changes.
///
/// The active value lives in an `ArcSwap` so reads never wait on storage:
/// `set_language` publishes the new value before its write is issued and
/// does not roll it back if the write fails.
pub struct PreferenceStore {
    kv: Arc<dyn KeyValueStore>,
    key: String,
    active: ArcSwap<Language>,
    ready: watch::Sender<bool>,
    writer: Mutex<()>,
}

impl PreferenceStore {
    pub fn new(kv: Arc<dyn KeyValueStore>, key: impl Into<String>, default: Language) -> Self {
        let (ready, _) = watch::channel(false);
        Self { kv, key: key.into(), active: ArcSwap::from_pointee(default), ready, writer: Mutex::new(()) }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the persisted language once.
    ///
    /// The store is ready afterwards whatever the outcome. An adapter error is
    /// returned as `Err` (not folded into `Missing`) so the caller can tell an
    /// unavailable store from a first launch; the default stays active.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use common::Language;
    /// use service::preference::{LoadOutcome, PreferenceStore};
    /// use service::storage::MemoryKvStore;
    /// let store = PreferenceStore::new(Arc::new(MemoryKvStore::new()), "app_language", Language::En);
    /// let outcome = tokio_test::block_on(store.initialize()).unwrap();
    /// assert_eq!(outcome, LoadOutcome::Missing);
    /// assert!(store.is_ready());
    /// assert_eq!(store.language(), Language::En);
    /// ```
    #[instrument(skip(self), fields(key = %self.key))]
    pub async fn initialize(&self) -> Result<LoadOutcome, StoreError> {
        let read = self.kv.get(&self.key).await;
        let outcome = match read {
            Ok(Some(raw)) => match raw.parse::<Language>() {
                Ok(lang) => {
                    self.active.store(Arc::new(lang));
                    LoadOutcome::Restored(lang)
                }
                Err(_) => {
                    warn!(value = %raw, "stored language not recognized; keeping default");
                    LoadOutcome::Unrecognized(raw)
                }
            },
            Ok(None) => LoadOutcome::Missing,
            Err(e) => {
                warn!(error = %e, "language_load_failed");
                self.ready.send_replace(true);
                return Err(e);
            }
        };
        self.ready.send_replace(true);
        info!(language = %self.language(), ?outcome, "language_initialized");
        Ok(outcome)
    }

    pub fn is_ready(&self) -> bool {
        *self.ready.borrow()
    }

    /// Resolve once `initialize` has completed.
    pub async fn wait_ready(&self) {
        let mut rx = self.ready.subscribe();
        // the sender lives in self, so the channel cannot close while we wait
        let _ = rx.wait_for(|ready| *ready).await;
    }

    pub fn language(&self) -> Language {
        **self.active.load()
    }

    /// Make `language` active, then persist it.
    ///
    /// Overlapping calls are applied one at a time, so the last call to take
    /// the writer lock wins both in memory and in storage. The in-memory value
    /// is not restored if the write fails, so memory and storage can disagree
    /// until the next successful write or restart.
    #[instrument(skip(self, language), fields(key = %self.key, language = %language))]
    pub async fn set_language(&self, language: Language) -> Result<(), StoreError> {
        let _guard = self.writer.lock().await;
        self.active.store(Arc::new(language));
        if let Err(e) = self.kv.set(&self.key, language.code().to_string()).await {
            warn!(error = %e, "language_persist_failed");
            return Err(e);
        }
        info!("language_saved");
        Ok(())
    }

    /// Parse a code and apply it; unknown codes are rejected before anything changes.
    pub async fn set_language_code(&self, code: &str) -> Result<(), StoreError> {
        let language = code.parse::<Language>()?;
        self.set_language(language).await
    }
}
