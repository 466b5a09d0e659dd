//! Explicit application context: the adapter plus the providers of the two
//! stores, built in a fixed order at startup and torn down at shutdown.

use std::sync::Arc;

use common::Language;
use configs::AppConfig;
use tracing::{info, warn};

use crate::draft::DraftStore;
use crate::errors::StoreError;
use crate::preference::{LoadOutcome, PreferenceStore};
use crate::provider::Provider;
use crate::runtime;
use crate::storage::{FileKvStore, KeyValueStore};

/// Keys and defaults the stores are created with.
#[derive(Debug, Clone)]
pub struct ContextOptions {
    pub draft_key: String,
    pub language_key: String,
    pub default_language: Language,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self { draft_key: "setup_draft".into(), language_key: "app_language".into(), default_language: Language::En }
    }
}

impl ContextOptions {
    pub fn from_config(cfg: &AppConfig) -> anyhow::Result<Self> {
        Ok(Self {
            draft_key: cfg.storage.draft_key.clone(),
            language_key: cfg.storage.language_key.clone(),
            default_language: cfg.locale.language()?,
        })
    }
}

pub struct AppContext {
    kv: Arc<dyn KeyValueStore>,
    drafts: Provider<DraftStore>,
    preferences: Provider<PreferenceStore>,
}

impl AppContext {
    /// Build the stores on `kv`, initialize the language and mount both providers.
    ///
    /// The language load result is handed back next to the context: a storage
    /// error there does not prevent the session from starting on the default.
    pub async fn mount(kv: Arc<dyn KeyValueStore>, opts: ContextOptions) -> (Self, Result<LoadOutcome, StoreError>) {
        let ctx = Self {
            kv: kv.clone(),
            drafts: Provider::new("SetupProvider"),
            preferences: Provider::new("LanguageProvider"),
        };

        let preferences = Arc::new(PreferenceStore::new(kv.clone(), opts.language_key, opts.default_language));
        let language = preferences.initialize().await;
        if let Err(e) = &language {
            warn!(error = %e, code = e.code(), "starting with default language");
        }
        ctx.preferences.mount(preferences);
        ctx.drafts.mount(Arc::new(DraftStore::new(kv, opts.draft_key)));
        (ctx, language)
    }

    /// Open the file-backed device store described by `cfg` and mount on it.
    pub async fn open(cfg: &AppConfig) -> anyhow::Result<(Self, Result<LoadOutcome, StoreError>)> {
        runtime::ensure_env(&cfg.storage.data_dir).await?;
        let path = cfg.storage.file_path();
        let kv = FileKvStore::new(&path).await?;
        info!(path = %path.display(), "device store opened");
        Ok(Self::mount(kv, ContextOptions::from_config(cfg)?).await)
    }

    pub fn drafts(&self) -> Result<Arc<DraftStore>, StoreError> {
        self.drafts.get()
    }

    pub fn preferences(&self) -> Result<Arc<PreferenceStore>, StoreError> {
        self.preferences.get()
    }

    pub fn draft_provider(&self) -> &Provider<DraftStore> {
        &self.drafts
    }

    pub fn preference_provider(&self) -> &Provider<PreferenceStore> {
        &self.preferences
    }

    pub fn storage(&self) -> Arc<dyn KeyValueStore> {
        self.kv.clone()
    }

    /// Unmount both providers; stores already handed out stay usable by their holders.
    pub fn shutdown(&self) {
        self.drafts.unmount();
        self.preferences.unmount();
        info!("context shut down");
    }
}
