//! Scope-bound owners of the stores.
//!
//! A `Provider` is mounted with its store when the owning scope starts and
//! unmounted when it ends. Consumers ask the provider for the store and must
//! handle the not-mounted case; nothing here panics on misuse.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use tracing::{debug, info};

use crate::errors::StoreError;

/// What a consumer sees when it asks a provider for its store.
pub enum ProviderState<T> {
    NotMounted,
    Ready(Arc<T>),
}

impl<T> ProviderState<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, ProviderState::Ready(_))
    }
}

pub struct Provider<T> {
    name: &'static str,
    slot: ArcSwapOption<T>,
}

impl<T> Provider<T> {
    pub fn new(name: &'static str) -> Self {
        Self { name, slot: ArcSwapOption::from(None) }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Install `store`, returning whatever was mounted before.
    pub fn mount(&self, store: Arc<T>) -> Option<Arc<T>> {
        let previous = self.slot.swap(Some(store));
        info!(provider = self.name, replaced = previous.is_some(), "provider_mounted");
        previous
    }

    pub fn unmount(&self) -> Option<Arc<T>> {
        let previous = self.slot.swap(None);
        debug!(provider = self.name, was_mounted = previous.is_some(), "provider_unmounted");
        previous
    }

    pub fn state(&self) -> ProviderState<T> {
        match self.slot.load_full() {
            Some(store) => ProviderState::Ready(store),
            None => ProviderState::NotMounted,
        }
    }

    /// The mounted store, or `StoreError::MissingProvider` naming this provider.
    pub fn get(&self) -> Result<Arc<T>, StoreError> {
        self.slot.load_full().ok_or(StoreError::MissingProvider(self.name))
    }
}
