//! Session state for the storefront app.
//! - `storage`: the key-value persistence adapter contract and its adapters.
//! - `draft`: multi-step form aggregation with explicit save/load/clear.
//! - `preference`: the persisted interface language.
//! - `provider`/`context`: explicit ownership and mount lifecycle of the stores.

pub mod errors;
pub mod storage;
pub mod draft;
pub mod preference;
pub mod provider;
pub mod context;
pub mod catalog;
pub mod runtime;

pub use context::AppContext;
pub use draft::{Draft, DraftStore, SubmitError, VendorSetup};
pub use errors::StoreError;
pub use preference::{LoadOutcome, PreferenceStore};
pub use provider::{Provider, ProviderState};
pub use storage::KeyValueStore;
