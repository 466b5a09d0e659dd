//! Persisted interface language.

pub mod store;

pub use store::{LoadOutcome, PreferenceStore};
