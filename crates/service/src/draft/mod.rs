//! Multi-step form drafts.
//!
//! Form screens merge partial field maps into a `DraftStore`; the aggregate
//! is persisted only on explicit save and replaced wholesale on load.

pub mod model;
pub mod store;
pub mod vendor;

pub use model::Draft;
pub use store::{DraftStore, SubmitError};
pub use vendor::{SetupStep, VendorSetup};
