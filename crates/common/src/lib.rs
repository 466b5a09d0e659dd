//! Shared building blocks for the storefront workspace: logging setup,
//! runtime directory checks and the catalog/user types exchanged with the API.

pub mod types;
pub mod env;

pub mod utils {
    pub mod logging;
}

pub use types::{Category, Language, Product, Role, UnknownLanguage};
