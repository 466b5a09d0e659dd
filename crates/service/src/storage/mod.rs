//! Storage abstractions for the stores
//!
//! `KeyValueStore` is the capability every store is handed; the adapters here
//! are the device-file stand-in and an in-memory one for tests and ephemeral
//! sessions.

pub mod kv;
pub mod file;
pub mod memory;

pub use file::FileKvStore;
pub use kv::KeyValueStore;
pub use memory::MemoryKvStore;
