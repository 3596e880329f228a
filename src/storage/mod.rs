//! Storage Module
//!
//! Synchronous durable storage primitive consumed by the TTL store.
//! Namespacing is by key-prefix convention; the backend itself is flat.

mod backend;
mod memory;

pub use backend::{StorageBackend, StorageError};
pub use memory::MemoryBackend;
