//! Durable key-value storage for every persisted table of the engine.
//!
//! The engine never keeps an authoritative in-memory copy of its tables: each
//! operation re-reads the records it needs right before acting. Everything is
//! therefore funneled through a [`KeyValueStore`], an async get/set/remove
//! interface over named string records.
//!
//! # Available types
//!
//! - [`KeyValueStore`]: Trait for any storage backend.
//! - [`RecordStore`]: Typed JSON records on top of a [`KeyValueStore`].
//! - [`InMemoryStore`]: Ephemeral backend (tests, private sessions).
//! - [`SqliteStore`]: SQLite-backed persistent backend.
//!
//! # Record layout
//!
//! One record per table entry, so that writers of unrelated entries never
//! share a read-modify-write cycle. See [`keys`].
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use gosub_containers::storage::{RecordStore, SqliteStore};
//!
//! let store = RecordStore::new(Arc::new(SqliteStore::new("containers.db").unwrap()));
//! ```

use std::sync::Arc;

/// Key/value storage interface.
pub mod area;
/// Record key layout.
pub mod keys;
/// Typed JSON record access.
pub mod records;

/// Backends.
pub mod local {
    /// In-memory storage implementation.
    pub mod in_memory;
    /// SQLite-backed storage implementation.
    #[cfg(feature = "sqlite_store")]
    pub mod sqlite_store;
}

pub use area::KeyValueStore;
pub use local::in_memory::InMemoryStore;
#[cfg(feature = "sqlite_store")]
pub use local::sqlite_store::SqliteStore;
pub use records::RecordStore;

/// Shared handle to a key-value backend.
pub type KeyValueHandle = Arc<dyn KeyValueStore>;
