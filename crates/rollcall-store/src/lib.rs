//! Key-value persistence abstraction for Rollcall.
//!
//! Provides the [`KeyValueStore`] trait: durable, process-external storage
//! of byte values under string keys. The session layer writes one record
//! through it and reads it back on the next start.
//!
//! Implementations:
//! - [`MemoryStore`] — in-process map. Clones share storage, so two
//!   session stores built over clones of one `MemoryStore` behave like two
//!   runs of the app against the same device storage.
//! - [`FileStore`] — one file per key in a directory (feature `fs`,
//!   enabled by default).
//!
//! # Feature Flags
//!
//! - `fs` (default) — file-backed store via `tokio::fs`

mod error;
#[cfg(feature = "fs")]
mod file;
mod memory;

pub use error::StorageError;
#[cfg(feature = "fs")]
pub use file::FileStore;
pub use memory::MemoryStore;

use std::future::Future;

/// Asynchronous get/set/remove against a durable key-value store.
///
/// # Trait bounds
///
/// - `Send + Sync + 'static` → a store lives inside a long-lived session
///   store that may be shared across Tokio tasks.
/// - Each returned future is `Send`, so session operations can be awaited
///   from spawned tasks. Implementations can still be written with plain
///   `async fn`.
///
/// # Contract
///
/// - `get` of a key that was never set, or was removed, is `Ok(None)`.
/// - `set` replaces any previous value.
/// - `remove` of a missing key is `Ok(())`.
pub trait KeyValueStore: Send + Sync + 'static {
    /// Reads the value stored under `key`.
    fn get(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, StorageError>> + Send;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(
        &self,
        key: &str,
        value: Vec<u8>,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Deletes the value stored under `key`.
    fn remove(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// Shared stores work wherever a store is expected.
impl<S: KeyValueStore> KeyValueStore for std::sync::Arc<S> {
    fn get(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, StorageError>> + Send {
        (**self).get(key)
    }

    fn set(
        &self,
        key: &str,
        value: Vec<u8>,
    ) -> impl Future<Output = Result<(), StorageError>> + Send {
        (**self).set(key, value)
    }

    fn remove(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<(), StorageError>> + Send {
        (**self).remove(key)
    }
}
