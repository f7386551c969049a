//! `RollcallBuilder`: configure and open a ready-to-use session store.
//!
//! This is the entry point for applications. It ties the layers together
//! (store → profile codec → session) and runs the initial restore, so the
//! store it hands back is never in the loading state.

use std::path::PathBuf;

use rollcall_session::{SessionConfig, SessionStore};
#[cfg(feature = "fs")]
use rollcall_store::FileStore;
use rollcall_store::KeyValueStore;

#[cfg(feature = "fs")]
use crate::RollcallError;

/// Directory used by [`RollcallBuilder::open`] unless configured otherwise.
pub const DEFAULT_DATA_DIR: &str = ".rollcall";

/// Builder for configuring and opening a session store.
///
/// # Example
///
/// ```rust,no_run
/// use rollcall::prelude::*;
///
/// # async fn run() -> Result<(), RollcallError> {
/// let session = RollcallBuilder::new()
///     .data_dir("/var/lib/campus")
///     .open()
///     .await?;
///
/// println!("hello, {}", session.display_name());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RollcallBuilder {
    data_dir: PathBuf,
    session_config: SessionConfig,
}

impl RollcallBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            session_config: SessionConfig::default(),
        }
    }

    /// Sets the directory the file store keeps the session in.
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Sets the key the session is stored under.
    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.session_config.storage_key = key.into();
        self
    }

    /// Replaces the whole session configuration.
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = config;
        self
    }

    /// Opens a file-backed session store in the data directory and
    /// restores any saved session.
    ///
    /// # Errors
    /// Returns [`RollcallError::Storage`] if the storage key can't be used
    /// as a file name, or the data directory can't be created. Problems
    /// with the saved session itself are not errors: the store just starts
    /// signed out.
    #[cfg(feature = "fs")]
    pub async fn open(self) -> Result<SessionStore<FileStore>, RollcallError> {
        FileStore::check_key(&self.session_config.storage_key)?;
        let store = FileStore::open(&self.data_dir).await?;
        Ok(self.open_with(store).await)
    }

    /// Opens a session store over any key-value store and restores any
    /// saved session.
    pub async fn open_with<S: KeyValueStore>(self, store: S) -> SessionStore<S> {
        let session = SessionStore::new(store, self.session_config);
        session.initialize().await;
        tracing::info!(
            authenticated = session.is_authenticated(),
            role = session.role_label(),
            "session store ready"
        );
        session
    }
}

impl Default for RollcallBuilder {
    fn default() -> Self {
        Self::new()
    }
}
