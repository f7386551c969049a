//! File-backed key-value store using `tokio::fs`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::io::AsyncWriteExt;

use crate::{KeyValueStore, StorageError};

/// Counter for unique temp-file names within this process.
static NEXT_TEMP_ID: AtomicU64 = AtomicU64::new(1);

/// A [`KeyValueStore`] that keeps each key in its own file inside a
/// directory.
///
/// Writes go to a temp file that is synced to disk and then renamed over
/// the target, so a crash mid-write leaves either the old value or the new
/// one, never half of each. Temp files orphaned by a crash between the
/// write and the rename are removed the next time the store is opened.
///
/// Keys become file names, so they are restricted to ASCII letters,
/// digits, `.`, `_` and `-`, and may not start with `.`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    ///
    /// Leftover temp files from interrupted writes are deleted. Don't open
    /// two stores on one directory while either is writing.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        let dir_error = |op: &'static str| {
            let dir = dir.display().to_string();
            move |source: std::io::Error| StorageError::Io { op, key: dir, source }
        };

        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(dir_error("create directory"))?;

        let mut removed = 0usize;
        let mut entries = tokio::fs::read_dir(&dir)
            .await
            .map_err(dir_error("list directory"))?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(dir_error("list directory"))?
        {
            if !is_temp_file_name(&entry.file_name().to_string_lossy()) {
                continue;
            }
            match tokio::fs::remove_file(entry.path()).await {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(path = %entry.path().display(), %e, "failed to remove stale temp file");
                }
            }
        }

        tracing::debug!(dir = %dir.display(), removed, "file store opened");
        Ok(Self { dir })
    }

    /// Checks that `key` can be used as a file name in this store.
    ///
    /// Every operation checks its key anyway; this lets callers reject a
    /// bad key up front instead of on the first write.
    pub fn check_key(key: &str) -> Result<(), StorageError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-'));
        if valid {
            Ok(())
        } else {
            Err(StorageError::InvalidKey(key.to_string()))
        }
    }

    /// The directory holding the stored values.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        Self::check_key(key)?;
        Ok(self.dir.join(key))
    }
}

/// Temp files are named `.{key}.{n}.tmp`. Valid keys never start with `.`,
/// so no stored value matches.
fn is_temp_file_name(name: &str) -> bool {
    name.starts_with('.') && name.ends_with(".tmp")
}

/// Writes `value` to a new file at `path` and flushes it to disk.
async fn write_synced(path: &Path, value: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(value).await?;
    file.sync_all().await
}

fn io_error(op: &'static str, key: &str) -> impl FnOnce(std::io::Error) -> StorageError {
    let key = key.to_string();
    move |source| StorageError::Io { op, key, source }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error("read", key)(e)),
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let temp = self.dir.join(format!(
            ".{key}.{}.tmp",
            NEXT_TEMP_ID.fetch_add(1, Ordering::Relaxed)
        ));

        if let Err(e) = write_synced(&temp, &value).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(io_error("write", key)(e));
        }

        if let Err(e) = tokio::fs::rename(&temp, &path).await {
            // Best effort: don't leave the temp file behind.
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(io_error("rename", key)(e));
        }

        tracing::trace!(key, bytes = value.len(), "value written");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error("remove", key)(e)),
        }
    }
}
