/// Errors that can occur in the storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The key can't be used by this store (empty, or contains characters
    /// that aren't safe in a file name).
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),

    /// Reading, writing, or removing a stored value failed.
    #[error("{op} failed for key {key:?}: {source}")]
    Io {
        op: &'static str,
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The backing store can't be reached at all.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
