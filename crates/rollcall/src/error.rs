//! Unified error type for Rollcall.

use rollcall_profile::ProfileError;
use rollcall_session::SessionError;
use rollcall_store::StorageError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `rollcall` facade you deal with this single error type
/// instead of importing errors from each sub-crate. The `#[from]`
/// attribute on each variant generates a `From` impl, so `?` converts
/// sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum RollcallError {
    /// A storage-level error (directory, read, write).
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A profile-level error (encode, decode, malformed fields).
    #[error(transparent)]
    Profile(#[from] ProfileError),

    /// A session-level error (invalid profile, nobody signed in).
    #[error(transparent)]
    Session(#[from] SessionError),
}

#[cfg(test)]
mod tests {
    use rollcall_profile::{FieldErrors, field};

    use super::*;

    #[test]
    fn test_from_storage_error() {
        let err = StorageError::InvalidKey("a/b".into());
        let rollcall_err: RollcallError = err.into();
        assert!(matches!(rollcall_err, RollcallError::Storage(_)));
        assert!(rollcall_err.to_string().contains("a/b"));
    }

    #[test]
    fn test_from_profile_error() {
        let err = ProfileError::NotAnObject("array");
        let rollcall_err: RollcallError = err.into();
        assert!(matches!(rollcall_err, RollcallError::Profile(_)));
    }

    #[test]
    fn test_from_session_error() {
        let err = SessionError::Invalid(FieldErrors::single(field::NAME, "Name is required"));
        let rollcall_err: RollcallError = err.into();
        assert!(matches!(rollcall_err, RollcallError::Session(_)));
        assert!(rollcall_err.to_string().contains("name: Name is required"));
    }
}
