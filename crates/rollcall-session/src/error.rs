//! Error types for the session layer.

use rollcall_profile::{FieldErrors, ProfileError};
use rollcall_store::StorageError;

/// Errors that can occur during session management.
///
/// Only the first two variants ever come back from
/// [`SessionStore`](crate::SessionStore) operations. Storage and codec
/// failures are logged and swallowed there, and surface only to callers
/// using a [`SessionVault`](crate::SessionVault) directly.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The candidate or merged profile broke one or more field rules.
    /// The map says which fields and why; show it next to the form.
    #[error("invalid profile: {0}")]
    Invalid(FieldErrors),

    /// A profile update was attempted with nobody signed in.
    #[error("no user is signed in")]
    NotSignedIn,

    /// The key-value store failed to read, write, or remove the session.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The stored session couldn't be encoded or decoded.
    #[error(transparent)]
    Profile(#[from] ProfileError),
}

impl SessionError {
    /// The field errors, if this is a validation failure.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Invalid(errors) => Some(errors),
            _ => None,
        }
    }
}
