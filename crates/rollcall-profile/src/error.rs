//! Error types for the profile layer.
//!
//! Each crate in Rollcall defines its own error enum. A `ProfileError`
//! always means the problem is in the shape or encoding of profile data,
//! never in storage or session state.
//!
//! Note that failed *validation* is not a `ProfileError`: field-level
//! problems are reported as data through [`FieldErrors`](crate::FieldErrors).

/// Errors that can occur in the profile layer.
///
/// `#[derive(thiserror::Error)]` generates the `std::error::Error`
/// implementation, and each `#[error("...")]` attribute is the message
/// shown when the error is printed or logged.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    /// Serialization failed (turning a profile into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a profile).
    ///
    /// Common causes: a truncated or hand-edited file, or a stored record
    /// that no longer passes validation.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// Profile fields must be a JSON object; this names what was given
    /// instead (`"array"`, `"string"`, ...).
    #[error("profile fields must be an object, got {0}")]
    NotAnObject(&'static str),
}
