//! Codec trait and implementations for persisting profiles as bytes.
//!
//! The storage layer only knows about bytes; the session layer only knows
//! about [`Profile`](crate::Profile)s. A codec sits between them. Swapping
//! the on-disk format means writing a new [`Codec`], nothing else.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProfileError;

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// ## Trait bounds
///
/// - `Send + Sync` → a session store holding a codec can be shared
///   between Tokio tasks.
/// - `'static` → the codec owns everything it needs.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProfileError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProfileError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProfileError::Decode` if the bytes are malformed or don't
    /// match the expected type. For [`Profile`](crate::Profile) that
    /// includes records which no longer pass validation.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProfileError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// JSON keeps the stored session human-readable, which is handy when
/// debugging a device's state by hand.
///
/// This is behind the `json` feature flag (enabled by default).
///
/// ## Example
///
/// ```rust
/// use rollcall_profile::{Codec, JsonCodec, Profile, ProfileFields};
///
/// let codec = JsonCodec;
/// let profile = Profile::try_from(&ProfileFields::admin("Admin").with_id("a-1")).unwrap();
///
/// let bytes = codec.encode(&profile).unwrap();
/// let decoded: Profile = codec.decode(&bytes).unwrap();
/// assert_eq!(profile, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProfileError> {
        serde_json::to_vec(value).map_err(ProfileError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProfileError> {
        serde_json::from_slice(data).map_err(ProfileError::Decode)
    }
}
