//! Profile-level persistence on top of a byte-level key-value store.
//!
//! The store only knows `key → bytes`. The session layer only wants
//! "the saved profile, if any". [`SessionVault`] connects the two: one
//! fixed key, one codec, and a `load`/`save` pair shaped like the
//! session's own lifecycle (save `None` to clear).

use rollcall_profile::{Codec, Profile};
use rollcall_store::KeyValueStore;

use crate::SessionError;

/// Reads and writes the current-session record.
///
/// # Example
///
/// ```rust
/// use rollcall_profile::{JsonCodec, Profile, ProfileFields};
/// use rollcall_session::SessionVault;
/// use rollcall_store::MemoryStore;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let vault = SessionVault::new(MemoryStore::new(), JsonCodec, "current_user");
/// let profile = Profile::try_from(&ProfileFields::student("Jo").with_id("u-1")).unwrap();
///
/// vault.save(Some(&profile)).await.unwrap();
/// assert_eq!(vault.load().await, Some(profile));
///
/// vault.save(None).await.unwrap();
/// assert_eq!(vault.load().await, None);
/// # }
/// ```
#[derive(Debug)]
pub struct SessionVault<S, C> {
    store: S,
    codec: C,
    key: String,
}

impl<S: KeyValueStore, C: Codec> SessionVault<S, C> {
    pub fn new(store: S, codec: C, key: impl Into<String>) -> Self {
        Self {
            store,
            codec,
            key: key.into(),
        }
    }

    /// The key the session record lives under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying key-value store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads the saved profile.
    ///
    /// "Nothing saved" and "couldn't read it" look the same to the caller:
    /// both are `None`. Failures are logged at `warn` so they aren't lost.
    pub async fn load(&self) -> Option<Profile> {
        match self.try_load().await {
            Ok(profile) => profile,
            Err(err) => {
                tracing::warn!(key = %self.key, %err, "discarding unreadable session record");
                None
            }
        }
    }

    /// Loads the saved profile, reporting why it couldn't be read.
    ///
    /// # Errors
    /// - [`SessionError::Storage`] — the store failed
    /// - [`SessionError::Profile`] — the bytes aren't a valid profile
    ///   (corrupt, or failing today's validation rules)
    pub async fn try_load(&self) -> Result<Option<Profile>, SessionError> {
        let Some(bytes) = self.store.get(&self.key).await? else {
            return Ok(None);
        };
        let profile = self.codec.decode::<Profile>(&bytes)?;
        Ok(Some(profile))
    }

    /// Saves `profile`, or clears the record when given `None`.
    ///
    /// Clearing removes the key outright, so the next [`load`](Self::load)
    /// sees "nothing saved".
    ///
    /// # Errors
    /// - [`SessionError::Profile`] — encoding failed
    /// - [`SessionError::Storage`] — the store failed
    pub async fn save(&self, profile: Option<&Profile>) -> Result<(), SessionError> {
        match profile {
            Some(profile) => {
                let bytes = self.codec.encode(profile)?;
                self.store.set(&self.key, bytes).await?;
            }
            None => self.store.remove(&self.key).await?,
        }
        Ok(())
    }
}
