//! The session store: the one place the current user lives.
//!
//! This is the central piece of the session layer. It's responsible for:
//! - Restoring the saved session when the app starts
//! - Validating and applying sign-in, sign-out, and profile updates
//! - Writing every change through to durable storage
//! - Answering role queries for the UI
//!
//! # Concurrency note
//!
//! Mutations (`initialize`, `sign_in`, `sign_out`, `update_profile`) take
//! a writer lock that is held until persistence finishes, so two of them
//! never interleave. Reads never take that lock: the session slot lives
//! in a `tokio::sync::watch` channel and every query borrows its current
//! value. Memory is updated *before* the save starts, so while a slow
//! save is in flight, readers already see the new state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use rollcall_profile::{Codec, JsonCodec, Profile, ProfileFields, field};
use rollcall_store::KeyValueStore;
use tokio::sync::{Mutex, watch};

use crate::{SessionConfig, SessionError, SessionSnapshot, SessionVault};

/// Holds the current user's session and keeps it in sync with storage.
///
/// ## Lifecycle
///
/// ```text
/// new() ──→ initialize() ──→ sign_in() ──→ update_profile()* ──→ sign_out()
///  │            │                │                                   │
///  ▼            ▼                ▼                                   ▼
/// [loading]  [restored or   [Authenticated]                  [Unauthenticated]
///             Unauthenticated]
/// ```
///
/// Share it between tasks with `Arc<SessionStore<_>>`; every method
/// takes `&self`.
pub struct SessionStore<S: KeyValueStore, C: Codec = JsonCodec> {
    /// The session slot. The sender side is also what readers borrow.
    state: watch::Sender<SessionSnapshot>,

    /// Serializes mutations, including their persistence step.
    writer: Mutex<()>,

    /// Durable copy of the session.
    vault: SessionVault<S, C>,

    config: SessionConfig,
}

impl<S: KeyValueStore> SessionStore<S> {
    /// Creates a store that persists sessions as JSON.
    ///
    /// The store starts in the loading state. Call
    /// [`initialize`](Self::initialize) once before using it.
    pub fn new(store: S, config: SessionConfig) -> Self {
        Self::with_codec(store, JsonCodec, config)
    }
}

impl<S: KeyValueStore, C: Codec> SessionStore<S, C> {
    /// Creates a store that persists sessions with the given codec.
    pub fn with_codec(store: S, codec: C, config: SessionConfig) -> Self {
        let (state, _) = watch::channel(SessionSnapshot::initial());
        Self {
            state,
            writer: Mutex::new(()),
            vault: SessionVault::new(store, codec, config.storage_key.clone()),
            config,
        }
    }

    // =====================================================================
    // Mutations
    // =====================================================================

    /// Restores the saved session, then clears the loading flag.
    ///
    /// A missing, unreadable, or invalid record all mean "nobody signed
    /// in"; this never fails. Calling it again re-reads storage.
    pub async fn initialize(&self) {
        let _writer = self.writer.lock().await;

        let restored = self.vault.load().await;
        match &restored {
            Some(profile) => tracing::info!(
                profile_id = %profile.id(),
                role = %profile.role(),
                "session restored"
            ),
            None => tracing::debug!("no persisted session"),
        }

        self.state.send_modify(|snapshot| {
            snapshot.set_profile(restored);
            snapshot.finish_loading();
        });
    }

    /// Signs a user in, replacing whoever was signed in before.
    ///
    /// If the candidate has no `id` (absent, `null`, or blank), a fresh
    /// one is generated *before* validation, so an admin can sign in
    /// without supplying one.
    ///
    /// # Errors
    /// Returns [`SessionError::Invalid`] if the candidate breaks a field
    /// rule. The session is left untouched and nothing is persisted.
    ///
    /// A failure to *persist* is not an error: it is logged, and the
    /// user stays signed in for this run of the app.
    pub async fn sign_in(&self, mut candidate: ProfileFields) -> Result<Profile, SessionError> {
        let _writer = self.writer.lock().await;

        let needs_id = match candidate.get(field::ID) {
            None => true,
            Some(id) => id.as_str().is_some_and(|id| id.trim().is_empty()),
        };
        if needs_id {
            candidate.insert(field::ID, generate_id());
        }

        let profile = Profile::try_from(&candidate).map_err(|errors| {
            tracing::debug!(%errors, "sign-in rejected");
            SessionError::Invalid(errors)
        })?;

        self.state
            .send_modify(|snapshot| snapshot.set_profile(Some(profile.clone())));
        tracing::info!(profile_id = %profile.id(), role = %profile.role(), "signed in");

        self.persist(Some(&profile)).await;
        Ok(profile)
    }

    /// Signs the current user out and clears the saved session.
    ///
    /// Safe to call when nobody is signed in. Always returns `true` once
    /// the in-memory session is cleared, even if the saved copy couldn't
    /// be removed (that failure is logged).
    pub async fn sign_out(&self) -> bool {
        let _writer = self.writer.lock().await;

        let mut previous = None;
        self.state.send_modify(|snapshot| {
            previous = snapshot.profile().cloned();
            snapshot.set_profile(None);
        });
        if let Some(profile) = previous {
            tracing::info!(profile_id = %profile.id(), "signed out");
        }

        self.persist(None).await;
        true
    }

    /// Applies a partial update to the signed-in user's profile.
    ///
    /// `patch` is laid over the current profile field by field (a shallow
    /// merge), and the result is validated with the rules for the
    /// *merged* `isAdmin` value.
    ///
    /// # Errors
    /// - [`SessionError::NotSignedIn`] — nobody is signed in
    /// - [`SessionError::Invalid`] — the merged profile breaks a field rule
    ///
    /// In both cases the session is left untouched and nothing is
    /// persisted.
    pub async fn update_profile(&self, patch: ProfileFields) -> Result<Profile, SessionError> {
        let _writer = self.writer.lock().await;

        let current = self.state.borrow().profile().cloned();
        let Some(current) = current else {
            tracing::debug!("profile update with nobody signed in");
            return Err(SessionError::NotSignedIn);
        };

        let merged = current.to_fields().overlay(&patch);
        let profile = Profile::try_from(&merged).map_err(|errors| {
            tracing::debug!(profile_id = %current.id(), %errors, "profile update rejected");
            SessionError::Invalid(errors)
        })?;

        self.state
            .send_modify(|snapshot| snapshot.set_profile(Some(profile.clone())));
        tracing::info!(
            profile_id = %profile.id(),
            fields = patch.len(),
            "profile updated"
        );

        self.persist(Some(&profile)).await;
        Ok(profile)
    }

    /// Writes the session through to storage. One attempt, no retry;
    /// failures leave memory and storage out of step until the next
    /// successful write.
    async fn persist(&self, profile: Option<&Profile>) {
        if let Err(err) = self.vault.save(profile).await {
            tracing::warn!(
                key = %self.vault.key(),
                %err,
                "failed to persist session; in-memory session kept"
            );
        }
    }

    // =====================================================================
    // Queries
    // =====================================================================

    /// A copy of the current session state.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    /// A receiver that is notified on every session change.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    /// The signed-in user's profile, if any.
    pub fn profile(&self) -> Option<Profile> {
        self.state.borrow().profile().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// `true` until [`initialize`](Self::initialize) has finished once.
    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    pub fn is_admin(&self) -> bool {
        self.state.borrow().is_admin()
    }

    pub fn is_student(&self) -> bool {
        self.state.borrow().is_student()
    }

    /// The user's name, or `"Guest"`.
    pub fn display_name(&self) -> String {
        self.state.borrow().display_name().to_string()
    }

    /// `"Admin"`, `"Student"`, or `"Guest"`.
    pub fn role_label(&self) -> &'static str {
        self.state.borrow().role_label()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The durable side of the session, for callers that need to inspect
    /// it (diagnostics, tests).
    pub fn vault(&self) -> &SessionVault<S, C> {
        &self.vault
    }
}

/// Counter making ids unique within this process even when the clock
/// and the random part collide.
static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// Generates a profile id: `<unix millis>-<sequence>-<64 random bits>`,
/// all lowercase hex.
fn generate_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let seq = NEXT_ID.fetch_add(1, Ordering::Relaxed);

    let bytes: [u8; 8] = rand::rng().random();
    let random: String = bytes.iter().map(|b| format!("{b:02x}")).collect();

    format!("{millis:x}-{seq:x}-{random}")
}

// =========================================================================
// Tests
// =========================================================================
