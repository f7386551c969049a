//! Session types: configuration, the observable session slot, and the
//! caller-facing result shape.
//!
//! The session is a single slot. It is either empty (nobody signed in) or
//! holds exactly one [`Profile`]. A separate `loading` flag is `true`
//! only until the first restore from storage has finished.

use rollcall_profile::{FieldErrors, Profile};
use serde::Serialize;

use crate::SessionError;

/// Key the current session is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "rollcall.current_user";

/// What [`SessionSnapshot::display_name`] and
/// [`SessionSnapshot::role_label`] return when nobody is signed in.
pub const GUEST: &str = "Guest";

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for session behavior.
///
/// Create one with `SessionConfig::default()` and override just the
/// fields you care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// The single key the current session is persisted under.
    ///
    /// Default: `"rollcall.current_user"`. Two apps sharing one store
    /// directory need different keys.
    pub storage_key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// SessionSnapshot
// ---------------------------------------------------------------------------

/// A point-in-time view of the session slot.
///
/// This is what the UI observes (through
/// [`SessionStore::subscribe`](crate::SessionStore::subscribe)). Every
/// query on it is a pure projection: no I/O, no waiting.
///
/// ```text
///   Unauthenticated ──(sign_in)──→ Authenticated(Profile)
///         ↑                              │    ↺ (update_profile)
///         └───────────(sign_out)─────────┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    profile: Option<Profile>,
    loading: bool,
}

impl SessionSnapshot {
    /// The state at process start: nobody signed in, restore pending.
    pub(crate) fn initial() -> Self {
        Self {
            profile: None,
            loading: true,
        }
    }

    pub(crate) fn set_profile(&mut self, profile: Option<Profile>) {
        self.profile = profile;
    }

    pub(crate) fn finish_loading(&mut self) {
        self.loading = false;
    }

    /// The signed-in user's profile, if any.
    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.profile.is_some()
    }

    /// `true` until the first restore from storage completes.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// `true` iff someone is signed in and they are an admin.
    pub fn is_admin(&self) -> bool {
        self.profile.as_ref().is_some_and(Profile::is_admin)
    }

    /// `true` iff someone is signed in and they are a student.
    /// Always `false` when nobody is signed in.
    pub fn is_student(&self) -> bool {
        self.profile.as_ref().is_some_and(Profile::is_student)
    }

    /// The user's name, or `"Guest"` when nobody is signed in.
    pub fn display_name(&self) -> &str {
        self.profile.as_ref().map_or(GUEST, Profile::name)
    }

    /// `"Admin"`, `"Student"`, or `"Guest"` when nobody is signed in.
    pub fn role_label(&self) -> &'static str {
        self.profile.as_ref().map_or(GUEST, |p| p.role().label())
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// The `{ success, errors? }` result shape handed to the UI.
///
/// Built from the `Result` of [`sign_in`](crate::SessionStore::sign_in)
/// or [`update_profile`](crate::SessionStore::update_profile). `errors`
/// is only set for validation failures; a profile update with nobody
/// signed in is `{ "success": false }` with no errors.
///
/// ```rust
/// use rollcall_session::{Outcome, SessionError};
///
/// let failed: Result<(), SessionError> = Err(SessionError::NotSignedIn);
/// let outcome = Outcome::from(&failed);
/// assert!(!outcome.success);
/// assert!(outcome.errors.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl<T> From<&Result<T, SessionError>> for Outcome {
    fn from(result: &Result<T, SessionError>) -> Self {
        match result {
            Ok(_) => Self {
                success: true,
                errors: None,
            },
            Err(err) => Self {
                success: false,
                errors: err.field_errors().cloned(),
            },
        }
    }
}

impl<T> From<Result<T, SessionError>> for Outcome {
    fn from(result: Result<T, SessionError>) -> Self {
        Self::from(&result)
    }
}
