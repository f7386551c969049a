//! Current-user session management for Rollcall.
//!
//! This crate owns the one piece of state the app cares about: who is
//! signed in.
//!
//! 1. **Session store** — the in-memory slot and the operations that
//!    change it ([`SessionStore`])
//! 2. **Persistence** — writing the slot through to durable storage and
//!    restoring it on the next start ([`SessionVault`])
//! 3. **Observation** — read-only views for the UI ([`SessionSnapshot`],
//!    [`Outcome`])
//!
//! # How it fits in the stack
//!
//! ```text
//! UI layer (above)  ← calls sign_in / sign_out / update_profile, reads snapshots
//!     ↕
//! Session layer (this crate)  ← validates, mutates, persists
//!     ↕                  ↕
//! Profile layer      Store layer (below)  ← rules and codecs / bytes on disk
//! ```

mod error;
mod state;
mod store;
mod vault;

pub use error::SessionError;
pub use state::{DEFAULT_STORAGE_KEY, GUEST, Outcome, SessionConfig, SessionSnapshot};
pub use store::SessionStore;
pub use vault::SessionVault;
