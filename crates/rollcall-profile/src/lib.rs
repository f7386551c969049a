//! Profile model and validation for Rollcall.
//!
//! This crate defines the data the session layer stores, and the rules
//! that data must satisfy:
//!
//! - **Fields** ([`ProfileFields`], [`field`]) — the loosely typed record
//!   the UI hands us: a sign-in candidate or a partial update.
//! - **Profile** ([`Profile`], [`Role`], [`StudentDetails`]) — the typed,
//!   always-valid user record. Either an admin or a student, never both.
//! - **Validation** ([`validate`], [`validate_student`], [`validate_admin`])
//!   — pure checks producing a field → message map ([`FieldErrors`]).
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how a profile is turned
//!   into bytes for the persistence layer and back.
//!
//! # Architecture
//!
//! Nothing here does I/O or holds state. The session layer calls into
//! this crate before every mutation.
//!
//! ```text
//! UI (ProfileFields) → Validation → Profile → Codec (bytes) → Store
//! ```

// ---------------------------------------------------------------------------
// Module declarations
// ---------------------------------------------------------------------------

mod codec;
mod error;
pub mod field;
mod fields;
mod profile;
mod validate;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProfileError;
pub use fields::ProfileFields;
pub use profile::{Profile, Role, StudentDetails};
pub use validate::{
    FieldErrors, Validation, message, validate, validate_admin,
    validate_student,
};
