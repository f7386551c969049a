//! # Rollcall
//!
//! Local sign-in and session persistence for apps with two kinds of
//! users: administrators and students.
//!
//! Rollcall keeps track of who is signed in, checks their profile against
//! per-role rules before accepting it, and saves the session so it
//! survives a restart. There is no server and no password: "signing in"
//! means handing over a profile record.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rollcall::prelude::*;
//!
//! # async fn run() -> Result<(), RollcallError> {
//! let session = RollcallBuilder::new().data_dir("./.rollcall").open().await?;
//!
//! if !session.is_authenticated() {
//!     let student = ProfileFields::student("Priya")
//!         .with_roll_number("21CS042")
//!         .with_branch("CSE")
//!         .with_year(3);
//!     session.sign_in(student).await?;
//! }
//!
//! println!("{} ({})", session.display_name(), session.role_label());
//! # Ok(())
//! # }
//! ```

mod builder;
mod error;
mod logging;

pub use builder::{DEFAULT_DATA_DIR, RollcallBuilder};
pub use error::RollcallError;
pub use logging::{init_tracing, try_init_tracing};

pub use rollcall_profile as profile;
pub use rollcall_session as session;
pub use rollcall_store as store;

pub mod prelude {
    pub use crate::{RollcallBuilder, RollcallError, init_tracing};

    pub use rollcall_profile::{FieldErrors, Profile, ProfileFields, Role, StudentDetails, field};
    pub use rollcall_session::{Outcome, SessionConfig, SessionError, SessionSnapshot, SessionStore};
    #[cfg(feature = "fs")]
    pub use rollcall_store::FileStore;
    pub use rollcall_store::{KeyValueStore, MemoryStore, StorageError};
}
