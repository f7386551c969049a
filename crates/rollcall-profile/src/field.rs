//! Field names of the flat profile record.
//!
//! These are the keys of [`ProfileFields`](crate::ProfileFields), of the
//! persisted JSON object, and of [`FieldErrors`](crate::FieldErrors).

/// Unique profile identifier.
pub const ID: &str = "id";

/// Display name. Required for every role.
pub const NAME: &str = "name";

/// Role discriminator: `true` for admins, `false` (or absent) for students.
pub const IS_ADMIN: &str = "isAdmin";

/// Student roll number.
pub const ROLL_NUMBER: &str = "rollNumber";

/// Student branch (department).
pub const BRANCH: &str = "branch";

/// Student year of study, 1 through 4.
pub const YEAR: &str = "year";
