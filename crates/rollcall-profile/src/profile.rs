//! The typed user record held by a signed-in session.
//!
//! A [`Profile`] can only be built from fields that pass [`validate`],
//! so holding one is proof that every per-role rule was satisfied. Admin
//! and student data live in separate [`Role`] variants; a profile can't
//! be "an admin with a roll number" because there is nowhere to put it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::validate::{RoleFlag, message, role_flag};
use crate::{FieldErrors, ProfileFields, field, validate};

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Student-only details. All of them are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentDetails {
    pub roll_number: Option<String>,
    pub branch: Option<String>,
    /// Year of study, 1 through 4.
    pub year: Option<u8>,
}

/// What kind of user a profile belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    Admin,
    Student(StudentDetails),
}

impl Role {
    /// Human-readable label: `"Admin"` or `"Student"`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Student(_) => "Student",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// A validated user record.
///
/// On the wire (and on disk) a profile is the flat object
///
/// ```json
/// { "id": "…", "name": "Jo", "isAdmin": false, "rollNumber": "…", "branch": "…", "year": 2 }
/// ```
///
/// The `serde(into, try_from)` attributes route both directions through
/// [`ProfileFields`], so deserializing runs the same validation as
/// sign-in does: a hand-edited record with `"year": 7` fails to decode.
///
/// # Example
///
/// ```rust
/// use rollcall_profile::{Profile, ProfileFields};
///
/// let fields = ProfileFields::student("Jo").with_id("u-1").with_year(2);
/// let profile = Profile::try_from(&fields).unwrap();
///
/// assert_eq!(profile.name(), "Jo");
/// assert_eq!(profile.student().and_then(|s| s.year), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "ProfileFields", try_from = "ProfileFields")]
pub struct Profile {
    id: String,
    name: String,
    role: Role,
}

impl Profile {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The display name, exactly as entered (not trimmed).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn is_student(&self) -> bool {
        !self.role.is_admin()
    }

    /// Student details, or `None` for admins.
    pub fn student(&self) -> Option<&StudentDetails> {
        match &self.role {
            Role::Student(details) => Some(details),
            Role::Admin => None,
        }
    }

    /// The profile as a flat field set, the starting point for a merge.
    pub fn to_fields(&self) -> ProfileFields {
        ProfileFields::from(self.clone())
    }
}

/// Builds a profile from candidate fields, running [`validate`] first.
///
/// # Errors
/// Returns the validator's [`FieldErrors`]. A student candidate without
/// any `id` is also rejected here (`"ID is required"`): the validator
/// allows it because the session layer generates ids before conversion.
impl TryFrom<&ProfileFields> for Profile {
    type Error = FieldErrors;

    fn try_from(fields: &ProfileFields) -> Result<Self, Self::Error> {
        validate(fields).into_result()?;

        let id = fields
            .text(field::ID)
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| FieldErrors::single(field::ID, message::ID_REQUIRED))?;
        let name = fields
            .text(field::NAME)
            .ok_or_else(|| FieldErrors::single(field::NAME, message::NAME_REQUIRED))?;

        let role = match role_flag(fields) {
            RoleFlag::Admin => Role::Admin,
            RoleFlag::Student | RoleFlag::Malformed => {
                Role::Student(StudentDetails {
                    roll_number: fields.text(field::ROLL_NUMBER).map(str::to_owned),
                    branch: fields.text(field::BRANCH).map(str::to_owned),
                    // Validation already bounded the year to 1..=4.
                    year: fields
                        .integer(field::YEAR)
                        .and_then(|y| u8::try_from(y).ok()),
                })
            }
        };

        Ok(Self {
            id: id.to_owned(),
            name: name.to_owned(),
            role,
        })
    }
}

impl TryFrom<ProfileFields> for Profile {
    type Error = FieldErrors;

    fn try_from(fields: ProfileFields) -> Result<Self, Self::Error> {
        Self::try_from(&fields)
    }
}

/// Flattens a profile into its record shape. Absent student details are
/// left out rather than written as `null`.
impl From<Profile> for ProfileFields {
    fn from(profile: Profile) -> Self {
        let mut fields = ProfileFields::new()
            .with_id(profile.id)
            .with_name(profile.name)
            .with_admin_flag(profile.role.is_admin());

        if let Role::Student(details) = profile.role {
            if let Some(roll_number) = details.roll_number {
                fields.insert(field::ROLL_NUMBER, roll_number);
            }
            if let Some(branch) = details.branch {
                fields.insert(field::BRANCH, branch);
            }
            if let Some(year) = details.year {
                fields.insert(field::YEAR, year);
            }
        }

        fields
    }
}
