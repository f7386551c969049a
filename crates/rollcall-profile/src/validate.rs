//! Role-specific validation of profile fields.
//!
//! Every check here is a pure function of a [`ProfileFields`]: no state,
//! no I/O. A check never stops at the first problem; it collects one
//! message per offending field so a form can highlight all of them at once.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ProfileFields, field};

/// The user-facing messages stored in [`FieldErrors`].
pub mod message {
    pub const NAME_REQUIRED: &str = "Name is required";
    pub const NAME_TOO_SHORT: &str = "Name must be at least 2 characters";
    pub const ID_REQUIRED: &str = "ID is required";
    pub const ADMIN_FLAG_TRUE: &str = "Admin flag must be true";
    pub const ADMIN_FLAG_BOOLEAN: &str = "Admin flag must be true or false";
    pub const ROLL_NUMBER_TEXT: &str = "Roll number must be text";
    pub const BRANCH_TEXT: &str = "Branch must be text";
    pub const YEAR_RANGE: &str = "Year must be between 1 and 4";
}

use message::*;

/// Minimum length of a trimmed name, in characters.
const MIN_NAME_CHARS: usize = 2;

/// Valid years of study.
const YEARS: std::ops::RangeInclusive<i64> = 1..=4;

// ---------------------------------------------------------------------------
// FieldErrors
// ---------------------------------------------------------------------------

/// Validation failures, keyed by field name.
///
/// Each field appears at most once: the first message recorded for a
/// field wins. A `BTreeMap` keeps iteration (and therefore `Display` and
/// JSON output) in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a map with a single entry.
    pub fn single(field: &str, message: &str) -> Self {
        let mut errors = Self::new();
        errors.insert(field, message);
        errors
    }

    /// Records a message for `field` unless one is already recorded.
    pub fn insert(&mut self, field: &str, message: &str) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.to_string());
    }

    /// Returns the message for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(field, message)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(f, m)| (f.as_str(), m.as_str()))
    }
}

/// Prints `field: message` pairs separated by `; `, e.g.
/// `name: Name is required; year: Year must be between 1 and 4`.
impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// The result of a validation check.
///
/// Valid means `errors` is empty; there is no separate flag that could
/// disagree with it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    pub errors: FieldErrors,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Converts into a `Result`, so callers can use `?`.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

/// Checks a candidate against the student rules.
///
/// - `name`: required, at least 2 characters after trimming.
/// - `rollNumber`, `branch`: optional, must be text when present.
/// - `year`: optional, must be an integer from 1 to 4 when present.
/// - `id`: optional here, but must be non-blank text when present.
pub fn validate_student(fields: &ProfileFields) -> Validation {
    let mut errors = FieldErrors::new();

    check_name(fields, &mut errors);
    check_present_id(fields, &mut errors);
    check_text(fields, field::ROLL_NUMBER, ROLL_NUMBER_TEXT, &mut errors);
    check_text(fields, field::BRANCH, BRANCH_TEXT, &mut errors);

    if fields.contains(field::YEAR)
        && !fields.integer(field::YEAR).is_some_and(|y| YEARS.contains(&y))
    {
        errors.insert(field::YEAR, YEAR_RANGE);
    }

    Validation { errors }
}

/// Checks a candidate against the admin rules.
///
/// - `name`: same rule as for students.
/// - `id`: required, non-blank text.
/// - `isAdmin`: must be literally `true`.
///
/// Student-only fields are not checked; they are dropped when the
/// candidate becomes a [`Profile`](crate::Profile).
pub fn validate_admin(fields: &ProfileFields) -> Validation {
    let mut errors = FieldErrors::new();

    check_name(fields, &mut errors);

    if !fields.text(field::ID).is_some_and(is_filled) {
        errors.insert(field::ID, ID_REQUIRED);
    }

    if fields.flag(field::IS_ADMIN) != Some(true) {
        errors.insert(field::IS_ADMIN, ADMIN_FLAG_TRUE);
    }

    Validation { errors }
}

/// Picks the rule set from the candidate's `isAdmin` field and runs it.
///
/// | `isAdmin`               | rules                                   |
/// |-------------------------|-----------------------------------------|
/// | `true`                  | [`validate_admin`]                      |
/// | absent, `null`, `false` | [`validate_student`]                    |
/// | anything else           | [`validate_student`] + `isAdmin` error  |
///
/// Non-boolean flags are rejected rather than coerced, so `"yes"` or `1`
/// can never sign someone in as an admin.
pub fn validate(fields: &ProfileFields) -> Validation {
    match role_flag(fields) {
        RoleFlag::Admin => validate_admin(fields),
        RoleFlag::Student => validate_student(fields),
        RoleFlag::Malformed => {
            let mut validation = validate_student(fields);
            validation.errors.insert(field::IS_ADMIN, ADMIN_FLAG_BOOLEAN);
            validation
        }
    }
}

/// How a candidate's `isAdmin` field dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RoleFlag {
    Admin,
    Student,
    Malformed,
}

pub(crate) fn role_flag(fields: &ProfileFields) -> RoleFlag {
    match fields.get(field::IS_ADMIN) {
        None => RoleFlag::Student,
        Some(value) => match value.as_bool() {
            Some(true) => RoleFlag::Admin,
            Some(false) => RoleFlag::Student,
            None => RoleFlag::Malformed,
        },
    }
}

fn check_name(fields: &ProfileFields, errors: &mut FieldErrors) {
    let trimmed = fields.text(field::NAME).map(str::trim).unwrap_or("");
    match trimmed.chars().count() {
        0 => errors.insert(field::NAME, NAME_REQUIRED),
        n if n < MIN_NAME_CHARS => errors.insert(field::NAME, NAME_TOO_SHORT),
        _ => {}
    }
}

fn check_present_id(fields: &ProfileFields, errors: &mut FieldErrors) {
    if fields.contains(field::ID) && !fields.text(field::ID).is_some_and(is_filled) {
        errors.insert(field::ID, ID_REQUIRED);
    }
}

fn check_text(
    fields: &ProfileFields,
    key: &str,
    message: &str,
    errors: &mut FieldErrors,
) {
    if fields.contains(key) && fields.text(key).is_none() {
        errors.insert(key, message);
    }
}

fn is_filled(s: &str) -> bool {
    !s.trim().is_empty()
}

// =========================================================================
// Tests
// =========================================================================
