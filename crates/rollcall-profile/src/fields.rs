//! The loosely typed field record used for sign-in candidates and updates.
//!
//! The UI doesn't hand us a finished [`Profile`](crate::Profile) — it hands
//! us whatever the user typed into a form. That data may be missing a
//! name, carry a year of `"two"`, or set `isAdmin` to something that isn't
//! a boolean. [`ProfileFields`] keeps that data as a JSON object so the
//! validator can report each of those problems precisely, instead of
//! failing at a deserialization step with one opaque error.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{ProfileError, field};

/// A set of profile fields keyed by their flat record names
/// (see [`field`](crate::field)).
///
/// A JSON `null` is treated exactly like an absent field. Every other
/// value is "present", including `0`, `false` and `""`.
///
/// # Example
///
/// ```rust
/// use rollcall_profile::{ProfileFields, field};
///
/// let fields = ProfileFields::student("Jo").with_year(2);
/// assert_eq!(fields.text(field::NAME), Some("Jo"));
/// assert_eq!(fields.integer(field::YEAR), Some(2));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileFields(Map<String, Value>);

impl ProfileFields {
    /// Creates an empty field set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a student candidate with the given name.
    pub fn student(name: impl Into<String>) -> Self {
        Self::new().with_name(name).with_admin_flag(false)
    }

    /// Starts an admin candidate with the given name.
    pub fn admin(name: impl Into<String>) -> Self {
        Self::new().with_name(name).with_admin_flag(true)
    }

    /// Wraps an arbitrary JSON value, which must be an object.
    ///
    /// # Errors
    /// Returns [`ProfileError::NotAnObject`] for arrays, strings, numbers,
    /// booleans and `null`.
    pub fn from_value(value: Value) -> Result<Self, ProfileError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ProfileError::NotAnObject(kind_of(&other))),
        }
    }

    pub fn with_id(self, id: impl Into<String>) -> Self {
        self.set(field::ID, id.into())
    }

    pub fn with_name(self, name: impl Into<String>) -> Self {
        self.set(field::NAME, name.into())
    }

    pub fn with_admin_flag(self, is_admin: bool) -> Self {
        self.set(field::IS_ADMIN, is_admin)
    }

    pub fn with_roll_number(self, roll_number: impl Into<String>) -> Self {
        self.set(field::ROLL_NUMBER, roll_number.into())
    }

    pub fn with_branch(self, branch: impl Into<String>) -> Self {
        self.set(field::BRANCH, branch.into())
    }

    pub fn with_year(self, year: i64) -> Self {
        self.set(field::YEAR, year)
    }

    /// Sets any field to any JSON value, builder style.
    ///
    /// This is the escape hatch for data that didn't come from typed code
    /// (form input, a decoded request body, a test of a malformed value).
    pub fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets a field in place, replacing any previous value.
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    /// Returns the value of a field, or `None` if it is absent or `null`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    /// Returns `true` if the field is present and not `null`.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns the field as a string slice, or `None` if it is absent or
    /// not a string.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Returns the field as an integer, or `None` if it is absent or not
    /// an integral number.
    ///
    /// A float with no fractional part (`2.0`) counts as an integer.
    pub fn integer(&self, key: &str) -> Option<i64> {
        let number = self.get(key)?.as_number()?;
        number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        })
    }

    /// Returns the field as a boolean, or `None` if it is absent or not
    /// a boolean.
    pub fn flag(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// Returns a copy of `self` with every field of `patch` laid over it.
    ///
    /// This is a shallow merge: keys in `patch` are added or replace the
    /// existing value wholesale. Keys not in `patch` are kept.
    pub fn overlay(&self, patch: &ProfileFields) -> ProfileFields {
        let mut merged = self.clone();
        for (key, value) in &patch.0 {
            merged.0.insert(key.clone(), value.clone());
        }
        merged
    }

    /// Iterates over the field names that are present (non-`null`).
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, _)| k.as_str())
    }

    /// Number of present (non-`null`) fields.
    pub fn len(&self) -> usize {
        self.keys().count()
    }

    /// Returns `true` if no field is present.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Unwraps into a JSON object value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for ProfileFields {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
