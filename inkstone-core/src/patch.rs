//! Tri-state field semantics for partial updates
//!
//! An update request distinguishes three cases per field: the field was
//! omitted (keep the stored value), the field was sent as null / empty
//! string (clear it), or the field carries a new value. Collapsing the
//! first two into one loses the ability to clear nullable columns.

use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use crate::ValidationError;

/// One field of a partial update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Patch<T> {
    /// Field absent from the request: leave the stored value untouched.
    #[default]
    Keep,
    /// Field explicitly cleared: write NULL.
    Clear,
    /// Field set to a new value.
    Set(T),
}

impl<T> Patch<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, Self::Keep)
    }

    /// Collapse to the value this patch would write, if it writes one.
    /// `Keep` and `Clear` both yield `None`.
    pub fn into_set(self) -> Option<T> {
        match self {
            Self::Set(v) => Some(v),
            _ => None,
        }
    }

    /// Nested-option view: `None` for keep, `Some(None)` for clear,
    /// `Some(Some(v))` for set.
    pub fn into_nullable(self) -> Option<Option<T>> {
        match self {
            Self::Keep => None,
            Self::Clear => Some(None),
            Self::Set(v) => Some(Some(v)),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Patch<U> {
        match self {
            Self::Keep => Patch::Keep,
            Self::Clear => Patch::Clear,
            Self::Set(v) => Patch::Set(f(v)),
        }
    }
}

impl<T> From<Option<Option<T>>> for Patch<T> {
    fn from(value: Option<Option<T>>) -> Self {
        match value {
            None => Self::Keep,
            Some(None) => Self::Clear,
            Some(Some(v)) => Self::Set(v),
        }
    }
}

impl<T: FromStr> Patch<T> {
    /// Coerce a text form field into a patch.
    ///
    /// Multipart form values arrive as strings: an absent field keeps
    /// the stored value, an empty string clears it, anything else must
    /// parse as `T`.
    pub fn parse_form(
        value: Option<&str>,
        field: &'static str,
    ) -> Result<Self, ValidationError> {
        match value.map(str::trim) {
            None => Ok(Self::Keep),
            Some("") => Ok(Self::Clear),
            Some(s) => s.parse().map(Self::Set).map_err(|_| {
                ValidationError::InvalidFormat {
                    field,
                    reason: "expected a number",
                }
            }),
        }
    }
}

impl Patch<bool> {
    /// Coerce a form checkbox/flag field. Absent keeps the stored
    /// value; present is true only for `"1"` or `"true"`.
    pub fn parse_form_flag(value: Option<&str>) -> Self {
        match value {
            None => Self::Keep,
            Some(s) => Self::Set(s == "1" || s == "true"),
        }
    }
}

/// Deserialize a JSON field into a [`Patch`].
///
/// Use together with `#[serde(default)]` so an absent field becomes
/// `Patch::Keep`; an explicit `null` becomes `Patch::Clear`.
///
/// ```
/// use inkstone_core::Patch;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Update {
///     #[serde(default, deserialize_with = "inkstone_core::patch::deserialize")]
///     description: Patch<String>,
/// }
///
/// let u: Update = serde_json::from_str(r#"{}"#).unwrap();
/// assert_eq!(u.description, Patch::Keep);
/// let u: Update = serde_json::from_str(r#"{"description": null}"#).unwrap();
/// assert_eq!(u.description, Patch::Clear);
/// ```
pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Patch<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match Option::<T>::deserialize(deserializer)? {
        Some(v) => Patch::Set(v),
        None => Patch::Clear,
    })
}
