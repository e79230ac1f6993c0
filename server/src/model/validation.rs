// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.


//! Validation of user records submitted by clients.
//!
//! Submissions arrive as raw text and are only turned into `UserFields` once every rule passes.
//! All rules are evaluated on every submission so that the client gets the full list of problems
//! in one go.

use crate::model::UserFields;
use derive_getters::Getters;
use regex::Regex;
use serde::Deserialize;
use serde::de::{self, Deserializer, Visitor};
use std::fmt;
use std::sync::LazyLock;

/// Minimum number of characters in a user's name.
const MIN_NAME_LENGTH: usize = 4;

/// Minimum age of a user, inclusive.
const MIN_AGE: i64 = 18;

/// Maximum length of a full email address.
const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum length of the local part of an email address.
const MAX_EMAIL_LOCAL_LENGTH: usize = 64;

/// Non-ASCII characters allowed in email addresses, both in the local part and in the domain.
const INTL_CHARS: &str = r"\u{00A1}-\u{D7FF}\u{F900}-\u{FDCF}\u{FDF0}-\u{FFEF}";

/// Syntax of an email address: a local part that is either a dot-separated sequence of RFC 5322
/// `atext` characters or a quoted string, followed by a domain with at least two labels and an
/// alphabetic (or punycode) top-level label.  Internationalized characters are allowed in both
/// the local part and the domain.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    let re = concat!(
        r"^(?:[A-Za-z0-9!#$%&'*+/=?^_`{|}~%intl%-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~%intl%-]+)*",
        r#"|"(?:[\x20\x21\x23-\x5B\x5D-\x7E%intl%]|\\[\x20-\x7E%intl%])*")"#,
        r"@(?:[A-Za-z0-9%intl%](?:[A-Za-z0-9%intl%-]{0,61}[A-Za-z0-9%intl%])?\.)+",
        r"(?:[A-Za-z%intl%]{2,63}|xn--[A-Za-z0-9-]{2,59})$",
    )
    .replace("%intl%", INTL_CHARS);
    Regex::new(&re).expect("Hardcoded email regex must be valid")
});

/// Checks if `email` is a syntactically valid email address.
fn is_valid_email(email: &str) -> bool {
    if email.len() > MAX_EMAIL_LENGTH {
        return false;
    }
    match email.rsplit_once('@') {
        Some((local, _domain)) if local.len() <= MAX_EMAIL_LOCAL_LENGTH => EMAIL_RE.is_match(email),
        _ => false,
    }
}

/// The rule that a submitted field violated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum FieldErrorKind {
    /// The name has fewer characters than required.
    TooShort,

    /// The age is not an integer or is below the minimum.
    NotAdult,

    /// The email address is not well-formed.
    InvalidFormat,
}

impl FieldErrorKind {
    /// Returns the message shown to the user for this kind of error.
    fn message(self) -> &'static str {
        match self {
            FieldErrorKind::TooShort => "Name is required with min. 4 chars",
            FieldErrorKind::NotAdult => "Age must be a number greater than 18",
            FieldErrorKind::InvalidFormat => "Invalid email address",
        }
    }
}

/// A single validation failure for one field of a submission.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct FieldError {
    /// Name of the field that failed validation.
    field: &'static str,

    /// The rule that failed.
    kind: FieldErrorKind,
}

impl FieldError {
    /// Creates a new error for `field`.
    fn new(field: &'static str, kind: FieldErrorKind) -> Self {
        Self { field, kind }
    }

    /// Returns the name of the field that failed validation.
    pub(crate) fn field(&self) -> &'static str {
        self.field
    }

    /// Returns the rule that failed.
    #[cfg(test)]
    pub(crate) fn kind(&self) -> FieldErrorKind {
        self.kind
    }

    /// Returns the human-readable message for this error.
    pub(crate) fn message(&self) -> &'static str {
        self.kind.message()
    }
}

/// Ordered collection of validation failures, in field order: name, age, email.
#[derive(Debug, PartialEq)]
pub(crate) struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// Returns an iterator over the individual failures.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }
}

/// Deserializer visitor that accepts any scalar and keeps its textual representation.
///
/// Form submissions always carry text but JSON submissions may carry numbers (typically for the
/// age) or nulls, and these need to go through the same validation rules as text.
struct ScalarAsText;

impl<'de> Visitor<'de> for ScalarAsText {
    type Value = String;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string, a number or a boolean")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(v.to_string())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(v.to_string())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(v.to_string())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(v.to_string())
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(v.to_owned())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(v)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(String::new())
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(String::new())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(ScalarAsText)
    }
}

/// Deserializes any scalar value into its textual representation.
fn scalar_as_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    deserializer.deserialize_any(ScalarAsText)
}

/// A user record as submitted by a client, before validation.
///
/// Missing fields are treated as empty and unknown fields are ignored.
#[derive(Debug, Default, Deserialize, Getters, PartialEq)]
#[serde(default)]
pub(crate) struct SubmittedUser {
    /// Submitted name.
    #[serde(deserialize_with = "scalar_as_text")]
    name: String,

    /// Submitted age, which may not even be a number.
    #[serde(deserialize_with = "scalar_as_text")]
    age: String,

    /// Submitted email address.
    #[serde(deserialize_with = "scalar_as_text")]
    email: String,
}

impl SubmittedUser {
    /// Creates a new submission from raw values.
    #[cfg(test)]
    pub(crate) fn new<N: Into<String>, A: Into<String>, E: Into<String>>(
        name: N,
        age: A,
        email: E,
    ) -> Self {
        Self { name: name.into(), age: age.into(), email: email.into() }
    }

    /// Applies all validation rules to the submission.
    pub(crate) fn validate(&self) -> Result<UserFields, ValidationErrors> {
        let mut errors = vec![];

        if self.name.chars().count() < MIN_NAME_LENGTH {
            errors.push(FieldError::new("name", FieldErrorKind::TooShort));
        }

        let age = match self.age.parse::<i64>() {
            Ok(age) if age >= MIN_AGE => Some(age),
            _ => {
                errors.push(FieldError::new("age", FieldErrorKind::NotAdult));
                None
            }
        };

        if !is_valid_email(&self.email) {
            errors.push(FieldError::new("email", FieldErrorKind::InvalidFormat));
        }

        match age {
            Some(age) if errors.is_empty() => {
                Ok(UserFields::new(self.name.clone(), age, self.email.clone()))
            }
            _ => Err(ValidationErrors(errors)),
        }
    }
}
