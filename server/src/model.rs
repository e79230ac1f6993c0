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


//! High-level data types.

use derive_getters::Getters;
use derive_more::Display;
use std::str::FromStr;
use userbook_core::model::{ModelError, ModelResult};
use uuid::Uuid;

mod validation;
pub(crate) use validation::{SubmittedUser, ValidationErrors};

/// Identifier of a user record.  Identifiers are assigned when a record is created and never
/// change afterwards.
///
/// The textual form, used both in URLs and in the store, is the hyphenated lowercase UUID.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub(crate) struct UserId(Uuid);

impl UserId {
    /// Generates a new random identifier for a record that is about to be created.
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl FromStr for UserId {
    type Err = ModelError;

    fn from_str(s: &str) -> ModelResult<Self> {
        match Uuid::try_parse(s) {
            Ok(uuid) => Ok(Self(uuid)),
            Err(e) => Err(ModelError(format!("Invalid user id '{}': {}", s, e))),
        }
    }
}

/// The editable contents of a user record.
///
/// Values of this type received from a client are always produced by `SubmittedUser::validate`.
/// Values read back from the store are trusted as they are.
#[derive(Clone, Debug, Getters, PartialEq)]
pub(crate) struct UserFields {
    /// Display name of the user.
    name: String,

    /// Age of the user in years.
    age: i64,

    /// Email address of the user.
    email: String,
}

impl UserFields {
    /// Creates a new set of fields without validating them.
    pub(crate) fn new<N: Into<String>, E: Into<String>>(name: N, age: i64, email: E) -> Self {
        Self { name: name.into(), age, email: email.into() }
    }

    /// Creates a new set of fields from values read back from the store.
    pub(crate) fn from_stored(name: String, age: i64, email: String) -> ModelResult<Self> {
        if age < 0 {
            return Err(ModelError(format!("Age {} is out of range", age)));
        }
        Ok(Self { name, age, email })
    }
}

/// A user record as persisted in the store.
#[derive(Clone, Debug, Getters, PartialEq)]
pub(crate) struct User {
    /// Identifier of the record.
    id: UserId,

    /// Contents of the record.
    fields: UserFields,
}

impl User {
    /// Creates a new record from its parts.
    pub(crate) fn new(id: UserId, fields: UserFields) -> Self {
        Self { id, fields }
    }
}
