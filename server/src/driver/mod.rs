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


//! Business logic for the service.

use log::warn;
use std::sync::Arc;
use userbook_core::db::{Db, DbError};
use userbook_core::driver::DriverError;

#[cfg(test)]
mod testutils;
mod user;
mod users;

/// Business logic.
///
/// The public operations exposed by the driver are all "one shot": each issues a single statement
/// through its own pooled executor, so no state carries over between two calls.  These operations
/// consume the driver to make that explicit.
#[derive(Clone)]
pub(crate) struct Driver {
    /// The database that the driver uses for persistence.
    db: Arc<dyn Db + Send + Sync>,
}

impl Driver {
    /// Creates a new driver backed by the given injected components.
    pub(crate) fn new(db: Arc<dyn Db + Send + Sync>) -> Self {
        Self { db }
    }
}

/// Converts a store error raised while operating on user records into a business error.
///
/// Missing records are an expected outcome and are reported as such.  Any other failure is
/// logged because it points at a problem with the store itself.
fn user_error(e: DbError) -> DriverError {
    match e {
        DbError::NotFound => DriverError::NotFound("User not found".to_owned()),
        e => {
            warn!("User store operation failed: {}", e);
            DriverError::from(e)
        }
    }
}
