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


//! Operations on the collection of users.

use crate::db;
use crate::driver::{Driver, user_error};
use crate::model::{User, UserFields};
use userbook_core::driver::DriverResult;

impl Driver {
    /// Creates a new user with the given `fields` and returns it with its assigned identifier.
    pub(crate) async fn create_user(self, fields: UserFields) -> DriverResult<User> {
        let mut ex = self.db.ex().await.map_err(user_error)?;
        let user = db::create_user(&mut ex, fields).await.map_err(user_error)?;
        Ok(user)
    }

    /// Gets all existing users.
    pub(crate) async fn list_users(self) -> DriverResult<Vec<User>> {
        let mut ex = self.db.ex().await.map_err(user_error)?;
        let users = db::list_users(&mut ex).await.map_err(user_error)?;
        Ok(users)
    }
}
