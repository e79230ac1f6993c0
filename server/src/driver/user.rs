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


//! Operations on one user.

use crate::db;
use crate::driver::{Driver, user_error};
use crate::model::{User, UserFields, UserId};
use userbook_core::driver::DriverResult;

impl Driver {
    /// Deletes the user identified by `id`.
    pub(crate) async fn delete_user(self, id: UserId) -> DriverResult<()> {
        let mut ex = self.db.ex().await.map_err(user_error)?;
        db::delete_user(&mut ex, id).await.map_err(user_error)?;
        Ok(())
    }

    /// Gets the user identified by `id`.
    pub(crate) async fn get_user(self, id: UserId) -> DriverResult<User> {
        let mut ex = self.db.ex().await.map_err(user_error)?;
        let user = db::get_user(&mut ex, id).await.map_err(user_error)?;
        Ok(user)
    }

    /// Replaces the contents of the user identified by `id` with `fields`.
    pub(crate) async fn update_user(self, id: UserId, fields: UserFields) -> DriverResult<User> {
        let mut ex = self.db.ex().await.map_err(user_error)?;
        let user = db::update_user(&mut ex, id, fields).await.map_err(user_error)?;
        Ok(user)
    }
}
