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


//! API to create a new user.

use crate::driver::Driver;
use crate::model::SubmittedUser;
use crate::rest::redirect_to_users;
use crate::views;
use axum::extract::State;
use axum::response::{Html, IntoResponse, Response};
use userbook_core::rest::RestError;

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    submitted: SubmittedUser,
) -> Result<Response, RestError> {
    match submitted.validate() {
        Ok(fields) => {
            driver.create_user(fields).await?;
            Ok(redirect_to_users())
        }
        Err(errors) => Ok(Html(views::new_user_page(&submitted, Some(&errors))).into_response()),
    }
}
