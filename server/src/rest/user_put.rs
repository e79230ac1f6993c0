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


//! API to update an existing user.

use crate::driver::Driver;
use crate::model::SubmittedUser;
use crate::rest::{parse_user_id, redirect_to_users};
use crate::views;
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Response};
use userbook_core::rest::RestError;

/// API handler.
///
/// When the submission is invalid, the stored record is fetched again to render the form, so a
/// record that vanished in the meantime yields a not found error instead of the form.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(id): Path<String>,
    submitted: SubmittedUser,
) -> Result<Response, RestError> {
    let id = parse_user_id(&id)?;
    match submitted.validate() {
        Ok(fields) => {
            driver.update_user(id, fields).await?;
            Ok(redirect_to_users())
        }
        Err(errors) => {
            let user = driver.get_user(id).await?;
            Ok(Html(views::edit_user_page(&user, Some(&errors))).into_response())
        }
    }
}
