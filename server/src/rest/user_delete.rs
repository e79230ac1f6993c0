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


//! API to delete an existing user.

use crate::driver::Driver;
use crate::rest::{parse_user_id, redirect_to_users};
use axum::extract::{Path, State};
use axum::response::Response;
use userbook_core::rest::RestError;

/// API handler.
///
/// Any request body is ignored: HTML forms reach this API through a `POST` with the method
/// override and may carry form fields along.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(id): Path<String>,
) -> Result<Response, RestError> {
    let id = parse_user_id(&id)?;
    driver.delete_user(id).await?;
    Ok(redirect_to_users())
}
