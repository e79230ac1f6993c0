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


//! HTML pages served by the application.
//!
//! Pages are built from static templates.  Free-form text coming from a user record or from a
//! submission is escaped before being inserted.

use crate::model::{SubmittedUser, User, ValidationErrors};
use userbook_core::template::{apply, escape_html};

/// Skeleton shared by all pages.
const LAYOUT: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>%title%</title>
</head>
<body>
<h1>%title%</h1>
%content%</body>
</html>
"#;

/// List of validation errors shown above a form.
const ERRORS: &str = r#"<ul class="errors">
%items%</ul>
"#;

/// A single validation error within `ERRORS`.
const ERROR_ITEM: &str = r#"<li data-field="%field%">%message%</li>
"#;

/// Form to create a new user.
const NEW_USER: &str = r#"%errors%<form action="/users" method="POST">
<label for="name">Name</label>
<input type="text" id="name" name="name" value="%name%">
<label for="age">Age</label>
<input type="number" id="age" name="age" value="%age%">
<label for="email">Email</label>
<input type="email" id="email" name="email" value="%email%">
<button type="submit">Create</button>
</form>
<p><a href="/users">Back to the list</a></p>
"#;

/// Form to edit an existing user.  Browsers cannot submit a `PUT` so the form asks for it via the
/// `_method` query parameter.
const EDIT_USER: &str = r#"%errors%<form action="/users/%id%?_method=PUT" method="POST">
<label for="name">Name</label>
<input type="text" id="name" name="name" value="%name%">
<label for="age">Age</label>
<input type="number" id="age" name="age" value="%age%">
<label for="email">Email</label>
<input type="email" id="email" name="email" value="%email%">
<button type="submit">Update</button>
</form>
<p><a href="/users">Back to the list</a></p>
"#;

/// Table of all users.
const USER_LIST: &str = r#"<p><a href="/users/new">New user</a></p>
<table>
<thead>
<tr><th>Name</th><th>Age</th><th>Email</th><th></th></tr>
</thead>
<tbody>
%rows%</tbody>
</table>
"#;

/// A single user within `USER_LIST`.
const USER_ROW: &str = r#"<tr>
<td>%name%</td>
<td>%age%</td>
<td>%email%</td>
<td>
<a href="/users/%id%/edit">Edit</a>
<form action="/users/%id%?_method=DELETE" method="POST"><button type="submit">Delete</button></form>
</td>
</tr>
"#;

/// Row shown in `USER_LIST` when there are no users.
const NO_USERS_ROW: &str = r#"<tr><td colspan="4">There are no users yet.</td></tr>
"#;

/// Wraps `content` in the common page skeleton.
fn page(title: &'static str, content: &str) -> String {
    apply(LAYOUT, &[("title", title), ("content", content)])
}

/// Renders the list of validation `errors`, if any.
fn errors_block(errors: Option<&ValidationErrors>) -> String {
    let Some(errors) = errors else {
        return String::new();
    };
    let items = errors
        .iter()
        .map(|e| apply(ERROR_ITEM, &[("field", e.field()), ("message", e.message())]))
        .collect::<String>();
    apply(ERRORS, &[("items", items.as_str())])
}

/// Renders the form to create a new user, prefilled with a previous `submitted` attempt and the
/// `errors` that caused it to be rejected.
pub(crate) fn new_user_page(
    submitted: &SubmittedUser,
    errors: Option<&ValidationErrors>,
) -> String {
    let content = apply(
        NEW_USER,
        &[
            ("errors", errors_block(errors).as_str()),
            ("name", escape_html(submitted.name()).as_str()),
            ("age", escape_html(submitted.age()).as_str()),
            ("email", escape_html(submitted.email()).as_str()),
        ],
    );
    page("New user", &content)
}

/// Renders the form to edit `user` along with any `errors` from a rejected update.
pub(crate) fn edit_user_page(user: &User, errors: Option<&ValidationErrors>) -> String {
    let fields = user.fields();
    let content = apply(
        EDIT_USER,
        &[
            ("errors", errors_block(errors).as_str()),
            ("id", user.id().to_string().as_str()),
            ("name", escape_html(fields.name()).as_str()),
            ("age", fields.age().to_string().as_str()),
            ("email", escape_html(fields.email()).as_str()),
        ],
    );
    page("Edit user", &content)
}

/// Renders a single row of the users table.
fn user_row(user: &User) -> String {
    let fields = user.fields();
    apply(
        USER_ROW,
        &[
            ("id", user.id().to_string().as_str()),
            ("name", escape_html(fields.name()).as_str()),
            ("age", fields.age().to_string().as_str()),
            ("email", escape_html(fields.email()).as_str()),
        ],
    )
}

/// Renders the table of all `users`.
pub(crate) fn user_list_page(users: &[User]) -> String {
    let rows = if users.is_empty() {
        NO_USERS_ROW.to_owned()
    } else {
        users.iter().map(user_row).collect::<String>()
    };
    page("Users", &apply(USER_LIST, &[("rows", rows.as_str())]))
}
