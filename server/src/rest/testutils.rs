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


//! Test utilities for the REST API.

use crate::db;
use crate::driver::Driver;
use crate::model::{User, UserFields, UserId};
use crate::rest::app;
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use userbook_core::db::{Db, DbError};

/// State of a running test.
pub(crate) struct TestContext {
    /// The database that backs the app.
    db: Arc<dyn Db + Send + Sync>,

    /// The app under test.
    app: Router,
}

impl TestContext {
    /// Initializes an app backed by a fresh in-memory database and no static files.
    pub(crate) async fn setup() -> Self {
        Self::setup_with_static_dir(None).await
    }

    /// Initializes an app backed by a fresh in-memory database that serves static files from
    /// `static_dir`, if any.
    pub(crate) async fn setup_with_static_dir(static_dir: Option<PathBuf>) -> Self {
        let db = Arc::new(userbook_core::db::sqlite::testutils::setup().await);
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let driver = Driver::new(db.clone());
        let app = app(driver, static_dir);
        Self { db, app }
    }

    /// Returns a copy of the app under test.
    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    /// Consumes the context and returns the app under test.
    pub(crate) fn into_app(self) -> Router {
        self.app
    }

    /// Creates a user directly in the database, bypassing validation.
    pub(crate) async fn create_user(&self, name: &str, age: i64, email: &str) -> User {
        db::create_user(&mut self.db.ex().await.unwrap(), UserFields::new(name, age, email))
            .await
            .unwrap()
    }

    /// Fetches a user directly from the database, returning `None` if it does not exist.
    pub(crate) async fn get_user(&self, id: UserId) -> Option<User> {
        match db::get_user(&mut self.db.ex().await.unwrap(), id).await {
            Ok(user) => Some(user),
            Err(DbError::NotFound) => None,
            Err(e) => panic!("Failed to query user: {}", e),
        }
    }

    /// Fetches all users directly from the database.
    pub(crate) async fn list_users(&self) -> Vec<User> {
        db::list_users(&mut self.db.ex().await.unwrap()).await.unwrap()
    }

    /// Breaks the database so that subsequent operations fail.
    pub(crate) async fn break_db(&self) {
        self.db.close().await;
    }
}
