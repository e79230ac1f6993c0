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


//! Test utilities for the business layer.

use crate::db;
use crate::driver::Driver;
use crate::model::{User, UserFields, UserId};
use std::sync::Arc;
use userbook_core::db::{Db, DbError};

/// State of a running test.
pub(crate) struct TestContext {
    /// The database that backs the driver.
    db: Arc<dyn Db + Send + Sync>,

    /// The driver under test.
    driver: Driver,
}

impl TestContext {
    /// Initializes a driver backed by a fresh in-memory database.
    pub(crate) async fn setup() -> Self {
        let db = Arc::new(userbook_core::db::sqlite::testutils::setup().await);
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let driver = Driver::new(db.clone());
        Self { db, driver }
    }

    /// Returns a copy of the driver under test.
    pub(crate) fn driver(&self) -> Driver {
        self.driver.clone()
    }

    /// Creates a user directly in the database.
    pub(crate) async fn create_user(&self, name: &str, age: i64, email: &str) -> User {
        db::create_user(&mut self.db.ex().await.unwrap(), UserFields::new(name, age, email))
            .await
            .unwrap()
    }

    /// Fetches a user directly from the database.
    pub(crate) async fn get_user(&self, id: UserId) -> Result<User, DbError> {
        db::get_user(&mut self.db.ex().await.unwrap(), id).await
    }

    /// Breaks the database so that subsequent operations fail.
    pub(crate) async fn break_db(&self) {
        self.db.close().await;
    }
}
