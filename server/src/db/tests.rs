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


//! Database tests shared by all implementations.

use crate::db::*;
use crate::model::{User, UserFields, UserId};
use std::sync::Arc;
use userbook_core::db::{Db, DbError};

/// Runs a raw `query` that bypasses the typed operations.  The `query` must be valid for all
/// possible database implementations.
async fn exec_raw(ex: &mut Executor, query: &str) {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            sqlx::query(query).execute(ex).await.unwrap();
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            sqlx::query(query).execute(ex).await.unwrap();
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

pub(crate) async fn test_create_and_get(db: Arc<dyn Db + Send + Sync>) {
    let fields = UserFields::new("Alice", 25, "a@b.com");
    let user = create_user(&mut db.ex().await.unwrap(), fields.clone()).await.unwrap();
    assert_eq!(&fields, user.fields());

    let user2 = get_user(&mut db.ex().await.unwrap(), *user.id()).await.unwrap();
    assert_eq!(user, user2);

    db.close().await;
}

pub(crate) async fn test_create_assigns_distinct_ids(db: Arc<dyn Db + Send + Sync>) {
    let fields = UserFields::new("Same Name", 30, "same@example.com");
    let user1 = create_user(&mut db.ex().await.unwrap(), fields.clone()).await.unwrap();
    let user2 = create_user(&mut db.ex().await.unwrap(), fields).await.unwrap();
    assert_ne!(user1.id(), user2.id());
    assert_eq!(2, list_users(&mut db.ex().await.unwrap()).await.unwrap().len());

    db.close().await;
}

pub(crate) async fn test_get_not_found(db: Arc<dyn Db + Send + Sync>) {
    create_user(&mut db.ex().await.unwrap(), UserFields::new("Alice", 25, "a@b.com"))
        .await
        .unwrap();

    assert_eq!(
        DbError::NotFound,
        get_user(&mut db.ex().await.unwrap(), UserId::generate()).await.unwrap_err()
    );

    db.close().await;
}

pub(crate) async fn test_list_empty(db: Arc<dyn Db + Send + Sync>) {
    assert!(list_users(&mut db.ex().await.unwrap()).await.unwrap().is_empty());

    db.close().await;
}

pub(crate) async fn test_list_sorted_by_name(db: Arc<dyn Db + Send + Sync>) {
    let mut tx = db.begin().await.unwrap();
    let carol = create_user(tx.ex(), UserFields::new("carol", 30, "c@x.com")).await.unwrap();
    let alice = create_user(tx.ex(), UserFields::new("alice", 25, "a@x.com")).await.unwrap();
    let bob = create_user(tx.ex(), UserFields::new("bobby", 40, "b@x.com")).await.unwrap();
    tx.commit().await.unwrap();

    let users = list_users(&mut db.ex().await.unwrap()).await.unwrap();
    assert_eq!(vec![alice, bob, carol], users);

    db.close().await;
}

pub(crate) async fn test_update_ok(db: Arc<dyn Db + Send + Sync>) {
    let user = create_user(&mut db.ex().await.unwrap(), UserFields::new("Alice", 25, "a@b.com"))
        .await
        .unwrap();
    let other = create_user(&mut db.ex().await.unwrap(), UserFields::new("Bobby", 40, "b@b.com"))
        .await
        .unwrap();

    let new_fields = UserFields::new("Carol", 30, "carol@x.com");
    let updated =
        update_user(&mut db.ex().await.unwrap(), *user.id(), new_fields.clone()).await.unwrap();
    assert_eq!(User::new(*user.id(), new_fields), updated);

    assert_eq!(updated, get_user(&mut db.ex().await.unwrap(), *user.id()).await.unwrap());
    assert_eq!(other, get_user(&mut db.ex().await.unwrap(), *other.id()).await.unwrap());

    db.close().await;
}

pub(crate) async fn test_update_not_found(db: Arc<dyn Db + Send + Sync>) {
    assert_eq!(
        DbError::NotFound,
        update_user(
            &mut db.ex().await.unwrap(),
            UserId::generate(),
            UserFields::new("Carol", 30, "carol@x.com")
        )
        .await
        .unwrap_err()
    );
    assert!(list_users(&mut db.ex().await.unwrap()).await.unwrap().is_empty());

    db.close().await;
}

pub(crate) async fn test_delete_twice(db: Arc<dyn Db + Send + Sync>) {
    let user = create_user(&mut db.ex().await.unwrap(), UserFields::new("Alice", 25, "a@b.com"))
        .await
        .unwrap();
    let other = create_user(&mut db.ex().await.unwrap(), UserFields::new("Bobby", 40, "b@b.com"))
        .await
        .unwrap();

    delete_user(&mut db.ex().await.unwrap(), *user.id()).await.unwrap();
    assert_eq!(
        DbError::NotFound,
        delete_user(&mut db.ex().await.unwrap(), *user.id()).await.unwrap_err()
    );

    assert_eq!(vec![other], list_users(&mut db.ex().await.unwrap()).await.unwrap());

    db.close().await;
}

pub(crate) async fn test_corrupted_records(db: Arc<dyn Db + Send + Sync>) {
    exec_raw(
        &mut db.ex().await.unwrap(),
        "INSERT INTO users (id, name, age, email) VALUES ('not-an-id', 'Alice', 25, 'a@b.com')",
    )
    .await;

    match list_users(&mut db.ex().await.unwrap()).await.unwrap_err() {
        DbError::DataIntegrityError(e) => assert!(e.contains("Invalid user id 'not-an-id'")),
        e => panic!("Unexpected error {:?}", e),
    }

    let id = UserId::generate();
    exec_raw(
        &mut db.ex().await.unwrap(),
        &format!("UPDATE users SET id = '{}', age = -5 WHERE id = 'not-an-id'", id),
    )
    .await;

    match get_user(&mut db.ex().await.unwrap(), id).await.unwrap_err() {
        DbError::DataIntegrityError(e) => assert!(e.contains("Age -5 is out of range")),
        e => panic!("Unexpected error {:?}", e),
    }

    db.close().await;
}

macro_rules! generate_db_tests [
    ( $setup:expr $(, #[$extra:meta] )? ) => {
        userbook_core::db::testutils::generate_tests!(
            $( #[$extra], )?
            $setup,
            $crate::db::tests,
            test_create_and_get,
            test_create_assigns_distinct_ids,
            test_get_not_found,
            test_list_empty,
            test_list_sorted_by_name,
            test_update_ok,
            test_update_not_found,
            test_delete_twice,
            test_corrupted_records
        );
    }
];

#[cfg(feature = "postgres")]
mod postgres {
    use super::*;
    use userbook_core::db::postgres::testutils::setup;

    generate_db_tests!(
        {
            let db = Arc::new(setup().await);
            init_schema(&mut db.ex().await.unwrap()).await.unwrap();
            db
        },
        #[ignore = "Requires environment configuration and is expensive"]
    );
}

mod sqlite {
    use super::*;
    use userbook_core::db::sqlite::testutils::setup;

    generate_db_tests!({
        let db = Arc::new(setup().await);
        init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        db
    });

    #[tokio::test]
    async fn test_create_not_inserted() {
        let db = Arc::new(setup().await);
        init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        exec_raw(
            &mut db.ex().await.unwrap(),
            "CREATE TRIGGER skip_users BEFORE INSERT ON users BEGIN SELECT RAISE(IGNORE); END",
        )
        .await;

        match create_user(&mut db.ex().await.unwrap(), UserFields::new("Alice", 25, "a@b.com"))
            .await
            .unwrap_err()
        {
            DbError::BackendError(e) => assert_eq!("Insertion affected 0 rows", e),
            e => panic!("Unexpected error {:?}", e),
        }

        db.close().await;
    }
}
