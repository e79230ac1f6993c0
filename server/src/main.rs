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


//! Entry point to the user records service.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use log::{error, info};
use std::error::Error;
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tokio::net::TcpListener;
use userbook_core::db::Db;
use userbook_core::db::postgres::{PostgresDb, PostgresOptions};
use userbook_core::env::get_optional_var;
use userbook_server::db::init_schema;
use userbook_server::serve;

/// Default port to listen on when `USERBOOK_PORT` is not set.
const DEFAULT_PORT: u16 = 3000;

/// Sets up the service from the environment and serves requests until asked to terminate.
async fn run() -> Result<(), Box<dyn Error>> {
    let port = get_optional_var::<u16>("USERBOOK", "PORT")?.unwrap_or(DEFAULT_PORT);
    let static_dir = get_optional_var::<PathBuf>("USERBOOK", "STATIC_DIR")?;

    let db_opts = PostgresOptions::from_env("PGSQL_PROD")?;
    let db = Arc::new(PostgresDb::connect(db_opts)?);
    init_schema(&mut db.ex().await?).await?;

    let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, port)).await?;
    info!("Server is running on {}", listener.local_addr()?);

    serve(listener, db, static_dir).await
}

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = run().await {
        error!("{}", e);
        process::exit(1);
    }
}
