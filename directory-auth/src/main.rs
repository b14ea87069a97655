// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.
//! List the first page of users of a Google Workspace directory.
//!
//! Prints one `{full name}, {primary email}, {id}` line per user.

use anyhow::Result;
use directory_auth::google::{client_from_env, ListUsersRequest};
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv::dotenv();
    env_logger::init();

    let ctx = directory_auth::default_context();
    let req = ListUsersRequest::from_env(&ctx)?;
    let client = client_from_env(ctx).await?;

    info!(
        "listing users as {} through {}",
        client.credential().subject(),
        client.endpoint()
    );
    let page = client.list_users(&req).await?;
    if page.users.is_empty() {
        info!("no users found");
    }
    for user in &page.users {
        println!("{user}");
    }
    Ok(())
}
