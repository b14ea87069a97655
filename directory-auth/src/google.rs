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
//! Google Workspace directory support with convenience APIs.

pub use directory_auth_google::*;

use directory_auth_core::{Context, Result};
use log::debug;

use directory_auth_google::constants::GOOGLE_DIRECTORY_ENDPOINT;

/// Create a directory client configured entirely from env.
///
/// Reads [`CredentialParameters`] from the context's env, builds a fresh
/// credential and honors `GOOGLE_DIRECTORY_ENDPOINT` if set.
///
/// # Example
///
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> directory_auth::Result<()> {
/// use directory_auth::google::{client_from_env, ListUsersRequest};
///
/// let ctx = directory_auth::default_context();
/// let client = client_from_env(ctx.clone()).await?;
/// let page = client.list_users(&ListUsersRequest::from_env(&ctx)?).await?;
/// # Ok(())
/// # }
/// ```
pub async fn client_from_env(ctx: Context) -> Result<DirectoryClient> {
    let params = CredentialParameters::from_env(&ctx)?;
    let credential = build_credential(&ctx, &params).await?;

    let endpoint = ctx
        .env_var(GOOGLE_DIRECTORY_ENDPOINT)
        .filter(|v| !v.trim().is_empty());
    let mut client = create_client(ctx, credential)?;
    if let Some(endpoint) = endpoint {
        debug!("using directory endpoint {endpoint}");
        client = client.with_endpoint(endpoint);
    }
    Ok(client)
}
