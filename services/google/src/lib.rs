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

//! Google Workspace directory access with domain-wide delegation.
//!
//! A service account signs a JWT naming the user it acts for, exchanges it
//! for an access token, and the resulting [`Credential`] authorizes calls to
//! the Admin SDK Directory API.
//!
//! ```no_run
//! use directory_auth_core::Context;
//! use directory_auth_google::{build_credential, create_client, CredentialParameters, ListUsersRequest};
//!
//! # async fn example(ctx: Context) -> directory_auth_core::Result<()> {
//! let params = CredentialParameters::new(
//!     "svc@project.iam.gserviceaccount.com",
//!     "/etc/keys/svc.pem",
//!     "admin@example.com",
//!     ["https://www.googleapis.com/auth/admin.directory.user.readonly"],
//! );
//!
//! let credential = build_credential(&ctx, &params).await?;
//! let client = create_client(ctx, credential)?;
//! let page = client
//!     .list_users(&ListUsersRequest::new().with_max_results(10))
//!     .await?;
//! for user in &page.users {
//!     println!("{user}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod constants;

mod config;
pub use config::CredentialParameters;

mod certificate;
mod jwt;

mod credential;
pub use credential::{Credential, Token};

mod build;
pub use build::{build_credential, CredentialBuilder};

mod sign_request;
pub use sign_request::BearerRequestSigner;

mod directory;
pub use directory::{create_client, DirectoryClient, ListUsersRequest, User, UserName, UsersPage};
