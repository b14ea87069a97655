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

//! Core components for delegated directory access.
//!
//! This crate provides the foundational types and traits shared by the
//! directory-auth crates.
//!
//! ## Overview
//!
//! The crate is built around a few key concepts:
//!
//! - **Context**: A container that holds implementations for file reading, HTTP sending, and environment access
//! - **Traits**: Abstract interfaces for credential loading (`ProvideCredential`) and request authorization (`SignRequest`)
//! - **Error**: A single error type with an [`ErrorKind`] describing which step failed
//!
//! ## Example
//!
//! ```no_run
//! use directory_auth_core::{Context, ProvideCredential, SignRequest, SigningCredential, Result};
//! use async_trait::async_trait;
//! use http::request::Parts;
//!
//! #[derive(Clone, Debug)]
//! struct MyCredential {
//!     token: String,
//! }
//!
//! impl SigningCredential for MyCredential {
//!     fn is_valid(&self) -> bool {
//!         !self.token.is_empty()
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MyProvider;
//!
//! #[async_trait]
//! impl ProvideCredential for MyProvider {
//!     type Credential = MyCredential;
//!
//!     async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
//!         Ok(Some(MyCredential {
//!             token: "my-token".to_string(),
//!         }))
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MySigner;
//!
//! #[async_trait]
//! impl SignRequest for MySigner {
//!     type Credential = MyCredential;
//!
//!     async fn sign_request(
//!         &self,
//!         _ctx: &Context,
//!         req: &mut Parts,
//!         cred: Option<&Self::Credential>,
//!     ) -> Result<()> {
//!         let cred = cred.ok_or_else(|| directory_auth_core::Error::invalid_credential("missing credential"))?;
//!         req.headers.insert(
//!             http::header::AUTHORIZATION,
//!             format!("Bearer {}", cred.token).parse()?,
//!         );
//!         Ok(())
//!     }
//! }
//! ```
//!
//! ## Utilities
//!
//! - [`time`]: Time helpers
//! - [`utils`]: General utilities including data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod time;
pub mod utils;

mod context;
pub use context::{Context, Env, FileRead, HttpSend, NoopEnv, NoopFileRead, NoopHttpSend, OsEnv, StaticEnv};

mod api;
pub use api::{ProvideCredential, SignRequest, SigningCredential};

mod error;
pub use error::{Error, ErrorKind, Result};
