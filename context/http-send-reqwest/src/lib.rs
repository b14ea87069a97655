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

//! Reqwest-based HTTP implementation for directory-auth.
//!
//! ## Example
//!
//! ```no_run
//! use directory_auth_core::Context;
//! use directory_auth_http_send_reqwest::ReqwestHttpSend;
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), reqwest::Error> {
//! let client = reqwest::Client::builder()
//!     .timeout(Duration::from_secs(30))
//!     .build()?;
//! let ctx = Context::new().with_http_send(ReqwestHttpSend::new(client));
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use directory_auth_core::{Error, HttpSend, Result};
use log::debug;
use reqwest::{Client, Request};

/// Reqwest-based implementation of the `HttpSend` trait.
#[derive(Debug, Default, Clone)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let req = Request::try_from(req)
            .map_err(|e| Error::request_invalid("failed to convert http request").with_source(e))?;
        debug!("sending {} {}", req.method(), req.url());

        let resp = self
            .client
            .execute(req)
            .await
            .map_err(|e| Error::unexpected("failed to send http request").with_source(e))?;

        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp
            .bytes()
            .await
            .map_err(|e| Error::unexpected("failed to read http response body").with_source(e))?;

        let mut http_resp = http::Response::builder().status(status);
        if let Some(h) = http_resp.headers_mut() {
            *h = headers;
        }
        Ok(http_resp.body(body)?)
    }
}
