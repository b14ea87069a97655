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

use async_trait::async_trait;
use http::header;
use log::debug;

use directory_auth_core::{Context, Error, Result, SignRequest, SigningCredential};

use crate::credential::Credential;

/// BearerRequestSigner authorizes requests with the access token of a
/// [`Credential`].
///
/// The credential is checked before every request, so an expired token is
/// rejected locally instead of being sent.
#[derive(Debug, Default, Clone)]
pub struct BearerRequestSigner;

impl BearerRequestSigner {
    /// Create a new signer.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SignRequest for BearerRequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _: &Context,
        req: &mut http::request::Parts,
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        let Some(cred) = credential else {
            return Err(Error::invalid_credential("missing credential"));
        };
        if !cred.is_valid() {
            return Err(Error::invalid_credential(format!(
                "credential for {} acting as {} is expired or was never authenticated",
                cred.service_account_id(),
                cred.subject()
            )));
        }

        req.headers.insert(header::AUTHORIZATION, {
            let mut value: http::HeaderValue = cred.authorization().parse()?;
            value.set_sensitive(true);
            value
        });

        debug!("signed request to {} for {}", req.uri, cred.subject());
        Ok(())
    }
}
