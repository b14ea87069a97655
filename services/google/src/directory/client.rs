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

use bytes::Bytes;
use http::header;
use log::{debug, error};

use directory_auth_core::{Context, Error, Result, SignRequest, SigningCredential};

use super::types::{ListUsersRequest, UsersPage};
use crate::constants::DEFAULT_DIRECTORY_ENDPOINT;
use crate::credential::Credential;
use crate::sign_request::BearerRequestSigner;

/// Create a directory client authorized by `credential`.
///
/// No request is sent. The credential must still be valid; an expired or
/// empty token yields [`ErrorKind::InvalidCredential`](directory_auth_core::ErrorKind::InvalidCredential).
pub fn create_client(ctx: Context, credential: Credential) -> Result<DirectoryClient> {
    if !credential.is_valid() {
        return Err(Error::invalid_credential(format!(
            "credential for {} acting as {} is expired or was never authenticated",
            credential.service_account_id(),
            credential.subject()
        )));
    }

    debug!(
        "created directory client for {} acting as {}",
        credential.service_account_id(),
        credential.subject()
    );
    Ok(DirectoryClient {
        ctx,
        credential,
        signer: BearerRequestSigner::new(),
        endpoint: DEFAULT_DIRECTORY_ENDPOINT.to_string(),
    })
}

/// DirectoryClient calls the Admin SDK Directory API on behalf of the
/// impersonated user.
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    ctx: Context,
    credential: Credential,
    signer: BearerRequestSigner,
    endpoint: String,
}

impl DirectoryClient {
    /// Use another API endpoint, e.g. a local mock.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// The credential requests are signed with.
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// The API endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Retrieve one page of users.
    pub async fn list_users(&self, req: &ListUsersRequest) -> Result<UsersPage> {
        req.validate()?;

        let url = format!(
            "{}/admin/directory/v1/users?{}",
            self.endpoint,
            req.query_string()
        );
        let body = self.get(&url).await?;

        let page: UsersPage = serde_json::from_slice(&body).map_err(|e| {
            Error::unexpected("failed to parse users.list response").with_source(e)
        })?;
        debug!("listed {} users", page.users.len());
        Ok(page)
    }

    async fn get(&self, url: &str) -> Result<Bytes> {
        let (mut parts, body) = http::Request::get(url)
            .header(header::ACCEPT, "application/json")
            .body(Bytes::new())?
            .into_parts();

        self.signer
            .sign_request(&self.ctx, &mut parts, Some(&self.credential))
            .await?;

        let resp = self
            .ctx
            .http_send(http::Request::from_parts(parts, body))
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = String::from_utf8_lossy(resp.body());
            error!("directory request to {url} failed with {status}: {body}");
            return Err(Error::unexpected(format!(
                "directory request failed with {status}: {body}"
            )));
        }

        Ok(resp.into_body())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::Token;
    use chrono::TimeDelta;
    use directory_auth_core::time::now;
    use directory_auth_core::ErrorKind;
    use directory_auth_core::HttpSend;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, Default)]
    struct CountingHttpSend(Arc<AtomicUsize>);

    #[async_trait::async_trait]
    impl HttpSend for CountingHttpSend {
        async fn http_send(&self, _: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(http::Response::new(Bytes::from_static(b"{}")))
        }
    }

    fn credential(delta: TimeDelta) -> Credential {
        Credential::new(
            "svc@project.iam.gserviceaccount.com",
            "admin@example.com",
            vec!["scope".to_string()],
            Token::new("ya29.token", "Bearer", now() + delta),
        )
    }

    #[test]
    fn test_create_client() {
        let client = create_client(Context::new(), credential(TimeDelta::try_hours(1).unwrap()))
            .unwrap()
            .with_endpoint("http://127.0.0.1:8080/");

        assert_eq!(client.endpoint(), "http://127.0.0.1:8080");
        assert_eq!(client.credential().subject(), "admin@example.com");
    }

    #[test]
    fn test_create_client_rejects_expired_credential() {
        let err = create_client(Context::new(), credential(TimeDelta::try_hours(-1).unwrap()))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidCredential);
    }

    #[tokio::test]
    async fn test_expired_credential_sends_nothing() {
        let sent = Arc::new(AtomicUsize::new(0));
        let client = DirectoryClient {
            ctx: Context::new().with_http_send(CountingHttpSend(sent.clone())),
            credential: credential(TimeDelta::try_seconds(-1).unwrap()),
            signer: BearerRequestSigner::new(),
            endpoint: DEFAULT_DIRECTORY_ENDPOINT.to_string(),
        };

        let err = client
            .list_users(&ListUsersRequest::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidCredential);
        assert_eq!(sent.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_response_is_empty_page() {
        let sent = Arc::new(AtomicUsize::new(0));
        let client = create_client(
            Context::new().with_http_send(CountingHttpSend(sent.clone())),
            credential(TimeDelta::try_hours(1).unwrap()),
        )
        .unwrap();

        let page = client.list_users(&ListUsersRequest::new()).await.unwrap();
        assert!(page.users.is_empty());
        assert_eq!(sent.load(Ordering::SeqCst), 1);
    }
}
