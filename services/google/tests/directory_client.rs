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

use anyhow::Result;
use directory_auth_core::ErrorKind;
use directory_auth_google::{
    build_credential, create_client, CredentialParameters, ListUsersRequest,
};
use pretty_assertions::assert_eq;

use crate::mock::*;

const USERS: &str = r#"{
  "kind": "admin#directory#users",
  "users": [
    {
      "id": "100000000000000000001",
      "primaryEmail": "liz@example.com",
      "name": {"givenName": "Elizabeth", "familyName": "Smith", "fullName": "Elizabeth Smith"},
      "isAdmin": true
    },
    {
      "id": "100000000000000000002",
      "primaryEmail": "bob@example.com",
      "name": {"givenName": "Bob", "familyName": "Jones", "fullName": "Bob Jones"},
      "suspended": true
    }
  ],
  "nextPageToken": "next"
}"#;

fn params() -> CredentialParameters {
    CredentialParameters::new(
        SERVICE_ACCOUNT,
        testdata("test_key_pkcs8.pem"),
        ADMIN,
        [USER_READONLY],
    )
}

#[tokio::test]
async fn test_list_users() -> Result<()> {
    init();

    let http = MockHttpSend::google(USERS);
    let ctx = context(http.clone());

    let cred = build_credential(&ctx, &params()).await?;
    let client = create_client(ctx, cred)?;
    let page = client
        .list_users(&ListUsersRequest::new().with_max_results(10))
        .await?;

    let lines: Vec<String> = page.users.iter().map(ToString::to_string).collect();
    assert_eq!(
        lines,
        vec![
            "Elizabeth Smith, liz@example.com, 100000000000000000001",
            "Bob Jones, bob@example.com, 100000000000000000002",
        ]
    );
    assert_eq!(page.next_page_token.as_deref(), Some("next"));

    let requests = http.requests();
    assert_eq!(requests.len(), 2);
    let req = &requests[1];
    assert_eq!(req.method, http::Method::GET);
    assert_eq!(req.uri.host(), Some("admin.googleapis.com"));
    assert_eq!(req.uri.path(), "/admin/directory/v1/users");
    assert_eq!(
        req.query(),
        vec![
            ("customer".to_string(), "my_customer".to_string()),
            ("maxResults".to_string(), "10".to_string()),
        ]
    );
    let authorization = &req.headers[http::header::AUTHORIZATION];
    assert_eq!(authorization, "Bearer ya29.mock-token");
    assert!(authorization.is_sensitive());
    Ok(())
}

#[tokio::test]
async fn test_list_users_with_endpoint() -> Result<()> {
    init();

    let http = MockHttpSend::google(r#"{"kind":"admin#directory#users"}"#);
    let ctx = context(http.clone());

    let cred = build_credential(&ctx, &params()).await?;
    let client = create_client(ctx, cred)?.with_endpoint("http://127.0.0.1:9000/");
    let page = client
        .list_users(&ListUsersRequest::new().with_domain("example.com"))
        .await?;

    assert!(page.users.is_empty());
    let requests = http.requests();
    assert_eq!(
        requests[1].uri.to_string(),
        "http://127.0.0.1:9000/admin/directory/v1/users?domain=example.com&maxResults=10"
    );
    Ok(())
}

#[tokio::test]
async fn test_short_lived_token_is_rejected() {
    init();

    // Token expires inside the validity buffer, so no credential is handed out.
    let http = MockHttpSend::new(|_| (200, token_body("ya29.mock-token", 10)));
    let ctx = context(http.clone());

    let err = build_credential(&ctx, &params()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::AuthenticationFailure);
    assert_eq!(http.requests().len(), 1);
}

#[tokio::test]
async fn test_directory_error_status() -> Result<()> {
    init();

    let http = MockHttpSend::new(|req| {
        if req.uri.path() == "/token" {
            (200, token_body("ya29.mock-token", 3599))
        } else {
            (
                403,
                r#"{"error":{"code":403,"message":"Not Authorized to access this resource/api"}}"#
                    .to_string(),
            )
        }
    });
    let ctx = context(http);

    let cred = build_credential(&ctx, &params()).await?;
    let client = create_client(ctx, cred)?;
    let err = client
        .list_users(&ListUsersRequest::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Unexpected);
    assert!(err.message().contains("403"));
    assert!(err.message().contains("Not Authorized"));
    Ok(())
}
