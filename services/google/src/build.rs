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
use log::{debug, error};
use serde::Deserialize;

use directory_auth_core::time::{format_rfc3339, now};
use directory_auth_core::{Context, Error, ProvideCredential, Result};

use crate::certificate::{CertificateFile, SigningIdentity};
use crate::config::CredentialParameters;
use crate::constants::{JWT_BEARER_GRANT_TYPE, TOKEN_EXPIRY_BUFFER_SECS};
use crate::credential::{Credential, Token};
use crate::jwt::{self, Claims};

/// Error body returned by the token endpoint.
///
/// See <https://datatracker.ietf.org/doc/html/rfc6749#section-5.2>.
#[derive(Debug, Deserialize)]
struct OAuthError {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    error_uri: Option<String>,
}

impl std::fmt::Display for OAuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.error)?;
        if let Some(desc) = &self.error_description {
            write!(f, ": {desc}")?;
        }
        if let Some(uri) = &self.error_uri {
            write!(f, "; see {uri}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OAuthErrorOr<T> {
    OAuthError(OAuthError),
    Data(T),
}

/// Build a delegated credential for `params`.
///
/// The certificate is opened, turned into a signing identity and released
/// before any network I/O happens. The token exchange is bounded by
/// [`CredentialParameters::exchange_timeout`].
///
/// # Errors
///
/// - [`ErrorKind::ConfigInvalid`](directory_auth_core::ErrorKind::ConfigInvalid)
///   if `params` violate their input constraints.
/// - [`ErrorKind::CertificateLoadFailure`](directory_auth_core::ErrorKind::CertificateLoadFailure)
///   if the key material can't be read or decoded.
/// - [`ErrorKind::AuthenticationFailure`](directory_auth_core::ErrorKind::AuthenticationFailure)
///   if the token endpoint rejects the assertion, can't be reached, or
///   doesn't answer in time.
pub async fn build_credential(ctx: &Context, params: &CredentialParameters) -> Result<Credential> {
    params.validate()?;

    let path = ctx
        .expand_home_dir(params.certificate_path())
        .ok_or_else(|| {
            Error::certificate_load_failure(format!(
                "failed to expand certificate path {}: home dir not found",
                params.certificate_path()
            ))
        })?;

    let identity = {
        let certificate = CertificateFile::open(ctx, &path).await?;
        certificate.signing_identity(params)?
    };

    let assertion = jwt::encode(&identity, &Claims::new(&identity, params.token_uri(), now()))?;

    let token = match tokio::time::timeout(
        params.exchange_timeout(),
        exchange_token(ctx, params.token_uri(), &assertion),
    )
    .await
    {
        Ok(Ok(token)) => token,
        Ok(Err(err)) => {
            let reason = err.message().to_string();
            return Err(authentication_failure(params, &reason, err));
        }
        Err(elapsed) => {
            return Err(authentication_failure(
                params,
                &format!("no response within {:?}", params.exchange_timeout()),
                elapsed,
            ))
        }
    };

    debug!(
        "built credential for {} acting as {}, expires at {}",
        identity.service_account_id,
        identity.subject,
        format_rfc3339(token.expires_at())
    );
    Ok(into_credential(identity, token))
}

fn into_credential(identity: SigningIdentity, token: Token) -> Credential {
    let SigningIdentity {
        service_account_id,
        subject,
        scopes,
        ..
    } = identity;
    Credential::new(service_account_id, subject, scopes, token)
}

fn authentication_failure(
    params: &CredentialParameters,
    reason: &str,
    source: impl Into<anyhow::Error>,
) -> Error {
    Error::authentication_failure(format!(
        "request for access token failed: {reason}. {}",
        params.to_json()
    ))
    .with_source(source)
}

/// Exchange a signed assertion for an access token.
async fn exchange_token(ctx: &Context, token_uri: &str, assertion: &str) -> Result<Token> {
    let body = form_urlencoded::Serializer::new(String::new())
        .append_pair("grant_type", JWT_BEARER_GRANT_TYPE)
        .append_pair("assertion", assertion)
        .finish();

    let req = http::Request::builder()
        .method(http::Method::POST)
        .uri(token_uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(body.into_bytes().into())?;

    debug!("exchanging assertion for access token at {token_uri}");
    let resp = ctx.http_send(req).await?;
    let status = resp.status();

    let parsed = serde_json::from_slice::<OAuthErrorOr<TokenResponse>>(resp.body());
    let token = match parsed {
        Ok(OAuthErrorOr::OAuthError(err)) => {
            error!("token endpoint rejected assertion with {status}: {err}");
            return Err(Error::unexpected(format!("{status}: {err}")));
        }
        Ok(OAuthErrorOr::Data(_)) | Err(_) if !status.is_success() => {
            let body = String::from_utf8_lossy(resp.body());
            error!("token endpoint rejected assertion with {status}: {body}");
            return Err(Error::unexpected(format!("{status}: {body}")));
        }
        Ok(OAuthErrorOr::Data(token)) => token,
        Err(err) => {
            return Err(Error::unexpected("failed to parse token response").with_source(err))
        }
    };

    if token.access_token.is_empty() {
        return Err(Error::unexpected("token response has no access_token"));
    }
    // A token that expires inside the validity buffer would be unusable on arrival.
    let expires_in = match token.expires_in {
        Some(v) if v > TOKEN_EXPIRY_BUFFER_SECS => v,
        v => {
            return Err(Error::unexpected(format!(
                "token response has invalid expires_in {v:?}, \
                 expected more than {TOKEN_EXPIRY_BUFFER_SECS} seconds"
            )))
        }
    };
    let expires_at = chrono::TimeDelta::try_seconds(expires_in)
        .and_then(|lifetime| now().checked_add_signed(lifetime))
        .ok_or_else(|| Error::unexpected(format!("expires_in {expires_in} out of range")))?;

    Ok(Token::new(
        token.access_token,
        token.token_type.unwrap_or_else(|| "Bearer".to_string()),
        expires_at,
    ))
}

/// CredentialBuilder builds credentials from a fixed set of parameters.
///
/// Every call performs a fresh exchange. Nothing is cached.
#[derive(Debug, Clone)]
pub struct CredentialBuilder {
    params: CredentialParameters,
}

impl CredentialBuilder {
    /// Create a builder for `params`.
    pub fn new(params: CredentialParameters) -> Self {
        Self { params }
    }

    /// The parameters this builder uses.
    pub fn params(&self) -> &CredentialParameters {
        &self.params
    }

    /// Build a new credential.
    pub async fn build(&self, ctx: &Context) -> Result<Credential> {
        build_credential(ctx, &self.params).await
    }
}

#[async_trait]
impl ProvideCredential for CredentialBuilder {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        self.build(ctx).await.map(Some)
    }
}
