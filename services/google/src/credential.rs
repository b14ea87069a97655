use std::fmt::{self, Debug};

use directory_auth_core::time::{now, DateTime};
use directory_auth_core::utils::Redact;
use directory_auth_core::SigningCredential;

use crate::constants::TOKEN_EXPIRY_BUFFER_SECS;

/// Token represents an OAuth2 access token with expiration.
#[derive(Clone)]
pub struct Token {
    access_token: String,
    token_type: String,
    expires_at: DateTime,
}

impl Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &Redact::from(&self.access_token))
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl Token {
    pub(crate) fn new(
        access_token: impl Into<String>,
        token_type: impl Into<String>,
        expires_at: DateTime,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: token_type.into(),
            expires_at,
        }
    }

    /// The access token.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// The token type returned by the server, usually `Bearer`.
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// The expiration time of the token.
    pub fn expires_at(&self) -> DateTime {
        self.expires_at
    }
}

impl SigningCredential for Token {
    fn is_valid(&self) -> bool {
        if self.access_token.is_empty() {
            return false;
        }

        let buffer = chrono::TimeDelta::try_seconds(TOKEN_EXPIRY_BUFFER_SECS).expect("in bounds");
        now() < self.expires_at - buffer
    }
}

/// Credential is a service account acting for a user with an access token
/// scoped to the requested scopes.
///
/// A Credential can only be obtained from [`crate::build_credential`], so
/// it always carries a token issued for exactly its subject and scopes.
#[derive(Clone, Debug)]
pub struct Credential {
    service_account_id: String,
    subject: String,
    scopes: Vec<String>,
    token: Token,
}

impl Credential {
    pub(crate) fn new(
        service_account_id: impl Into<String>,
        subject: impl Into<String>,
        scopes: Vec<String>,
        token: Token,
    ) -> Self {
        Self {
            service_account_id: service_account_id.into(),
            subject: subject.into(),
            scopes,
            token,
        }
    }

    /// The service account that signed the assertion.
    pub fn service_account_id(&self) -> &str {
        &self.service_account_id
    }

    /// The impersonated user.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// The scopes the token was granted for.
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// The access token.
    pub fn token(&self) -> &Token {
        &self.token
    }

    /// Value of the `Authorization` header.
    pub(crate) fn authorization(&self) -> String {
        format!("Bearer {}", self.token.access_token)
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        self.token.is_valid()
    }
}
