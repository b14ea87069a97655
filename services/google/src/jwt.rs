use jsonwebtoken::{Algorithm, Header};
use serde::{Deserialize, Serialize};

use directory_auth_core::time::DateTime;
use directory_auth_core::{Error, Result};

use crate::certificate::SigningIdentity;
use crate::constants::ASSERTION_LIFETIME_SECS;

/// Claims of the assertion exchanged for an access token.
///
/// See "Additional claims" at <https://developers.google.com/identity/protocols/oauth2/service-account>.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub(crate) struct Claims {
    pub(crate) iss: String,
    pub(crate) sub: String,
    pub(crate) scope: String,
    pub(crate) aud: String,
    pub(crate) iat: i64,
    pub(crate) exp: i64,
}

impl Claims {
    pub(crate) fn new(identity: &SigningIdentity, audience: &str, now: DateTime) -> Self {
        let iat = now.timestamp();

        Claims {
            iss: identity.service_account_id.clone(),
            sub: identity.subject.clone(),
            scope: identity.scopes.join(" "),
            aud: audience.to_string(),
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        }
    }
}

/// Encode and sign `claims` into a compact RS256 JWT.
pub(crate) fn encode(identity: &SigningIdentity, claims: &Claims) -> Result<String> {
    jsonwebtoken::encode(&Header::new(Algorithm::RS256), claims, &identity.key).map_err(|e| {
        Error::certificate_load_failure(format!(
            "failed to sign assertion for {}",
            identity.service_account_id
        ))
        .with_source(e)
    })
}
