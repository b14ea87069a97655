use std::fmt::{self, Debug};
use std::time::Duration;

use directory_auth_core::{utils::Redact, Context, Error, Result};
use log::debug;
use serde::Serialize;

use crate::constants::*;

/// CredentialParameters carries everything needed to obtain a delegated
/// credential for a service account.
///
/// The value is immutable once built: the `with_*` methods consume and
/// return it, and there are no setters.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialParameters {
    service_account_id: String,
    certificate_path: String,
    #[serde(skip)]
    certificate_password: Option<String>,
    impersonated_user: String,
    scopes: Vec<String>,
    token_uri: String,
    #[serde(skip)]
    exchange_timeout: Duration,
}

impl Debug for CredentialParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialParameters")
            .field("service_account_id", &self.service_account_id)
            .field("certificate_path", &self.certificate_path)
            .field(
                "certificate_password",
                &Redact::from(&self.certificate_password),
            )
            .field("impersonated_user", &self.impersonated_user)
            .field("scopes", &self.scopes)
            .field("token_uri", &self.token_uri)
            .field("exchange_timeout", &self.exchange_timeout)
            .finish()
    }
}

impl CredentialParameters {
    /// Create parameters for impersonating `impersonated_user` with the given scopes.
    ///
    /// Blank scopes are dropped and duplicates are removed, keeping the
    /// first occurrence.
    pub fn new<I, S>(
        service_account_id: impl Into<String>,
        certificate_path: impl Into<String>,
        impersonated_user: impl Into<String>,
        scopes: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut deduped: Vec<String> = Vec::new();
        for scope in scopes {
            let scope = scope.into().trim().to_string();
            if !scope.is_empty() && !deduped.contains(&scope) {
                deduped.push(scope);
            }
        }

        Self {
            service_account_id: service_account_id.into(),
            certificate_path: certificate_path.into(),
            certificate_password: None,
            impersonated_user: impersonated_user.into(),
            scopes: deduped,
            token_uri: DEFAULT_TOKEN_URI.to_string(),
            exchange_timeout: DEFAULT_EXCHANGE_TIMEOUT,
        }
    }

    /// Set the password protecting an encrypted certificate.
    pub fn with_certificate_password(mut self, password: impl Into<String>) -> Self {
        self.certificate_password = Some(password.into());
        self
    }

    /// Set the OAuth2 token endpoint.
    pub fn with_token_uri(mut self, token_uri: impl Into<String>) -> Self {
        self.token_uri = token_uri.into();
        self
    }

    /// Set the upper bound of the token exchange.
    pub fn with_exchange_timeout(mut self, timeout: Duration) -> Self {
        self.exchange_timeout = timeout;
        self
    }

    /// Load parameters from environment variables.
    ///
    /// `GOOGLE_SERVICE_ACCOUNT_ID`, `GOOGLE_CERTIFICATE_PATH` and
    /// `GOOGLE_IMPERSONATED_USER` are required. `GOOGLE_SCOPE` accepts a
    /// space or comma separated list and falls back to the read-only user
    /// scope.
    pub fn from_env(ctx: &Context) -> Result<Self> {
        let required = |key: &str| {
            ctx.env_var(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| Error::config_invalid(format!("env {key} must be set")))
        };

        let service_account_id = required(GOOGLE_SERVICE_ACCOUNT_ID)?;
        let certificate_path = required(GOOGLE_CERTIFICATE_PATH)?;
        let impersonated_user = required(GOOGLE_IMPERSONATED_USER)?;

        let scopes = match ctx.env_var(GOOGLE_SCOPE) {
            Some(v) if !v.trim().is_empty() => split_scopes(&v),
            _ => vec![DEFAULT_SCOPE.to_string()],
        };

        let mut params = Self::new(
            service_account_id,
            certificate_path,
            impersonated_user,
            scopes,
        );

        if let Some(v) = ctx
            .env_var(GOOGLE_CERTIFICATE_PASSWORD)
            .filter(|v| !v.trim().is_empty())
        {
            params = params.with_certificate_password(v);
        }

        if let Some(v) = ctx.env_var(GOOGLE_TOKEN_URI) {
            params = params.with_token_uri(v);
        }

        if let Some(v) = ctx.env_var(GOOGLE_TOKEN_EXCHANGE_TIMEOUT) {
            let secs: u64 = v.trim().parse().map_err(|e| {
                Error::config_invalid(format!(
                    "env {GOOGLE_TOKEN_EXCHANGE_TIMEOUT} must be a number of seconds, got {v}"
                ))
                .with_source(e)
            })?;
            params = params.with_exchange_timeout(Duration::from_secs(secs));
        }

        debug!("loaded credential parameters from env: {params:?}");
        Ok(params)
    }

    /// The service account id, usually `*@*.iam.gserviceaccount.com`.
    pub fn service_account_id(&self) -> &str {
        &self.service_account_id
    }

    /// Path of the private key material.
    pub fn certificate_path(&self) -> &str {
        &self.certificate_path
    }

    /// Password of an encrypted certificate, if configured.
    pub fn certificate_password(&self) -> Option<&str> {
        self.certificate_password.as_deref()
    }

    /// The user the service account acts on behalf of.
    pub fn impersonated_user(&self) -> &str {
        &self.impersonated_user
    }

    /// Requested scopes in request order.
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// OAuth2 token endpoint.
    pub fn token_uri(&self) -> &str {
        &self.token_uri
    }

    /// Upper bound of the token exchange.
    pub fn exchange_timeout(&self) -> Duration {
        self.exchange_timeout
    }

    /// Check the input constraints of a token exchange.
    pub fn validate(&self) -> Result<()> {
        if self.service_account_id.trim().is_empty() {
            return Err(Error::config_invalid("service account id must not be empty"));
        }
        if self.impersonated_user.trim().is_empty() {
            return Err(Error::config_invalid("impersonated user must not be empty"));
        }
        if self.scopes.is_empty() {
            return Err(Error::config_invalid("at least one scope is required"));
        }
        if self.certificate_path.trim().is_empty() {
            return Err(Error::config_invalid("certificate path must not be empty"));
        }
        if self.exchange_timeout.is_zero() {
            return Err(Error::config_invalid("exchange timeout must be positive"));
        }

        let uri: http::Uri = self.token_uri.parse().map_err(|e| {
            Error::config_invalid(format!("token uri {} is invalid", self.token_uri)).with_source(e)
        })?;
        if uri.scheme().is_none() || uri.host().is_none() {
            return Err(Error::config_invalid(format!(
                "token uri {} must be absolute",
                self.token_uri
            )));
        }

        Ok(())
    }

    /// Serialize to JSON for diagnostics. The certificate password is never included.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{self:?}"))
    }
}

impl fmt::Display for CredentialParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json())
    }
}

fn split_scopes(v: &str) -> Vec<String> {
    v.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use directory_auth_core::{ErrorKind, StaticEnv};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    const SVC: &str = "svc@project.iam.gserviceaccount.com";

    fn ctx_with(envs: &[(&str, &str)]) -> Context {
        Context::new().with_env(StaticEnv {
            home_dir: None,
            envs: envs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        })
    }

    #[test]
    fn test_new_dedupes_scopes() {
        let params = CredentialParameters::new(
            SVC,
            "/tmp/key.pem",
            "admin@example.com",
            ["scope-b", " scope-a ", "", "scope-b"],
        );
        assert_eq!(params.scopes(), &["scope-b".to_string(), "scope-a".to_string()]);
        assert_eq!(params.token_uri(), DEFAULT_TOKEN_URI);
        assert_eq!(params.exchange_timeout(), DEFAULT_EXCHANGE_TIMEOUT);
        assert_eq!(params.certificate_password(), None);
    }

    #[test]
    fn test_from_env() {
        let ctx = ctx_with(&[
            (GOOGLE_SERVICE_ACCOUNT_ID, SVC),
            (GOOGLE_CERTIFICATE_PATH, "/etc/keys/svc.pem"),
            (GOOGLE_IMPERSONATED_USER, "admin@example.com"),
            (
                GOOGLE_SCOPE,
                "https://www.googleapis.com/auth/admin.directory.user.readonly, https://www.googleapis.com/auth/admin.directory.group.readonly",
            ),
            (GOOGLE_CERTIFICATE_PASSWORD, "notasecret"),
            (GOOGLE_TOKEN_EXCHANGE_TIMEOUT, "5"),
        ]);

        let params = CredentialParameters::from_env(&ctx).unwrap();
        assert_eq!(params.service_account_id(), SVC);
        assert_eq!(params.certificate_path(), "/etc/keys/svc.pem");
        assert_eq!(params.impersonated_user(), "admin@example.com");
        assert_eq!(params.scopes().len(), 2);
        assert_eq!(params.certificate_password(), Some("notasecret"));
        assert_eq!(params.exchange_timeout(), Duration::from_secs(5));
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_from_env_blank_password() {
        let ctx = ctx_with(&[
            (GOOGLE_SERVICE_ACCOUNT_ID, SVC),
            (GOOGLE_CERTIFICATE_PATH, "/etc/keys/svc.pem"),
            (GOOGLE_IMPERSONATED_USER, "admin@example.com"),
            (GOOGLE_CERTIFICATE_PASSWORD, ""),
        ]);

        let params = CredentialParameters::from_env(&ctx).unwrap();
        assert_eq!(params.certificate_password(), None);
    }

    #[test]
    fn test_from_env_default_scope() {
        let ctx = ctx_with(&[
            (GOOGLE_SERVICE_ACCOUNT_ID, SVC),
            (GOOGLE_CERTIFICATE_PATH, "/etc/keys/svc.pem"),
            (GOOGLE_IMPERSONATED_USER, "admin@example.com"),
        ]);

        let params = CredentialParameters::from_env(&ctx).unwrap();
        assert_eq!(params.scopes(), &[DEFAULT_SCOPE.to_string()]);
    }

    #[test]
    fn test_from_env_missing_required() {
        let ctx = ctx_with(&[
            (GOOGLE_SERVICE_ACCOUNT_ID, SVC),
            (GOOGLE_IMPERSONATED_USER, "admin@example.com"),
        ]);

        let err = CredentialParameters::from_env(&ctx).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        assert!(err.to_string().contains(GOOGLE_CERTIFICATE_PATH));
    }

    #[test]
    fn test_from_env_bad_timeout() {
        let ctx = ctx_with(&[
            (GOOGLE_SERVICE_ACCOUNT_ID, SVC),
            (GOOGLE_CERTIFICATE_PATH, "/etc/keys/svc.pem"),
            (GOOGLE_IMPERSONATED_USER, "admin@example.com"),
            (GOOGLE_TOKEN_EXCHANGE_TIMEOUT, "soon"),
        ]);

        let err = CredentialParameters::from_env(&ctx).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[test]
    fn test_validate() {
        let ok = CredentialParameters::new(SVC, "/k.pem", "admin@example.com", [DEFAULT_SCOPE]);
        assert!(ok.validate().is_ok());

        let cases = [
            CredentialParameters::new("", "/k.pem", "admin@example.com", [DEFAULT_SCOPE]),
            CredentialParameters::new(SVC, "/k.pem", " ", [DEFAULT_SCOPE]),
            CredentialParameters::new(SVC, "/k.pem", "admin@example.com", Vec::<String>::new()),
            CredentialParameters::new(SVC, "", "admin@example.com", [DEFAULT_SCOPE]),
            ok.clone().with_token_uri("/token"),
            ok.clone().with_exchange_timeout(Duration::ZERO),
        ];
        for params in cases {
            let err = params.validate().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ConfigInvalid, "{params:?}");
        }
    }

    #[test]
    fn test_json_never_contains_password() {
        let params = CredentialParameters::new(SVC, "/k.pem", "admin@example.com", [DEFAULT_SCOPE])
            .with_certificate_password("notasecret");

        let json = params.to_json();
        assert!(!json.contains("notasecret"));
        assert!(json.contains(r#""serviceAccountId":"svc@project.iam.gserviceaccount.com""#));
        assert!(json.contains(r#""impersonatedUser":"admin@example.com""#));

        let debug = format!("{params:?}");
        assert!(!debug.contains("notasecret"));
    }
}
