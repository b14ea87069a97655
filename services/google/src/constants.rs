//! Well-known names and defaults.

use std::time::Duration;

// Env values used to configure directory access.
pub const GOOGLE_SERVICE_ACCOUNT_ID: &str = "GOOGLE_SERVICE_ACCOUNT_ID";
pub const GOOGLE_CERTIFICATE_PATH: &str = "GOOGLE_CERTIFICATE_PATH";
pub const GOOGLE_CERTIFICATE_PASSWORD: &str = "GOOGLE_CERTIFICATE_PASSWORD";
pub const GOOGLE_IMPERSONATED_USER: &str = "GOOGLE_IMPERSONATED_USER";
pub const GOOGLE_SCOPE: &str = "GOOGLE_SCOPE";
pub const GOOGLE_TOKEN_URI: &str = "GOOGLE_TOKEN_URI";
pub const GOOGLE_TOKEN_EXCHANGE_TIMEOUT: &str = "GOOGLE_TOKEN_EXCHANGE_TIMEOUT";
pub const GOOGLE_DIRECTORY_ENDPOINT: &str = "GOOGLE_DIRECTORY_ENDPOINT";
pub const GOOGLE_DIRECTORY_CUSTOMER: &str = "GOOGLE_DIRECTORY_CUSTOMER";
pub const GOOGLE_DIRECTORY_MAX_RESULTS: &str = "GOOGLE_DIRECTORY_MAX_RESULTS";

/// Read-only access to users and user aliases.
pub const DEFAULT_SCOPE: &str = "https://www.googleapis.com/auth/admin.directory.user.readonly";

/// OAuth2 token endpoint, also used as the `aud` claim of the assertion.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Admin SDK endpoint.
pub const DEFAULT_DIRECTORY_ENDPOINT: &str = "https://admin.googleapis.com";

/// Alias for the Workspace account of the authenticated identity.
pub const MY_CUSTOMER: &str = "my_customer";

pub const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Google rejects assertions valid for longer than one hour.
pub const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Tokens this close to expiry are treated as expired.
pub const TOKEN_EXPIRY_BUFFER_SECS: i64 = 30;

pub const DEFAULT_EXCHANGE_TIMEOUT: Duration = Duration::from_secs(30);

pub const DEFAULT_MAX_RESULTS: u32 = 10;
pub const MAX_RESULTS_LIMIT: u32 = 500;
