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

use std::fmt;
use thiserror::Error;

/// The error type for directory-auth operations
#[derive(Error, Debug)]
#[error("{kind}: {message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<anyhow::Error>,
}

/// The kind of error that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Certificate is missing, unreadable, in the wrong format, or the password is wrong
    CertificateLoadFailure,

    /// Token exchange was rejected, timed out, or returned an empty result
    AuthenticationFailure,

    /// Credential is missing, expired, or was never authenticated
    InvalidCredential,

    /// Request cannot be built (invalid uri, header, etc.)
    RequestInvalid,

    /// Configuration error (missing fields, invalid values)
    ConfigInvalid,

    /// Unexpected errors (network, I/O, service errors, etc.)
    Unexpected,
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the error message without the kind prefix
    pub fn message(&self) -> &str {
        &self.message
    }

}

// Convenience constructors
impl Error {
    /// Create a certificate load failure
    pub fn certificate_load_failure(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CertificateLoadFailure, message)
    }

    /// Create an authentication failure
    pub fn authentication_failure(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AuthenticationFailure, message)
    }

    /// Create an invalid credential error
    pub fn invalid_credential(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidCredential, message)
    }

    /// Create a request invalid error
    pub fn request_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RequestInvalid, message)
    }

    /// Create a config invalid error
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::CertificateLoadFailure => write!(f, "certificate load failure"),
            ErrorKind::AuthenticationFailure => write!(f, "authentication failure"),
            ErrorKind::InvalidCredential => write!(f, "invalid credential"),
            ErrorKind::RequestInvalid => write!(f, "invalid request"),
            ErrorKind::ConfigInvalid => write!(f, "invalid configuration"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

// Common From implementations
impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::error::Error as _;

    #[test]
    fn test_display_includes_kind() {
        let err = Error::authentication_failure("request for access token failed");
        assert_eq!(
            err.to_string(),
            "authentication failure: request for access token failed"
        );
        assert_eq!(err.message(), "request for access token failed");
    }

    #[test]
    fn test_source_is_kept() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = Error::certificate_load_failure("failed to read certificate").with_source(io);
        assert_eq!(err.kind(), ErrorKind::CertificateLoadFailure);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_from_http_error_is_request_invalid() {
        let err: Error = http::Request::get("http://[::1")
            .body(())
            .unwrap_err()
            .into();
        assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    }
}
