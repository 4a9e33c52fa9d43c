//! Error types for the `domain` layer.
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
/// Errors are modeled as an `error_kind` tree plus the optional original error
/// in `source`, so that callers can branch on the kind without depending on
/// the crates that produced the underlying error.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Auth(AuthErrorKind),
}

/// Reasons a bearer token was not accepted.
#[derive(Debug, PartialEq)]
pub enum AuthErrorKind {
    /// Malformed token, bad signature or unsupported algorithm.
    Invalid,
    Expired,
    /// The token verified but carries no usable `user_id` claim.
    MissingIdentity,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Domain Error: {:?}", self.error_kind)?;
        if let Some(source) = &self.source {
            write!(f, " ({source})")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        let auth_error_kind = match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthErrorKind::Expired,
            _ => AuthErrorKind::Invalid,
        };

        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Auth(auth_error_kind),
        }
    }
}
