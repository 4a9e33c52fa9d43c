//! Error types for the `relay` crate.
use std::error::Error as StdError;
use std::fmt;

/// Top-level error type for the relay core.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    /// The connection is not (or no longer) registered for the user.
    NotFound,
    /// Writing a payload to a connection failed.
    Write,
    /// Writing a payload to a connection did not finish in time.
    Timeout,
}

impl Error {
    /// Wraps a transport error raised while writing to a connection.
    pub fn write<E>(err: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        Error {
            source: Some(err.into()),
            error_kind: ErrorKind::Write,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let description = match self.error_kind {
            ErrorKind::NotFound => "connection not found",
            ErrorKind::Write => "connection write failed",
            ErrorKind::Timeout => "connection write timed out",
        };
        match &self.source {
            Some(source) => write!(f, "{description}: {source}"),
            None => write!(f, "{description}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}
