//! Error types for the `events` crate.
use std::error::Error as StdError;
use std::fmt;

/// Top-level error type for the bus side of the relay.
/// Holds the error kind and the optional underlying error for chaining.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    /// A bus payload was not a well-formed list of event records.
    Decode,
    /// The connection to the event bus failed or was lost.
    Bus,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let description = match self.error_kind {
            ErrorKind::Decode => "malformed event payload",
            ErrorKind::Bus => "event bus connection lost",
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

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: ErrorKind::Decode,
        }
    }
}

impl From<redis::RedisError> for Error {
    fn from(err: redis::RedisError) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: ErrorKind::Bus,
        }
    }
}
