//! Errors that end a connection session before it becomes active.
use std::error::Error as StdError;
use std::fmt;

use domain::error::Error as DomainError;

pub type Result<T> = core::result::Result<T, Error>;

/// WebSocket close code sent when the access token is rejected.
pub const CLOSE_AUTH_FAILED: u16 = 4001;
/// WebSocket close code sent when the first message is not a text frame.
pub const CLOSE_WRONG_MESSAGE_TYPE: u16 = 4002;
/// WebSocket close code sent when no access token arrives in time.
pub const CLOSE_HANDSHAKE_TIMEOUT: u16 = 4008;

#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    Handshake(HandshakeErrorKind),
    /// The access token did not verify.
    Auth,
    /// The underlying socket failed.
    Transport,
}

#[derive(Debug, PartialEq)]
pub enum HandshakeErrorKind {
    WrongMessageType,
    Timeout,
    /// The peer went away before sending its access token.
    Closed,
}

impl Error {
    pub(crate) fn handshake(kind: HandshakeErrorKind) -> Self {
        Error {
            source: None,
            error_kind: ErrorKind::Handshake(kind),
        }
    }

    /// The close frame to send to the peer, if the socket is still usable.
    pub fn close_frame(&self) -> Option<(u16, &'static str)> {
        match self.error_kind {
            ErrorKind::Auth => Some((CLOSE_AUTH_FAILED, "Authentication failed")),
            ErrorKind::Handshake(HandshakeErrorKind::WrongMessageType) => {
                Some((CLOSE_WRONG_MESSAGE_TYPE, "Expected access token as text"))
            }
            ErrorKind::Handshake(HandshakeErrorKind::Timeout) => {
                Some((CLOSE_HANDSHAKE_TIMEOUT, "Access token not received"))
            }
            ErrorKind::Handshake(HandshakeErrorKind::Closed) | ErrorKind::Transport => None,
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

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{:?}: {source}", self.error_kind),
            None => write!(f, "{:?}", self.error_kind),
        }
    }
}

impl From<DomainError> for Error {
    fn from(err: DomainError) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: ErrorKind::Auth,
        }
    }
}

impl From<axum::Error> for Error {
    fn from(err: axum::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: ErrorKind::Transport,
        }
    }
}
