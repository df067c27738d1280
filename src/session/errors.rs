//! Error types for session validation

use thiserror::Error;

/// Why a session cannot be used
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// No session has been created
    #[error("No session found, please log in")]
    NoSession,

    /// Access token is past its expiry
    #[error("Session token expired, please log in again")]
    ExpiredToken,

    /// Access token is not a JWT
    #[error("Invalid session token")]
    InvalidToken,

    /// Token payload is not valid base64
    #[error("Session token could not be decoded")]
    DecodeToken,

    /// Token payload is not a valid claims object
    #[error("Session token payload is malformed")]
    ConvertToStruct,

    /// Session file could not be read or written
    #[error("Session storage error: {0}")]
    Io(String),
}

impl From<std::io::Error> for SessionError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
