use serde::Serialize;
use thiserror::Error;

/// Why an authentication attempt failed
///
/// The variants are kept apart for logging; callers outside the process only
/// ever see [`public_message`](Self::public_message).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthenticationFailure {
    #[error("malformed authentication header")]
    MalformedHeader,

    #[error("unknown user")]
    UnknownUser,

    #[error("unknown application")]
    UnknownApplication,

    #[error("invalid token secret")]
    InvalidSecret,

    #[error("invalid username or password")]
    InvalidCredentials,
}

impl AuthenticationFailure {
    /// Short machine-readable reason for structured logs
    pub fn reason(&self) -> &'static str {
        match self {
            Self::MalformedHeader => "malformed_header",
            Self::UnknownUser => "unknown_user",
            Self::UnknownApplication => "unknown_application",
            Self::InvalidSecret => "invalid_secret",
            Self::InvalidCredentials => "invalid_credentials",
        }
    }

    /// The single outward message for every failure kind
    pub fn public_message(&self) -> &'static str {
        "Authentication fails"
    }
}
