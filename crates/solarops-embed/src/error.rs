//! Errors surfaced by the embed token subsystem.

use std::fmt;

use crate::store::StoreError;

/// Why a token was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    /// Wrong segment count, undecodable segments, or claims of the wrong shape.
    Malformed,
    /// Signature does not match the configured secret.
    BadSignature,
    /// `exp` lies in the past.
    Expired,
}

impl TokenRejection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Malformed => "malformed",
            Self::BadSignature => "bad_signature",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for TokenRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EmbedError {
    #[error("Invalid embed token ({0})")]
    InvalidToken(TokenRejection),

    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Job id must not be empty")]
    EmptyJobId,

    #[error("Token signing failed: {0}")]
    Signing(String),

    #[error("Token expiry {0} is outside the representable range")]
    ExpiryOutOfRange(i64),

    #[error("Job store error: {0}")]
    Store(#[source] StoreError),
}

impl EmbedError {
    /// The rejection reason, if this is an invalid-token error.
    pub const fn rejection(&self) -> Option<TokenRejection> {
        match self {
            Self::InvalidToken(reason) => Some(*reason),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, EmbedError>;
