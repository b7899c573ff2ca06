//! Handler error types

use crate::codec::CodecError;
use crate::protocol::CloseCode;
use derailed_common::AppError;
use derailed_core::DomainError;
use thiserror::Error;
use validator::ValidationErrors;

/// Handler error type
///
/// Every variant is fatal to the connection.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Frame could not be decoded
    #[error("Invalid payload encoding: {0}")]
    Decode(#[from] CodecError),

    /// Frame decoded to something other than an object
    #[error("Payload is not an object")]
    NotAnObject,

    /// `op` missing, non-integer, or without a handler
    #[error("Missing or invalid op code")]
    InvalidOpcode,

    /// Schema validation failed; holds the encoded error
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Token, device or user could not be resolved, or the store failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The authenticated identity was deleted
    #[error("Identity deleted")]
    IdentityDeleted,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Close code to send, `None` for internal failures
    pub fn to_close_code(&self) -> Option<CloseCode> {
        match self {
            Self::Decode(_) => Some(CloseCode::InvalidEncoding),
            Self::NotAnObject => Some(CloseCode::NotAnObject),
            Self::InvalidOpcode => Some(CloseCode::InvalidOpcode),
            Self::Validation(_) => Some(CloseCode::ValidationFailed),
            Self::AuthenticationFailed(_) => Some(CloseCode::AuthenticationFailed),
            Self::IdentityDeleted => Some(CloseCode::IdentityDeleted),
            Self::Internal(_) => None,
        }
    }

    /// Schema failure raised while deserializing a request body
    pub fn schema(err: &serde_json::Error) -> Self {
        Self::Validation(serde_json::json!({ "d": [err.to_string()] }).to_string())
    }

    /// Reason put in the close frame
    ///
    /// Only validation failures carry detail back to the client.
    pub fn close_reason(&self) -> String {
        match self {
            Self::Validation(reason) => reason.clone(),
            Self::Internal(_) => "internal_error".to_string(),
            other => other
                .to_close_code()
                .map(CloseCode::description)
                .unwrap_or_default()
                .to_string(),
        }
    }
}

impl From<ValidationErrors> for HandlerError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(serde_json::to_string(&errors).unwrap_or_else(|_| errors.to_string()))
    }
}

impl From<DomainError> for HandlerError {
    fn from(err: DomainError) -> Self {
        if !err.is_not_found() {
            tracing::warn!(error = %err, "Backing store failed during ready");
        }
        Self::AuthenticationFailed(err.to_string())
    }
}

impl From<AppError> for HandlerError {
    fn from(err: AppError) -> Self {
        Self::AuthenticationFailed(err.to_string())
    }
}

/// Handler result type
pub type HandlerResult<T> = Result<T, HandlerError>;
