use thiserror::Error;

use crate::auth::AuthError;
use crate::database::DatabaseError;
use crate::share::ShareError;

/// Errors returned by the entity and share services.
/// Messages are user-facing and shown as-is by the CLI and TUI.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Kein eingeloggter Benutzer.")]
    NotLoggedIn,
    #[error("{0}")]
    Forbidden(String),
    #[error(transparent)]
    Share(#[from] ShareError),
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation(message.into())
    }

    /// Share resolution code, when this error came from the share path
    pub fn share_code(&self) -> Option<&'static str> {
        match self {
            ServiceError::Share(e) => Some(e.code()),
            _ => None,
        }
    }
}
