use thiserror::Error;

use crate::session::SessionError;
use crate::userdb::{UserError, ValidationErrors};
use crate::utils::UtilError;

/// Errors returned by the account actions
#[derive(Error, Debug)]
pub enum CoordinationError {
    /// Submitted form data failed validation
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Credentials did not match
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Acting user may not perform the action
    #[error("Unauthorized access")]
    Unauthorized,

    /// An administrator tried to delete their own account
    #[error("Administrators cannot delete themselves")]
    SelfDeletion,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Resource not found: {resource_type} {resource_id}")]
    ResourceNotFound {
        resource_type: String,
        resource_id: String,
    },

    /// Error from the user database operations
    #[error("User error: {0}")]
    UserError(UserError),

    /// Error from Session operations
    #[error("Session error: {0}")]
    SessionError(SessionError),

    /// Error from utils operations
    #[error("Utils error: {0}")]
    UtilsError(UtilError),
}

impl CoordinationError {
    /// Log the error and return self
    pub fn log(self) -> Self {
        match &self {
            Self::Validation(errors) => tracing::debug!("Validation failed: {}", errors),
            Self::Authentication(msg) => tracing::info!("Authentication error: {}", msg),
            Self::Unauthorized => tracing::warn!("Unauthorized access"),
            Self::SelfDeletion => tracing::warn!("Administrator attempted self deletion"),
            Self::Database(msg) => tracing::error!("Database error: {}", msg),
            Self::ResourceNotFound {
                resource_type,
                resource_id,
            } => tracing::debug!("Resource not found: {} {}", resource_type, resource_id),
            Self::UserError(err) => tracing::error!("User error: {}", err),
            Self::SessionError(err) => tracing::error!("Session error: {}", err),
            Self::UtilsError(err) => tracing::error!("Utils error: {}", err),
        }
        self
    }

    pub(super) fn user_not_found(user_id: i64) -> Self {
        Self::ResourceNotFound {
            resource_type: "User".to_string(),
            resource_id: user_id.to_string(),
        }
    }
}

// From implementations log on conversion

impl From<SessionError> for CoordinationError {
    fn from(err: SessionError) -> Self {
        let error = Self::SessionError(err);
        tracing::error!("{}", error);
        error
    }
}

impl From<UserError> for CoordinationError {
    fn from(err: UserError) -> Self {
        let error = Self::UserError(err);
        tracing::error!("{}", error);
        error
    }
}

impl From<UtilError> for CoordinationError {
    fn from(err: UtilError) -> Self {
        let error = Self::UtilsError(err);
        tracing::error!("{}", error);
        error
    }
}
