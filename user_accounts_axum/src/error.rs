use http::{Result as HttpResponse, StatusCode};
use user_accounts::{CoordinationError, SessionError};

/// Helper trait for converting errors to a standard response error format
pub trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)>;
}

/// Map each coordination failure to the status code a page handler answers with
impl<T> IntoResponseError<T> for Result<T, CoordinationError> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| {
            let status = match e {
                CoordinationError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                CoordinationError::Authentication(_) => StatusCode::UNAUTHORIZED,
                CoordinationError::Unauthorized => StatusCode::FORBIDDEN,
                CoordinationError::SelfDeletion => StatusCode::FORBIDDEN,
                CoordinationError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, e.to_string())
        })
    }
}

/// Cookie and session store failures while building a response
impl<T> IntoResponseError<T> for Result<T, SessionError> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| {
            tracing::error!("Session operation failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })
    }
}

/// Implementation for http::Error (used by Response::builder())
impl<T> IntoResponseError<T> for HttpResponse<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
    }
}

/// Template rendering failures are server errors
impl<T> IntoResponseError<T> for askama::Result<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| {
            tracing::error!("Template rendering failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })
    }
}
