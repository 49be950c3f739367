/// Unified Error Handling Module
///
/// Every fallible operation in the application returns `Result<_, AppError>`.
/// The `ResponseError` impl is the single boundary adapter that turns an
/// error value into the transport response: a status code plus a
/// `{"error": "<message>"}` JSON body. Handlers never build error responses
/// themselves.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use std::error::Error as StdError;
use std::fmt;

/// Application error taxonomy.
///
/// `Internal` keeps the underlying detail for logs but always renders the
/// generic body message; the other variants render their message verbatim.
#[derive(Debug, Clone)]
pub enum AppError {
    /// Missing or invalid request fields, and the read-path job lookup miss.
    BadRequest(String),
    /// Missing, malformed, expired, or invalid token; login mismatch.
    Unauthenticated(String),
    /// Authenticated, but not the owner of the target resource.
    Forbidden(String),
    /// Store or hashing failure. Detail is logged, never returned.
    Internal(String),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest(message.into())
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        AppError::Unauthenticated(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        AppError::Forbidden(message.into())
    }

    /// The message sent to the client.
    fn client_message(&self) -> String {
        match self {
            AppError::BadRequest(msg)
            | AppError::Unauthenticated(msg)
            | AppError::Forbidden(msg) => msg.clone(),
            AppError::Internal(_) => "There was a server error".to_string(),
        }
    }

    fn log(&self) {
        match self {
            AppError::Internal(detail) => {
                tracing::error!(error = %detail, "Internal error");
            }
            other => {
                tracing::warn!(
                    status = other.status_code().as_u16(),
                    error = %other,
                    "Request rejected"
                );
            }
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "{}", msg),
            AppError::Unauthenticated(msg) => write!(f, "{}", msg),
            AppError::Forbidden(msg) => write!(f, "{}", msg),
            AppError::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl StdError for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        AppError::Internal(format!("password hashing failed: {}", err))
    }
}

/// Error body returned by every failed request.
#[derive(Debug, serde::Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        self.log();

        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.client_message(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(
            AppError::bad_request("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::unauthenticated("x").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::forbidden("x").status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::Internal("boom".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_detail_is_not_sent_to_client() {
        let err = AppError::Internal("duplicate key value violates unique constraint".to_string());
        assert_eq!(err.client_message(), "There was a server error");
    }

    #[test]
    fn client_errors_keep_their_message() {
        let err = AppError::forbidden("You are not authorized to edit this job.");
        assert_eq!(
            err.client_message(),
            "You are not authorized to edit this job."
        );
    }

    #[test]
    fn sqlx_errors_become_internal() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        match err {
            AppError::Internal(_) => (),
            other => panic!("expected Internal, got {:?}", other),
        }
    }
}
