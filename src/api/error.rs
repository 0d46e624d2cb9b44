//! HTTP error envelope.
//!
//! Rejected form submissions are not errors here: they render as the
//! [`FormState`](crate::actions::FormState) itself. This type covers failures
//! that escape the actions and requests the dashboard cannot serve. All of
//! them share one JSON shape: `{ "error": { "code", "message" } }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::actions::{ActionError, RejectReason};
use crate::db::DataError;

/// Error codes for API responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // Client errors (4xx)
    Unauthorized,
    Conflict,
    UnprocessableEntity,

    // Server errors (5xx)
    InternalError,
    DatabaseError,
    ExternalServiceError,
}

impl ErrorCode {
    /// Get the default HTTP status code for this error code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::UnprocessableEntity => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::ExternalServiceError => StatusCode::BAD_GATEWAY,
        }
    }

    /// Get the string representation of the error code
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Unauthorized => "unauthorized",
            ErrorCode::Conflict => "conflict",
            ErrorCode::UnprocessableEntity => "unprocessable_entity",
            ErrorCode::InternalError => "internal_error",
            ErrorCode::DatabaseError => "database_error",
            ErrorCode::ExternalServiceError => "external_service_error",
        }
    }
}

impl From<RejectReason> for ErrorCode {
    fn from(reason: RejectReason) -> Self {
        match reason {
            RejectReason::Validation => ErrorCode::UnprocessableEntity,
            RejectReason::Credentials => ErrorCode::Unauthorized,
            RejectReason::Conflict => ErrorCode::Conflict,
            RejectReason::Persistence => ErrorCode::DatabaseError,
            RejectReason::Provider => ErrorCode::ExternalServiceError,
        }
    }
}

/// The inner error object in the response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

/// The full error response envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let response = ErrorResponse {
            error: ErrorBody {
                code: self.code.as_str().to_string(),
                message: self.message,
            },
        };

        (self.code.status_code(), Json(response)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<DataError> for ApiError {
    fn from(err: DataError) -> Self {
        tracing::error!("Database error: {}", err);
        match err {
            DataError::Conflict(_) => {
                ApiError::new(ErrorCode::Conflict, "A resource with this identifier already exists")
            }
            _ => ApiError::database("A database error occurred"),
        }
    }
}

/// Details stay in the log; the client only learns that the action failed.
impl From<ActionError> for ApiError {
    fn from(err: ActionError) -> Self {
        tracing::error!(error = %err, "Action failed");
        match err {
            ActionError::Data(_) => ApiError::database("A database error occurred"),
            ActionError::PasswordHash(_) | ActionError::SignIn(_) => {
                ApiError::internal("Something went wrong")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_status_codes() {
        assert_eq!(ErrorCode::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorCode::Conflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::DatabaseError.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_reject_reasons_map_to_codes() {
        assert_eq!(ErrorCode::from(RejectReason::Validation), ErrorCode::UnprocessableEntity);
        assert_eq!(ErrorCode::from(RejectReason::Credentials), ErrorCode::Unauthorized);
        assert_eq!(ErrorCode::from(RejectReason::Conflict), ErrorCode::Conflict);
        assert_eq!(ErrorCode::from(RejectReason::Persistence), ErrorCode::DatabaseError);
    }

    #[test]
    fn test_action_errors_hide_details() {
        let err = ApiError::from(ActionError::PasswordHash("bad params".to_string()));
        assert_eq!(err.code(), ErrorCode::InternalError);
        assert!(!err.to_string().contains("bad params"));
    }

    #[test]
    fn test_conflict_from_data_error() {
        let err = ApiError::from(DataError::Conflict("users.email".to_string()));
        assert_eq!(err.code(), ErrorCode::Conflict);
    }
}
