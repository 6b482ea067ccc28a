use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use validator::ValidationErrors;

use crate::services::{ServiceResponse, ServiceStatus};

/// Structured error response returned by all API endpoints on failure.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `ID_MISMATCH`,
    /// `NOT_FOUND`, `ALREADY_EXISTS`, `NOT_LINKED`, `TOKEN_MISSING`, `TOKEN_INVALID`,
    /// `INVALID_CREDENTIALS`, `USERNAME_TAKEN`, `INTERNAL_ERROR`.
    #[schema(example = "NOT_FOUND")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Teacher not found.")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    /// Path id and payload id of an update disagree.
    IdMismatch(String),
    NotFound(String),
    AlreadyExists(String),
    NotLinked(String),
    TokenMissing,
    TokenInvalid,
    InvalidCredentials,
    UsernameTaken,
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::IdMismatch(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyExists(_) | AppError::NotLinked(_) | AppError::UsernameTaken => {
                StatusCode::CONFLICT
            }
            AppError::TokenMissing | AppError::TokenInvalid | AppError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub(crate) fn status_and_body(self) -> (StatusCode, ErrorBody) {
        let status = self.status();
        let body = match self {
            AppError::Validation(msg) => ErrorBody {
                code: "VALIDATION_ERROR",
                message: msg,
            },
            AppError::IdMismatch(msg) => ErrorBody {
                code: "ID_MISMATCH",
                message: msg,
            },
            AppError::NotFound(msg) => ErrorBody {
                code: "NOT_FOUND",
                message: msg,
            },
            AppError::AlreadyExists(msg) => ErrorBody {
                code: "ALREADY_EXISTS",
                message: msg,
            },
            AppError::NotLinked(msg) => ErrorBody {
                code: "NOT_LINKED",
                message: msg,
            },
            AppError::TokenMissing => ErrorBody {
                code: "TOKEN_MISSING",
                message: "Authentication token is missing".into(),
            },
            AppError::TokenInvalid => ErrorBody {
                code: "TOKEN_INVALID",
                message: "Authentication token is invalid or expired".into(),
            },
            AppError::InvalidCredentials => ErrorBody {
                code: "INVALID_CREDENTIALS",
                message: "Invalid username or password".into(),
            },
            AppError::UsernameTaken => ErrorBody {
                code: "USERNAME_TAKEN",
                message: "Username is already taken".into(),
            },
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorBody {
                    code: "INTERNAL_ERROR",
                    message: "An unexpected error occurred".into(),
                }
            }
        };
        (status, body)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Maps a failed service outcome onto its HTTP error. Success statuses never
/// reach this conversion through the handlers; they fall through to `Internal`.
impl From<ServiceResponse> for AppError {
    fn from(resp: ServiceResponse) -> Self {
        let message = resp.message();
        match resp.status {
            ServiceStatus::NotFound => AppError::NotFound(message),
            ServiceStatus::AlreadyExists => AppError::AlreadyExists(message),
            ServiceStatus::NotLinked => AppError::NotLinked(message),
            ServiceStatus::Error => AppError::Internal(message),
            ServiceStatus::Created | ServiceStatus::Updated | ServiceStatus::Deleted => {
                AppError::Internal(format!("unexpected {:?} outcome: {message}", resp.status))
            }
        }
    }
}
