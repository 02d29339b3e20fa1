//! Error handling middleware - RFC 7807 compliant responses.

use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, ResponseError};
use quill_core::error::{DomainError, RepoError};
use quill_core::ports::{MailError, RenderError};
use quill_shared::ErrorResponse;
use std::fmt;

/// Application-level error type that converts to RFC 7807 responses.
///
/// Form validation failures are not errors here: they are rendered inline with the form.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    /// Carries the methods the resource does accept.
    MethodNotAllowed(&'static [&'static str]),
    Conflict(String),
    /// The mail transport rejected a message.
    DispatchFailure(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::MethodNotAllowed(allowed) => {
                write!(f, "Method not allowed (allowed: {})", allowed.join(", "))
            }
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::DispatchFailure(msg) => write!(f, "Mail dispatch failed: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::DispatchFailure(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::MethodNotAllowed(allowed) => {
                let allowed = allowed.join(", ");
                builder.insert_header((header::ALLOW, allowed.clone()));
                ErrorResponse::method_not_allowed(format!("Use {allowed}"))
            }
            AppError::Conflict(detail) => ErrorResponse::new(409, "Conflict").with_detail(detail),
            AppError::DispatchFailure(detail) => {
                tracing::error!("Mail dispatch failed: {}", detail);
                ErrorResponse::internal_error()
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        };

        builder.json(error)
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { .. } => AppError::NotFound(err.to_string()),
            DomainError::Validation(_) | DomainError::InvalidTransition { .. } => {
                AppError::Conflict(err.to_string())
            }
            DomainError::Repository(repo) => repo.into(),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => AppError::Conflict(msg),
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

impl From<MailError> for AppError {
    fn from(err: MailError) -> Self {
        AppError::DispatchFailure(err.to_string())
    }
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::from(DomainError::not_found("Post", "x")).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(MailError::Transport("down".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::from(DomainError::Repository(RepoError::Constraint("dup".into())))
                .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(DomainError::Validation("title is required".into())).status_code(),
            StatusCode::CONFLICT
        );
    }

    #[actix_web::test]
    async fn test_method_not_allowed_response() {
        let response = AppError::MethodNotAllowed(&["POST"]).error_response();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers().get(header::ALLOW).unwrap(), "POST");

        let body = to_bytes(response.into_body()).await.unwrap();
        let problem: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(problem["status"], 405);
        assert_eq!(problem["title"], "Method Not Allowed");
    }

    #[actix_web::test]
    async fn test_dispatch_failure_hides_detail() {
        let response = AppError::DispatchFailure("smtp down".into()).error_response();
        let body = to_bytes(response.into_body()).await.unwrap();
        let problem: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(problem["status"], 500);
        assert!(problem.get("detail").is_none());
    }
}
