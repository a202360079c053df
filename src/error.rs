use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;
use crate::core::MatchError;
use crate::models::ErrorResponse;
use crate::services::{RepositoryError, ServiceError};

/// Errors returned by HTTP handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Match(#[from] MatchError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Match(e) => ApiError::Match(e),
            ServiceError::Repository(e) => ApiError::Repository(e),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::BadRequest(format!("Validation failed: {}", errors))
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Match(MatchError::InvalidReferencePlan { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Match(MatchError::InvalidDateRange { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Repository(RepositoryError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Repository(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            // Upstream details stay in the logs
            ApiError::Repository(RepositoryError::NotFound(msg)) => msg.clone(),
            ApiError::Repository(e) => {
                tracing::error!("Plan repository failure: {}", e);
                "Travel plans are temporarily unavailable, please retry".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse::new(message))
    }
}
