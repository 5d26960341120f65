use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// A required setting (signing secret, database URI) is absent or unusable.
    ConfigurationMissing(String),
    MissingHeaders,
    VerificationFailed(String),
    InvalidPayload(String),
    MissingIdentifier,
    PersistenceFailure(String),
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ConfigurationMissing(msg) => write!(f, "Configuration missing: {}", msg),
            AppError::MissingHeaders => write!(f, "Missing Svix headers"),
            AppError::VerificationFailed(msg) => write!(f, "Verification error: {}", msg),
            AppError::InvalidPayload(msg) => write!(f, "Invalid data structure: {}", msg),
            AppError::MissingIdentifier => write!(f, "User ID is missing"),
            AppError::PersistenceFailure(msg) => write!(f, "Persistence failure: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingHeaders
            | AppError::VerificationFailed(_)
            | AppError::InvalidPayload(_)
            | AppError::MissingIdentifier => StatusCode::BAD_REQUEST,
            AppError::ConfigurationMissing(_) | AppError::PersistenceFailure(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Server-side details stay in the logs
        let error = match self {
            AppError::ConfigurationMissing(_) | AppError::PersistenceFailure(_) => {
                "Error occured".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            success: false,
            error,
        })
    }
}
