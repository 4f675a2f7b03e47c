use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::services::validation::FieldErrors;

pub const UNREACHABLE_MESSAGE: &str = "Could not reach prediction server";
pub const UNKNOWN_REJECTION: &str = "Unknown error";

/// Failure of a single call to the model service.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmissionError {
    /// The service answered with `success: false`.
    #[error("{0}")]
    ServerRejected(String),

    /// Transport failure or a body that is not a JSON object.
    #[error("prediction server unreachable: {0}")]
    Unreachable(String),
}

impl SubmissionError {
    pub fn title(&self) -> &'static str {
        match self {
            SubmissionError::ServerRejected(_) => "Prediction Failed",
            SubmissionError::Unreachable(_) => "Server Error",
        }
    }

    /// Message safe to show to the user. Transport details stay in the logs.
    pub fn user_message(&self) -> &str {
        match self {
            SubmissionError::ServerRejected(message) => message,
            SubmissionError::Unreachable(_) => UNREACHABLE_MESSAGE,
        }
    }
}

#[derive(Error, Debug)]
pub enum ShareError {
    #[error("Share channel failed: {0}")]
    Channel(String),

    #[error("Clipboard write failed: {0}")]
    Clipboard(String),
}

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Please fix the errors in the form")]
    Validation(FieldErrors),

    /// The form body could not be read as JSON of the expected shape.
    #[error("Form data could not be read: {0}")]
    MalformedForm(String),

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error("Not signed in")]
    Unauthorized,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("No prediction available yet")]
    NoPrediction,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Export error: {0}")]
    ExportError(String),
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub timestamp: chrono::DateTime<Utc>,
    pub request_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<FieldErrors>,
}

impl DashboardError {
    fn public_message(&self) -> String {
        match self {
            DashboardError::Submission(e) => e.user_message().to_string(),
            DashboardError::StorageError(_) | DashboardError::ExportError(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let request_id = Uuid::new_v4().to_string();

        let (status, error_code) = match &self {
            DashboardError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_FAILED"),
            DashboardError::MalformedForm(_) => (StatusCode::UNPROCESSABLE_ENTITY, "MALFORMED_FORM"),
            DashboardError::Submission(SubmissionError::ServerRejected(_)) => {
                (StatusCode::BAD_GATEWAY, "PREDICTION_REJECTED")
            }
            DashboardError::Submission(SubmissionError::Unreachable(_)) => {
                (StatusCode::BAD_GATEWAY, "UPSTREAM_UNREACHABLE")
            }
            DashboardError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            DashboardError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
            DashboardError::NoPrediction => (StatusCode::NOT_FOUND, "NO_PREDICTION"),
            DashboardError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            DashboardError::StorageError(_) | DashboardError::ExportError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let field_errors = match &self {
            DashboardError::Validation(errors) => Some(errors.clone()),
            _ => None,
        };

        let body = ErrorResponse {
            success: false,
            error: self.public_message(),
            error_code: error_code.to_string(),
            timestamp: Utc::now(),
            request_id,
            field_errors,
        };

        if status.is_server_error() {
            tracing::error!(error = ?self, error_code = error_code, "Request failed");
        } else {
            tracing::warn!(error = %self, error_code = error_code, "Request rejected");
        }

        (status, Json(body)).into_response()
    }
}
