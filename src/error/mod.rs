use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::template::TemplateError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

/// Check if running in production mode (based on RUN_MODE env var)
fn is_production() -> bool {
    std::env::var("RUN_MODE")
        .map(|m| m == "production" || m == "prod")
        .unwrap_or(false)
}

/// Status and code for engine failures
fn template_status(error: &TemplateError) -> (StatusCode, &'static str) {
    match error {
        TemplateError::NotFound(_) => (StatusCode::NOT_FOUND, "TEMPLATE_NOT_FOUND"),
        TemplateError::UnknownChannel(_) => (StatusCode::BAD_REQUEST, "UNKNOWN_CHANNEL"),
        TemplateError::InvalidTemplate(_)
        | TemplateError::Empty
        | TemplateError::LengthExceeded { .. } => (StatusCode::BAD_REQUEST, "INVALID_TEMPLATE"),
        TemplateError::Syntax(_) => (StatusCode::UNPROCESSABLE_ENTITY, "TEMPLATE_SYNTAX_ERROR"),
        TemplateError::Render(_) => (StatusCode::UNPROCESSABLE_ENTITY, "RENDER_ERROR"),
        TemplateError::Preview(_) => (StatusCode::UNPROCESSABLE_ENTITY, "PREVIEW_ERROR"),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, client_message, log_message) = match &self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                msg.clone(),
            ),
            AppError::Template(e) => {
                let (status, code) = template_status(e);
                (status, code, e.to_string(), e.to_string())
            }
            AppError::Internal(e) => {
                let log_msg = e.clone();
                let client_msg = if is_production() {
                    "Internal server error".to_string()
                } else {
                    log_msg.clone()
                };
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", client_msg, log_msg)
            }
        };

        // Server faults log at error, rejected requests at debug
        if status.is_server_error() {
            tracing::error!(
                code = %code,
                status = %status.as_u16(),
                message = %log_message,
                "API error"
            );
        } else {
            tracing::debug!(
                code = %code,
                status = %status.as_u16(),
                message = %log_message,
                "API request rejected"
            );
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: client_message,
            },
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
