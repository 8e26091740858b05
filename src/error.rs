use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt::Display;

/// Every way a request can fail. Each variant maps to one HTTP status and is
/// rendered as `{"status", "error", "message"?}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{error}")]
    BadRequest {
        error: String,
        message: Option<String>,
    },
    #[error("Missing fields")]
    MissingFields(Vec<&'static str>),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{error}")]
    Internal {
        error: String,
        message: Option<String>,
    },
}

impl AppError {
    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::BadRequest {
            error: error.into(),
            message: None,
        }
    }

    pub fn bad_request_with(error: impl Into<String>, message: impl Display) -> Self {
        Self::BadRequest {
            error: error.into(),
            message: Some(message.to_string()),
        }
    }

    pub fn internal(error: impl Into<String>) -> Self {
        Self::Internal {
            error: error.into(),
            message: None,
        }
    }

    pub fn internal_with(error: impl Into<String>, message: impl Display) -> Self {
        Self::Internal {
            error: error.into(),
            message: Some(message.to_string()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } | AppError::MissingFields(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = json!({
            "status": status.as_u16(),
            "error": self.to_string(),
        });
        match self {
            AppError::BadRequest {
                message: Some(message),
                ..
            }
            | AppError::Internal {
                message: Some(message),
                ..
            } => {
                body["message"] = json!(message);
            }
            AppError::MissingFields(fields) => {
                body["missing_fields"] = json!(fields);
            }
            _ => {}
        }
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request_with("Failed to bind JSON data", rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::bad_request_with("id must be an integer", rejection.body_text())
    }
}
