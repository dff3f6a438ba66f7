//! Common error types for the image studio gateway

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("No image provided")]
    MissingImage,

    #[error("No prompt provided")]
    MissingPrompt,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Inference gateway error: {0}")]
    Gateway(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Internal error: {0}")]
    Internal(String),

    /// A handler pipeline aborted; `label` is the handler's public failure message.
    #[error("{label}: {source}")]
    Pipeline {
        label: &'static str,
        #[source]
        source: Box<AppError>,
    },
}

impl AppError {
    /// Attribute this error to a handler pipeline.
    ///
    /// Client input errors keep their identity so they still render as 400.
    pub fn during(self, label: &'static str) -> Self {
        match self {
            AppError::MissingImage | AppError::MissingPrompt | AppError::Pipeline { .. } => self,
            other => AppError::Pipeline {
                label,
                source: Box::new(other),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingImage | AppError::MissingPrompt => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response envelope
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            AppError::MissingImage | AppError::MissingPrompt => ErrorResponse {
                error: self.to_string(),
                details: None,
            },
            AppError::Pipeline { label, source } => ErrorResponse {
                error: label.to_string(),
                details: Some(source.to_string()),
            },
            other => ErrorResponse {
                error: "Internal server error".to_string(),
                details: Some(other.to_string()),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;
