//! Gateway errors and their JSON envelopes
//!
//! Rejections raised before any upstream call answer with `{ "error": .. }`.
//! Upstream failures answer with `{ "explanation": "Error: .." }` so callers
//! rendering the explanation field always have text to show.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("API key not set")]
    Configuration,
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("{0}")]
    Upstream(String),
    #[error("No location selected")]
    NothingSelected,
    #[error("District overlay not configured")]
    NoOverlay,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct ExplanationResponse {
    pub explanation: String,
}

/// Explanation text reported for a failed upstream call
pub fn upstream_explanation(message: &str) -> String {
    format!("Error: {}", message)
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Configuration | Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::NothingSelected | Self::NoOverlay => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::Upstream(message) => (
                status,
                Json(ExplanationResponse {
                    explanation: upstream_explanation(&message),
                }),
            )
                .into_response(),
            Self::MethodNotAllowed => (
                status,
                [(header::ALLOW, "POST")],
                Json(ErrorResponse {
                    error: Self::MethodNotAllowed.to_string(),
                }),
            )
                .into_response(),
            other => (
                status,
                Json(ErrorResponse {
                    error: other.to_string(),
                }),
            )
                .into_response(),
        }
    }
}
