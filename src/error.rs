//! Error handling for the application

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::costing::errors::CostError;
use crate::costing::import::ImportError;
use crate::costing::responses::CostingErrorResponse;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Costing(#[from] CostError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    JsonRejection(#[from] JsonRejection),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Costing(e) => {
                tracing::debug!("Rejected costing input: {}", e);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    CostingErrorResponse {
                        error_type: e.error_type().to_string(),
                        message: e.to_string(),
                        details: e.field().map(|field| serde_json::json!({ "field": field })),
                    },
                )
            }
            AppError::Import(e) => (
                StatusCode::BAD_REQUEST,
                CostingErrorResponse {
                    error_type: "invalid_import".to_string(),
                    message: e.to_string(),
                    details: None,
                },
            ),
            AppError::JsonRejection(e) => {
                tracing::debug!("Rejected request body: {}", e.body_text());
                (
                    StatusCode::BAD_REQUEST,
                    CostingErrorResponse {
                        error_type: "invalid_body".to_string(),
                        message: e.body_text(),
                        details: None,
                    },
                )
            }
            AppError::Template(e) => {
                tracing::error!("Template error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    CostingErrorResponse {
                        error_type: "internal".to_string(),
                        message: "Template error".to_string(),
                        details: None,
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
