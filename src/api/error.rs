use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::extractor::ExtractionError;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

impl ExtractionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ExtractionError::Validation(_) => StatusCode::BAD_REQUEST,
            ExtractionError::Network(_) => StatusCode::BAD_GATEWAY,
            ExtractionError::InsufficientContent(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for ExtractionError {
    fn into_response(self) -> Response {
        error_response(self.status_code(), self.user_message())
    }
}
