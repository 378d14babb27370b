//! Error types for kopilka-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use kopilka_core::{CoreError, ErrorCode, ErrorDetails};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Core(error) => {
                StatusCode::from_u16(error.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }

    pub fn to_details(&self) -> ErrorDetails {
        match self {
            ApiError::BadRequest { .. } => ErrorDetails::new(ErrorCode::InvalidArgument, self.to_string()),
            ApiError::Core(error) => error.to_details(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    #[serde(flatten)]
    details: ErrorDetails,
}

/// `{success: false, error}` plus the error details, with the matching status
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let details = self.to_details();
        if status.is_server_error() {
            log::error!("{}", details);
        } else {
            log::debug!("{}", details);
        }
        let body = ErrorBody {
            success: false,
            error: details.message.clone(),
            details,
        };
        (status, Json(body)).into_response()
    }
}
