//! Error responses.
//!
//! Every failure is rendered as `{"code": ..., "detail": ...}`. Internal
//! errors are logged and replaced with a generic detail.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use domains::{DomainError, ErrorKind};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("JSON parse error - {0}")]
    Json(#[from] JsonRejection),

    #[error("Invalid query - {0}")]
    Query(#[from] QueryRejection),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub detail: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Domain(err) => match err.kind() {
                ErrorKind::Validation => StatusCode::BAD_REQUEST,
                ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
                ErrorKind::Authorization => StatusCode::FORBIDDEN,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Json(_) | ApiError::Query(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            ApiError::Domain(DomainError::Internal(cause)) => {
                error!(%cause, "request failed");
                ErrorBody { code: "internal_error", detail: "A server error occurred.".into() }
            }
            ApiError::Domain(err) => ErrorBody { code: err.code(), detail: err.to_string() },
            ApiError::Json(_) | ApiError::Query(_) => {
                ErrorBody { code: "parse_error", detail: self.to_string() }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut response = (status, Json(self.body())).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer realm=\"api\""));
        }
        response
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
