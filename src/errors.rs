use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use serde_json::json;
use thiserror::Error;

use crate::repositories::StoreError;

/// Every way a record request can end without a success body.
///
/// The messages are the per-resource strings from
/// [`Resource`](crate::models::Resource); the status and JSON shape are fixed
/// per variant.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 400 `{"errorMessage": ...}`
    #[error("{0}")]
    MissingFields(String),
    /// 404 `{"message": ...}`
    #[error("{0}")]
    NotFound(String),
    /// 500 `{"error": ...}` for read routes
    #[error("{message}")]
    Retrieve {
        message: String,
        #[source]
        source: StoreError,
    },
    /// 500 `{"error": <store error>, "message": ...}` for write routes
    #[error("{message}")]
    Write {
        message: String,
        #[source]
        source: StoreError,
    },
}

impl ApiError {
    pub fn retrieve(message: String) -> impl FnOnce(StoreError) -> Self {
        move |source| ApiError::Retrieve { message, source }
    }

    pub fn write(message: String) -> impl FnOnce(StoreError) -> Self {
        move |source| ApiError::Write { message, source }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingFields(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Retrieve { .. } | ApiError::Write { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::MissingFields(msg) => json!({ "errorMessage": msg }),
            ApiError::NotFound(msg) => json!({ "message": msg }),
            ApiError::Retrieve { message, source } => {
                error!("{}: {}", message, source);
                json!({ "error": message })
            }
            ApiError::Write { message, source } => {
                error!("{}: {}", message, source);
                json!({ "error": source.to_string(), "message": message })
            }
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}
