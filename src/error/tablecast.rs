use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error as ThisError;
use tracing::error;

use super::store::{ErrorKind, StoreError};
use crate::sync::ObserverId;

#[derive(Debug, ThisError)]
pub enum TablecastError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("observer {0} is not registered")]
    UnknownObserver(ObserverId),

    #[error("Invalid observer id: {0}")]
    InvalidObserverId(String),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Ractor error: {0}")]
    RactorError(String),
}

impl TablecastError {
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            TablecastError::Store(e) => Some(e.kind()),
            TablecastError::UnknownObserver(_) => Some(ErrorKind::NotFound),
            TablecastError::InvalidObserverId(_)
            | TablecastError::InvalidBody(_)
            | TablecastError::InvalidPath(_) => Some(ErrorKind::Validation),
            TablecastError::IoError(_) | TablecastError::RactorError(_) => None,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind() {
            Some(ErrorKind::NotFound) => StatusCode::NOT_FOUND,
            Some(ErrorKind::Conflict) => StatusCode::CONFLICT,
            Some(ErrorKind::Validation) => StatusCode::BAD_REQUEST,
            None => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code for the JSON error body.
    pub fn code(&self) -> &'static str {
        match self {
            TablecastError::Store(e) => e.code(),
            TablecastError::UnknownObserver(_) => "UNKNOWN_OBSERVER",
            TablecastError::InvalidObserverId(_) => "INVALID_OBSERVER_ID",
            TablecastError::InvalidBody(_) => "INVALID_REQUEST_BODY",
            TablecastError::InvalidPath(_) => "INVALID_PATH",
            TablecastError::IoError(_) | TablecastError::RactorError(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for TablecastError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        // Internal details stay in the log.
        let message = if status.is_server_error() {
            error!(error = %self, "Request failed");
            "An internal server error occurred.".to_string()
        } else {
            self.to_string()
        };
        let body = ApiErrorBody {
            inner: ApiErrorObject {
                code: self.code().to_string(),
                message,
                details: None,
            },
        };
        (status, Json(body)).into_response()
    }
}

/// `error` member of every non-2xx JSON body.
#[derive(Serialize)]
pub struct ApiErrorObject {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Serialize)]
pub struct ApiErrorBody {
    #[serde(rename = "error")]
    pub inner: ApiErrorObject,
}
