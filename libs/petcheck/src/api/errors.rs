//! Error responses for the two endpoints
//!
//! User mistakes become 400s with a readable message; anything else is a
//! 500 carrying the error text, never a panic.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::classifier::ClassifyError;
use crate::common::SpeciesError;

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("No image uploaded")]
    MissingFile {
        received_files: Vec<String>,
        received_form: Vec<String>,
    },

    #[error("No selected file")]
    NoSelectedFile,

    #[error("Invalid image file")]
    InvalidImage,

    #[error("Error processing license image")]
    Internal(String),
}

impl From<MultipartRejection> for VerifyError {
    fn from(rejection: MultipartRejection) -> Self {
        log::warn!("Rejected license upload: {}", rejection);
        VerifyError::MissingFile {
            received_files: Vec::new(),
            received_form: Vec::new(),
        }
    }
}

impl From<MultipartError> for VerifyError {
    fn from(err: MultipartError) -> Self {
        VerifyError::Internal(err.body_text())
    }
}

impl IntoResponse for VerifyError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            VerifyError::MissingFile {
                received_files,
                received_form,
            } => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "isValid": false,
                    "message": message,
                    "details": {
                        "received_files": received_files,
                        "received_form": received_form,
                    }
                })),
            )
                .into_response(),
            VerifyError::NoSelectedFile | VerifyError::InvalidImage => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "isValid": false, "message": message })),
            )
                .into_response(),
            VerifyError::Internal(error) => {
                log::error!("Verification error: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "isValid": false, "message": message, "error": error })),
                )
                    .into_response()
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("No image provided")]
    NoImage,

    #[error("No selected file")]
    NoSelectedFile,

    #[error(transparent)]
    InvalidSpecies(#[from] SpeciesError),

    #[error("Invalid file type")]
    InvalidFileType,

    #[error(transparent)]
    Classify(#[from] ClassifyError),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

impl PredictError {
    pub fn status(&self) -> StatusCode {
        match self {
            PredictError::Classify(ClassifyError::Inference(_)) | PredictError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<MultipartRejection> for PredictError {
    fn from(rejection: MultipartRejection) -> Self {
        log::warn!("Rejected prediction upload: {}", rejection);
        PredictError::NoImage
    }
}

impl From<MultipartError> for PredictError {
    fn from(err: MultipartError) -> Self {
        PredictError::BadRequest(err.body_text())
    }
}

impl IntoResponse for PredictError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("Prediction failed: {}", self);
        } else {
            log::warn!("Prediction rejected: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
