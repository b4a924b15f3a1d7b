//! Shared error type returned by the ingestion flows.
use axum::http::StatusCode;
use thiserror::Error;

use crate::{db::errors::StoreError, queue::errors::QueueError, storage::errors::MediaError};

/// Everything an ingestion flow can fail with. Each validation failure is a
/// typed value returned up through the flow; `Internal` is the top-level
/// safety net for faults with no closer classification.
#[derive(Error, Debug)]
pub enum ApiError {
    /// A required input was missing or malformed.
    #[error("{0}")]
    InvalidRequest(String),
    /// The request used a verb the dispatcher does not route.
    #[error("method {0} is not allowed")]
    UnsupportedMethod(String),
    /// The blob store failed while persisting an upload.
    #[error(transparent)]
    Media(#[from] MediaError),
    /// The record store failed while reading or writing a report.
    #[error(transparent)]
    Records(#[from] StoreError),
    /// The status queue failed while delivering a notification.
    #[error(transparent)]
    Queue(#[from] QueueError),
    /// Anything else.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// The HTTP status this error surfaces as.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::UnsupportedMethod(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::Media(_) | Self::Records(_) | Self::Queue(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// A short label for the error kind, used as the `error` field of the
    /// response body alongside the full message.
    pub const fn summary(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "Invalid request",
            Self::UnsupportedMethod(_) => "Method Not Allowed",
            Self::Media(_) => "Failed to upload image",
            Self::Records(_) => "Failed to save metadata",
            Self::Queue(_) => "Failed to notify processing pipeline",
            Self::Internal(_) => "Internal Server Error",
        }
    }
}
