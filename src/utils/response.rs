//! Response formatting: maps an outcome and a status code to the wire shape
//! with the fixed cross-origin header set.
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::services::errors::ApiError;

/// A formatted response: a status code plus a JSON body. Conversion to the
/// transport shape attaches the fixed header set.
pub struct ApiResponse {
    /// The numeric HTTP status code to respond with.
    pub status: StatusCode,
    /// The JSON body to respond with.
    pub body: Value,
}

/// Format a success or error body under a given status code.
pub const fn respond(status: StatusCode, body: Value) -> ApiResponse {
    ApiResponse { status, body }
}

/// Format a flow error as a structured error body.
pub fn respond_error(err: &ApiError) -> ApiResponse {
    respond(
        err.status(),
        json!({
            "error": err.summary(),
            "message": err.to_string(),
        }),
    )
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.body)).into_response();
        let headers = response.headers_mut();
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("OPTIONS,POST,PUT"),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        );
        response
    }
}
