//! Method dispatch over the transport-agnostic request shape. One inbound
//! event is routed to exactly one flow; everything the flows fail with is
//! mapped to a response in one place.
use std::collections::HashMap;

use axum::http::StatusCode;

use crate::{
    services::{errors::ApiError, reports, uploads},
    state::AppState,
    utils::response::{self, ApiResponse},
};

/// The request shape the core consumes, independent of the hosting
/// transport: an HTTP-like method, optional query and header maps, and a
/// body that is either plain text or base64-encoded binary.
#[derive(Clone, Debug, Default)]
pub struct GatewayEvent {
    /// The HTTP-like method, matched case-insensitively.
    pub method: String,
    /// Query parameters, if any.
    pub query: HashMap<String, String>,
    /// Request headers, if any.
    pub headers: HashMap<String, String>,
    /// The request body.
    pub body: String,
    /// Whether `body` is base64-encoded binary.
    pub is_base64: bool,
}

impl GatewayEvent {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Look up a query parameter, treating an empty value as absent.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

/// Route an event to the flow its method selects and map whatever comes back
/// to a response. The flow runs on its own task so that even a panic surfaces
/// as a 500 carrying the fault's message instead of tearing the request down.
pub async fn dispatch(event: &GatewayEvent, state: &AppState) -> ApiResponse {
    let flow = {
        let event = event.clone();
        let state = state.clone();
        tokio::spawn(async move { route(&event, &state).await })
    };
    let outcome = match flow.await {
        Ok(outcome) => outcome,
        Err(fault) => Err(ApiError::Internal(fault.to_string())),
    };
    match outcome {
        Ok(body) => response::respond(StatusCode::OK, body),
        Err(err) => {
            eprintln!("Request with method {} failed: {err}", event.method);
            response::respond_error(&err)
        }
    }
}

/// The method dispatch itself. PUT uploads a photo, POST submits report
/// metadata, anything else is refused with 405 before any collaborator is
/// touched.
async fn route(event: &GatewayEvent, state: &AppState) -> Result<serde_json::Value, ApiError> {
    match event.method.to_ascii_uppercase().as_str() {
        "PUT" => uploads::handle_upload(event, &state.media).await,
        "POST" => {
            reports::handle_submit(event, state.records.as_ref(), state.queue.as_ref()).await
        }
        method => Err(ApiError::UnsupportedMethod(method.to_owned())),
    }
}
