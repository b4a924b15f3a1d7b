//! The single ingestion route. The transport adapter here only converts
//! between the raw HTTP request and the gateway event shape the dispatcher
//! consumes; all routing and validation live in the services.
use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, Method},
    routing::any,
    Router,
};
use base64::{prelude::BASE64_STANDARD, Engine as _};

use crate::{
    services::dispatch::{self, GatewayEvent},
    state::AppState,
    utils::response::ApiResponse,
};

/// Create a router for the report ingestion endpoint. Every method lands in
/// the dispatcher, which owns the method-not-allowed refusal.
pub fn create_router() -> Router<AppState> {
    Router::new().route("/", any(ingest))
}

/// Convert the HTTP request into a `GatewayEvent` and hand it to the
/// dispatcher. Image bodies travel base64-encoded with the binary flag set,
/// the way a binary-media gateway hands them over; textual bodies pass
/// through as-is.
async fn ingest(
    State(state): State<AppState>,
    method: Method,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResponse {
    let header_map: HashMap<String, String> = headers
        .iter()
        .map(|(name, value)| {
            (
                name.to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    let binary = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|content_type| content_type.starts_with("image/"))
        || std::str::from_utf8(&body).is_err();
    let (encoded, is_base64) = if binary {
        (BASE64_STANDARD.encode(&body), true)
    } else {
        (String::from_utf8_lossy(&body).into_owned(), false)
    };
    let event = GatewayEvent {
        method: method.to_string(),
        query,
        headers: header_map,
        body: encoded,
        is_base64,
    };
    dispatch::dispatch(&event, &state).await
}
