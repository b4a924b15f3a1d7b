//! Defines the state shared across the Axum application.
use std::sync::Arc;

use crate::{db::ReportStore, queue::StatusQueue, storage::MediaStore};

#[derive(Clone)]
/// The state struct shared across routers. Collaborators are constructed once
/// at startup and injected here rather than held as globals.
pub struct AppState {
    /// The blob store uploads are written to.
    pub media: MediaStore,
    /// The record store report metadata is upserted into.
    pub records: Arc<dyn ReportStore>,
    /// The queue cross-match notifications are delivered to.
    pub queue: Arc<dyn StatusQueue>,
}
