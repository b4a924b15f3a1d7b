//! In-memory collaborator fakes backing the flow tests.
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    db::{errors::StoreError, models::report::ReportRecord, ReportStore},
    queue::{errors::QueueError, StatusMessage, StatusQueue},
    storage::MediaStore,
};

/// A `ReportStore` over a plain vector, counting collaborator calls so tests
/// can assert a flow never reached it.
#[derive(Default)]
pub struct MemoryReportStore {
    rows: Mutex<Vec<ReportRecord>>,
    calls: AtomicUsize,
}

impl MemoryReportStore {
    /// Snapshot of all stored records.
    pub fn records(&self) -> Vec<ReportRecord> {
        self.rows.lock().expect("store mutex poisoned").clone()
    }

    /// How many scan/put calls the store has served.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReportStore for MemoryReportStore {
    async fn scan_matching(
        &self,
        reporter_id: &str,
        subject_name: &str,
    ) -> Result<Vec<ReportRecord>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .rows
            .lock()
            .expect("store mutex poisoned")
            .iter()
            .filter(|record| {
                record.reporter_id == reporter_id && record.subject_name == subject_name
            })
            .cloned()
            .collect())
    }

    async fn put(&self, record: &ReportRecord) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().expect("store mutex poisoned");
        if let Some(existing) = rows.iter_mut().find(|row| {
            row.reporter_id == record.reporter_id && row.subject_id == record.subject_id
        }) {
            *existing = record.clone();
        } else {
            rows.push(record.clone());
        }
        Ok(())
    }
}

/// A `StatusQueue` collecting messages in memory, optionally failing every
/// send to exercise the fault path.
#[derive(Default)]
pub struct MemoryStatusQueue {
    messages: Mutex<Vec<StatusMessage>>,
    fail: AtomicBool,
}

impl MemoryStatusQueue {
    /// A queue whose every send fails.
    pub fn failing() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            fail: AtomicBool::new(true),
        }
    }

    /// Snapshot of all delivered messages.
    pub fn sent(&self) -> Vec<StatusMessage> {
        self.messages.lock().expect("queue mutex poisoned").clone()
    }
}

#[async_trait]
impl StatusQueue for MemoryStatusQueue {
    async fn send(&self, message: &StatusMessage) -> Result<String, QueueError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(QueueError::Unavailable("status queue offline".to_owned()));
        }
        self.messages
            .lock()
            .expect("queue mutex poisoned")
            .push(message.clone());
        Ok(Uuid::new_v4().to_string())
    }
}

/// A media store over the in-memory object store backend.
pub fn memory_media_store() -> MediaStore {
    MediaStore::with_store(
        Arc::new(object_store::memory::InMemory::new()),
        "test-media",
        "s3.amazonaws.com",
    )
}
