//! Model mapping to the report record table. Represents one reported subject
//! (a missing or found pet/person) together with its reporter.
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// A subject report as persisted by the record store.
///
/// For a given registered `reporter_id`, at most one live record exists per
/// distinct `subject_name`. That invariant is enforced by a lookup before the
/// write, not by a storage-level constraint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReportRecord {
    /// The reporter's identity, or the `unregistered` sentinel.
    pub reporter_id: String,
    /// Server-generated identifier, stable across updates of one logical
    /// subject.
    pub subject_id: Uuid,
    /// The reporter's display name. Empty when not supplied.
    pub reporter_name: String,
    /// How to reach the reporter. Empty when not supplied.
    pub reporter_contact: String,
    /// The subject's name; part of the natural-key lookup.
    pub subject_name: String,
    /// Public URL of the previously uploaded photo.
    pub image_url: String,
    /// Set once at first creation and carried forward verbatim on updates.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Refreshed on every write.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}
