//! The metadata submission flow: parse and validate the payload, upsert the
//! report record by reporter identity, and conditionally notify the
//! downstream processing pipeline.
use base64::{prelude::BASE64_STANDARD, Engine as _};
use serde::Deserialize;
use serde_json::{json, Value};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    constants::api::{
        PROCESS_SUBJECT_STATUS, REPORT_FOUND_SUBJECT, REPORT_MISSING_SUBJECT,
        UNREGISTERED_REPORTER,
    },
    db::{models::report::ReportRecord, ReportStore},
    queue::{StatusMessage, StatusQueue},
    services::{dispatch::GatewayEvent, errors::ApiError},
};

/// The submission payload, validated exhaustively at the boundary. Absent
/// reporter fields default rather than fail; the rest are required.
#[derive(Deserialize)]
struct SubmitReport {
    purpose: Option<String>,
    subject_name: Option<String>,
    image_url: Option<String>,
    reporter_id: Option<String>,
    reporter_name: Option<String>,
    reporter_contact: Option<String>,
}

/// Handle a POST submitting report metadata.
///
/// Registered reporters are matched against their prior record for the same
/// subject name, so resubmitting updates one logical record and keeps its
/// subject identifier and creation time. Unregistered submissions are always
/// independent. A notification is enqueued only for the two crossing cases:
/// registered + missing, unregistered + found.
pub async fn handle_submit(
    event: &GatewayEvent,
    records: &dyn ReportStore,
    queue: &dyn StatusQueue,
) -> Result<Value, ApiError> {
    let raw = if event.is_base64 {
        let decoded = BASE64_STANDARD
            .decode(event.body.as_bytes())
            .map_err(|err| ApiError::InvalidRequest(format!("body is not valid base64: {err}")))?;
        String::from_utf8(decoded)
            .map_err(|_| ApiError::InvalidRequest("body is not valid UTF-8".to_owned()))?
    } else {
        event.body.clone()
    };
    let payload: SubmitReport = serde_json::from_str(&raw)
        .map_err(|err| ApiError::InvalidRequest(format!("malformed JSON payload: {err}")))?;

    let purpose = required(payload.purpose, "purpose")?;
    let subject_name = required(payload.subject_name, "subject_name")?;
    let image_url = required(payload.image_url, "image_url")?;
    let reporter_id = payload
        .reporter_id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| UNREGISTERED_REPORTER.to_owned());
    let unregistered = reporter_id == UNREGISTERED_REPORTER;

    // Identity resolution happens only for registered reporters; every
    // unregistered submission is logically independent.
    let prior = if unregistered {
        None
    } else {
        records
            .scan_matching(&reporter_id, &subject_name)
            .await?
            .into_iter()
            .next()
    };

    // The scan above and the put below are not atomic: two racing
    // submissions for the same (reporter_id, subject_name) can both miss and
    // both write. Accepted gap, documented in DESIGN.md.
    let now = OffsetDateTime::now_utc();
    let record = ReportRecord {
        reporter_id,
        subject_id: prior
            .as_ref()
            .map_or_else(Uuid::new_v4, |existing| existing.subject_id),
        reporter_name: payload.reporter_name.unwrap_or_default(),
        reporter_contact: payload.reporter_contact.unwrap_or_default(),
        subject_name,
        image_url,
        created_at: prior.as_ref().map_or(now, |existing| existing.created_at),
        updated_at: now,
    };
    records.put(&record).await?;

    let notify = (!unregistered && purpose == REPORT_MISSING_SUBJECT)
        || (unregistered && purpose == REPORT_FOUND_SUBJECT);
    if !notify {
        return Ok(json!({
            "message": "Report saved",
            "record": record,
        }));
    }

    // A queue fault fails the whole request; the record write above is not
    // rolled back.
    let message_id = queue
        .send(&StatusMessage {
            reporter_id: record.reporter_id.clone(),
            subject_id: record.subject_id,
            subject_name: record.subject_name.clone(),
            image_url: record.image_url.clone(),
            purpose: PROCESS_SUBJECT_STATUS.to_owned(),
        })
        .await?;
    Ok(json!({
        "message": "Report saved and queued for matching",
        "record": record,
        "queue_message_id": message_id,
    }))
}

/// Extract a required field, treating an absent or empty value the same way.
fn required(field: Option<String>, name: &str) -> Result<String, ApiError> {
    field
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ApiError::InvalidRequest(format!("missing '{name}' field")))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::{json, Value};

    use super::handle_submit;
    use crate::{
        constants::api::PROCESS_SUBJECT_STATUS,
        services::{
            dispatch::GatewayEvent,
            errors::ApiError,
            testing::{MemoryReportStore, MemoryStatusQueue},
        },
    };

    fn submit_event(body: &Value) -> GatewayEvent {
        GatewayEvent {
            method: "POST".to_owned(),
            body: body.to_string(),
            ..GatewayEvent::default()
        }
    }

    fn report(reporter_id: &str, purpose: &str) -> Value {
        json!({
            "purpose": purpose,
            "subject_name": "Rex",
            "image_url": "https://media.example/r1-Rex.png",
            "reporter_id": reporter_id,
            "reporter_name": "Jordan",
            "reporter_contact": "jordan@example.com",
        })
    }

    #[tokio::test]
    async fn repeated_registered_submission_updates_one_record() {
        let store = MemoryReportStore::default();
        let queue = MemoryStatusQueue::default();
        let payload = report("r1", "report_missing_subject");

        let first = handle_submit(&submit_event(&payload), &store, &queue)
            .await
            .expect("first submit");
        let first_updated = store.records()[0].updated_at;
        tokio::time::sleep(Duration::from_millis(5)).await;
        let second = handle_submit(&submit_event(&payload), &store, &queue)
            .await
            .expect("second submit");

        let records = store.records();
        assert_eq!(records.len(), 1);
        assert_eq!(first["record"]["subject_id"], second["record"]["subject_id"]);
        assert_eq!(first["record"]["created_at"], second["record"]["created_at"]);
        assert!(records[0].updated_at > first_updated);
    }

    #[tokio::test]
    async fn unregistered_submissions_never_share_a_subject_id() {
        let store = MemoryReportStore::default();
        let queue = MemoryStatusQueue::default();
        let payload = report("unregistered", "report_found_subject");

        let first = handle_submit(&submit_event(&payload), &store, &queue)
            .await
            .expect("first submit");
        let second = handle_submit(&submit_event(&payload), &store, &queue)
            .await
            .expect("second submit");

        assert_eq!(store.records().len(), 2);
        assert_ne!(first["record"]["subject_id"], second["record"]["subject_id"]);
    }

    #[tokio::test]
    async fn registered_missing_report_is_enqueued() {
        let store = MemoryReportStore::default();
        let queue = MemoryStatusQueue::default();
        let body = handle_submit(
            &submit_event(&report("r1", "report_missing_subject")),
            &store,
            &queue,
        )
        .await
        .expect("submit");
        assert!(body["queue_message_id"].is_string());
        let sent = queue.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].purpose, PROCESS_SUBJECT_STATUS);
    }

    #[tokio::test]
    async fn unregistered_missing_report_is_not_enqueued() {
        let store = MemoryReportStore::default();
        let queue = MemoryStatusQueue::default();
        let body = handle_submit(
            &submit_event(&report("unregistered", "report_missing_subject")),
            &store,
            &queue,
        )
        .await
        .expect("submit");
        assert!(body["queue_message_id"].is_null());
        assert!(queue.sent().is_empty());
    }

    #[tokio::test]
    async fn unregistered_found_report_is_enqueued() {
        let store = MemoryReportStore::default();
        let queue = MemoryStatusQueue::default();
        let body = handle_submit(
            &submit_event(&report("unregistered", "report_found_subject")),
            &store,
            &queue,
        )
        .await
        .expect("submit");
        assert!(body["queue_message_id"].is_string());
    }

    #[tokio::test]
    async fn registered_found_report_is_not_enqueued() {
        let store = MemoryReportStore::default();
        let queue = MemoryStatusQueue::default();
        let body = handle_submit(
            &submit_event(&report("r1", "report_found_subject")),
            &store,
            &queue,
        )
        .await
        .expect("submit");
        assert!(body["queue_message_id"].is_null());
        assert!(queue.sent().is_empty());
    }

    #[tokio::test]
    async fn malformed_payload_never_touches_the_store() {
        let store = MemoryReportStore::default();
        let queue = MemoryStatusQueue::default();
        let event = GatewayEvent {
            method: "POST".to_owned(),
            body: "definitely not json".to_owned(),
            ..GatewayEvent::default()
        };
        let err = handle_submit(&event, &store, &queue)
            .await
            .expect_err("must fail");
        assert!(matches!(err, ApiError::InvalidRequest(_)));
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn each_missing_field_reports_its_own_reason() {
        let store = MemoryReportStore::default();
        let queue = MemoryStatusQueue::default();
        for field in ["purpose", "subject_name", "image_url"] {
            let mut payload = report("r1", "report_missing_subject");
            payload
                .as_object_mut()
                .expect("payload is an object")
                .remove(field);
            let err = handle_submit(&submit_event(&payload), &store, &queue)
                .await
                .expect_err("must fail");
            assert!(err.to_string().contains(field), "wrong reason for {field}");
        }
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn queue_fault_fails_the_request_but_keeps_the_record() {
        let store = MemoryReportStore::default();
        let queue = MemoryStatusQueue::failing();
        let err = handle_submit(
            &submit_event(&report("r1", "report_missing_subject")),
            &store,
            &queue,
        )
        .await
        .expect_err("must fail");
        assert!(matches!(err, ApiError::Queue(_)));
        assert_eq!(store.records().len(), 1);
    }

    #[tokio::test]
    async fn base64_encoded_payload_is_decoded_before_parsing() {
        use base64::{prelude::BASE64_STANDARD, Engine as _};
        let store = MemoryReportStore::default();
        let queue = MemoryStatusQueue::default();
        let event = GatewayEvent {
            method: "POST".to_owned(),
            body: BASE64_STANDARD.encode(report("r1", "report_found_subject").to_string()),
            is_base64: true,
            ..GatewayEvent::default()
        };
        let body = handle_submit(&event, &store, &queue).await.expect("submit");
        assert_eq!(body["record"]["subject_name"], "Rex");
    }

    #[tokio::test]
    async fn absent_reporter_defaults_to_the_unregistered_sentinel() {
        let store = MemoryReportStore::default();
        let queue = MemoryStatusQueue::default();
        let payload = json!({
            "purpose": "report_found_subject",
            "subject_name": "Rex",
            "image_url": "https://media.example/unregistered-Rex.jpg",
        });
        let body = handle_submit(&submit_event(&payload), &store, &queue)
            .await
            .expect("submit");
        assert_eq!(body["record"]["reporter_id"], "unregistered");
        assert_eq!(body["record"]["reporter_name"], "");
        assert!(body["queue_message_id"].is_string());
    }
}
