//! Domain constants shared by the ingestion flows.

/// The reporter identity recorded when a submission carries no registered
/// account. Records under this identity are never deduplicated.
pub const UNREGISTERED_REPORTER: &str = "unregistered";

/// Purpose submitted by a registered reporter whose subject has gone missing.
pub const REPORT_MISSING_SUBJECT: &str = "report_missing_subject";

/// Purpose submitted by an unregistered reporter who found a subject.
pub const REPORT_FOUND_SUBJECT: &str = "report_found_subject";

/// Purpose tag attached to messages handed to the downstream processing
/// pipeline when a cross-match should be attempted.
pub const PROCESS_SUBJECT_STATUS: &str = "process_subject_status";

/// Content-type subtypes accepted verbatim as upload file extensions.
/// Anything else falls back to `jpg`.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpeg", "jpg", "png", "gif", "bmp"];

/// Subject name recorded when an unregistered upload does not provide one.
pub const UNKNOWN_SUBJECT: &str = "unknown";
