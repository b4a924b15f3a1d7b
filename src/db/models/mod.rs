//! Models for records persisted in the record store.
pub mod report;
