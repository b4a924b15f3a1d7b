//! Constants (primarily environment variables) used across the application.
pub mod api;
pub mod db;
pub mod queue;
pub mod s3;
