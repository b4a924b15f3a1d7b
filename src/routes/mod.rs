//! API routes within the application. Exposes sub-routers which should be
//! nested with the main Axum router.
pub mod reports;
