//! Services which implement the core ingestion flows behind the routes.
pub mod dispatch;
pub mod errors;
pub mod reports;
pub mod uploads;

#[cfg(test)]
pub mod testing;
