//! The record store collaborator: the report model, the store abstraction the
//! flows depend on, and its Postgres implementation.
pub mod models;

use async_trait::async_trait;

use crate::constants::db as constants;
use errors::StoreError;
use models::report::ReportRecord;

/// An alias for the underlying DBMS specific pool type.
pub type ConnectionPool = sqlx::PgPool;

/// Initiate a pooled connection to the record store database.
pub async fn connect() -> Result<ConnectionPool, StoreError> {
    Ok(sqlx::PgPool::connect(&constants::DB_URL).await?)
}

/// The record store as the ingestion flows see it. Handlers receive this as
/// an injected trait object so tests can swap in an in-memory fake.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Return every stored record matching both the reporter identity and the
    /// subject name. The predicate is applied by the store over a full scan;
    /// callers must not assume an index exists.
    async fn scan_matching(
        &self,
        reporter_id: &str,
        subject_name: &str,
    ) -> Result<Vec<ReportRecord>, StoreError>;

    /// Write a record, replacing any existing record with the same
    /// (`reporter_id`, `subject_id`) key.
    async fn put(&self, record: &ReportRecord) -> Result<(), StoreError>;
}

/// A `ReportStore` backed by a Postgres table. The table name is
/// configurable, so queries are built at runtime rather than checked at
/// compile time.
pub struct PgReportStore {
    /// The connection pool queries are issued through.
    pool: ConnectionPool,
    /// The table holding report records.
    table: String,
}

impl PgReportStore {
    /// Connect to the database and bind to the configured report table.
    pub async fn connect() -> Result<Self, StoreError> {
        Ok(Self::new(connect().await?, constants::REPORT_TABLE.clone()))
    }

    /// Construct a store over an existing pool and an explicit table name.
    pub const fn new(pool: ConnectionPool, table: String) -> Self {
        Self { pool, table }
    }
}

#[async_trait]
impl ReportStore for PgReportStore {
    async fn scan_matching(
        &self,
        reporter_id: &str,
        subject_name: &str,
    ) -> Result<Vec<ReportRecord>, StoreError> {
        // Sequential scan with the predicate applied here rather than pushed
        // into SQL, keeping the contract identical for stores that cannot
        // filter. Two concurrent submissions can both see no match here and
        // both write; see DESIGN.md.
        let rows: Vec<ReportRecord> =
            sqlx::query_as(&format!("SELECT * FROM {}", self.table))
                .fetch_all(&self.pool)
                .await?;
        Ok(rows
            .into_iter()
            .filter(|record| {
                record.reporter_id == reporter_id && record.subject_name == subject_name
            })
            .collect())
    }

    async fn put(&self, record: &ReportRecord) -> Result<(), StoreError> {
        sqlx::query(&format!(
            "INSERT INTO {} (reporter_id, subject_id, reporter_name, reporter_contact, \
             subject_name, image_url, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT (reporter_id, subject_id) DO UPDATE SET \
             reporter_name = EXCLUDED.reporter_name, \
             reporter_contact = EXCLUDED.reporter_contact, \
             subject_name = EXCLUDED.subject_name, \
             image_url = EXCLUDED.image_url, \
             created_at = EXCLUDED.created_at, \
             updated_at = EXCLUDED.updated_at",
            self.table
        ))
        .bind(&record.reporter_id)
        .bind(record.subject_id)
        .bind(&record.reporter_name)
        .bind(&record.reporter_contact)
        .bind(&record.subject_name)
        .bind(&record.image_url)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map(|_| ())?;
        Ok(())
    }
}

pub mod errors {
    use thiserror::Error;

    /// Errors raised by the record store.
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// An error returned by the database.
        #[error(transparent)]
        Database(#[from] sqlx::Error),
    }
}
