//! Seam to the external tabular store. The controller only sees this trait;
//! the spreadsheet-backed implementation lives in the sheets crate and an
//! in-memory fake stands in for it under test.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::shift::ShiftRecord;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("tabular store authorization failed: {0}")]
    Authorization(String),
    #[error("tabular store request failed: {0}")]
    Request(String),
    #[error("tabular store rejected the request: {0}")]
    Rejected(String),
}

/// Read-back summary for the admin `stats` command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SheetStats {
    /// Rows carrying data, header excluded.
    pub data_rows: usize,
    pub last_entry_date: Option<String>,
}

/// One persisted row, exactly as the store holds it (raw cells).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredEntry {
    pub date: String,
    pub start_time: String,
    pub end_time: String,
}

#[async_trait]
pub trait TimesheetGateway: Send + Sync {
    /// Persists the three raw fields (date, start, end). Derived columns are
    /// the store's own business. The implementation owns its retry policy;
    /// an error here is permanent from the controller's point of view.
    async fn append_entry(&self, record: &ShiftRecord) -> Result<(), GatewayError>;

    async fn stats(&self) -> Result<SheetStats, GatewayError>;

    /// Most recent rows, oldest first.
    async fn recent_entries(&self, limit: usize) -> Result<Vec<StoredEntry>, GatewayError>;

    /// Cheap connectivity check used by admin `status`/`test`.
    async fn probe(&self) -> Result<(), GatewayError>;
}
