use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;
use tokio::sync::Mutex;
use tracing::{info, warn};

use shiftbot_core::domain::shift::ShiftRecord;
use shiftbot_core::gateway::{GatewayError, SheetStats, StoredEntry, TimesheetGateway};

use crate::auth::AuthError;
use crate::client::{SheetsClient, SheetsError};
use crate::rows::{column_stats, entry_cells, first_reusable_row, tail_entries, DATA_START_ROW};

/// Spreadsheet-backed `TimesheetGateway`. Failure policy: one reconnect
/// (the client is rebuilt wholesale) and one unconditional append, driven by
/// explicit inputs rather than state captured before the failure.
pub struct SheetsGateway {
    spreadsheet_id: String,
    worksheet: String,
    credentials_json: SecretString,
    client: Mutex<Arc<SheetsClient>>,
}

impl SheetsGateway {
    pub fn new(
        spreadsheet_id: impl Into<String>,
        worksheet: impl Into<String>,
        credentials_json: SecretString,
    ) -> Result<Self, AuthError> {
        let spreadsheet_id = spreadsheet_id.into();
        let worksheet = worksheet.into();
        let client = SheetsClient::new(&spreadsheet_id, &worksheet, &credentials_json)?;

        Ok(Self {
            spreadsheet_id,
            worksheet,
            credentials_json,
            client: Mutex::new(Arc::new(client)),
        })
    }

    async fn current_client(&self) -> Arc<SheetsClient> {
        self.client.lock().await.clone()
    }

    async fn reconnect(&self) -> Result<(), GatewayError> {
        let fresh = SheetsClient::new(&self.spreadsheet_id, &self.worksheet, &self.credentials_json)
            .map_err(GatewayError::from)?;
        *self.client.lock().await = Arc::new(fresh);
        info!(worksheet = %self.worksheet, "sheets client rebuilt after write failure");
        Ok(())
    }

    /// Row-search write: reuse the first empty/placeholder row after the
    /// header, otherwise append past the last row.
    async fn place_entry(&self, cells: &[String]) -> Result<(), SheetsError> {
        let client = self.current_client().await;
        let date_column = client.read_column(&format!("A{DATA_START_ROW}:A")).await?;

        match first_reusable_row(&date_column) {
            Some(row_index) => client.write_row(row_index, cells).await,
            None => client.append_row(cells).await,
        }
    }
}

#[async_trait]
impl TimesheetGateway for SheetsGateway {
    async fn append_entry(&self, record: &ShiftRecord) -> Result<(), GatewayError> {
        let cells = entry_cells(record);

        match self.place_entry(&cells).await {
            Ok(()) => {
                info!(date = %cells[0], "timesheet row written");
                Ok(())
            }
            Err(error) => {
                warn!(error = %error, "timesheet write failed, reconnecting for one retry");
                self.reconnect().await?;
                self.current_client().await.append_row(&cells).await.map_err(GatewayError::from)?;
                info!(date = %cells[0], "timesheet row written on retry append");
                Ok(())
            }
        }
    }

    async fn stats(&self) -> Result<SheetStats, GatewayError> {
        let date_column = self
            .current_client()
            .await
            .read_column(&format!("A{DATA_START_ROW}:A"))
            .await
            .map_err(GatewayError::from)?;
        Ok(column_stats(&date_column))
    }

    async fn recent_entries(&self, limit: usize) -> Result<Vec<StoredEntry>, GatewayError> {
        let rows = self
            .current_client()
            .await
            .read_rows(&format!("A{DATA_START_ROW}:C"))
            .await
            .map_err(GatewayError::from)?;
        Ok(tail_entries(&rows, limit))
    }

    async fn probe(&self) -> Result<(), GatewayError> {
        self.current_client().await.read_rows("A1:C1").await.map_err(GatewayError::from)?;
        Ok(())
    }
}

impl From<SheetsError> for GatewayError {
    fn from(error: SheetsError) -> Self {
        match error {
            SheetsError::Auth(auth) => GatewayError::from(auth),
            SheetsError::Request(request) => GatewayError::Request(request.to_string()),
            SheetsError::Status { status, operation } => {
                GatewayError::Rejected(format!("{operation} returned status {status}"))
            }
        }
    }
}

impl From<AuthError> for GatewayError {
    fn from(error: AuthError) -> Self {
        GatewayError::Authorization(error.to_string())
    }
}
