use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::auth::{AuthError, TokenProvider};

const API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Debug, Error)]
pub enum SheetsError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("sheets request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("sheets API returned status {status} for {operation}")]
    Status { status: reqwest::StatusCode, operation: &'static str },
}

#[derive(Debug, Default, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Serialize)]
struct WriteBody<'a> {
    values: Vec<&'a [String]>,
}

/// One authenticated connection to a single worksheet. Rebuilt wholesale by
/// the gateway's reconnect path.
pub struct SheetsClient {
    http: reqwest::Client,
    auth: TokenProvider,
    spreadsheet_id: String,
    worksheet: String,
}

impl SheetsClient {
    pub fn new(
        spreadsheet_id: impl Into<String>,
        worksheet: impl Into<String>,
        credentials_json: &SecretString,
    ) -> Result<Self, AuthError> {
        Ok(Self {
            http: reqwest::Client::new(),
            auth: TokenProvider::from_json(credentials_json)?,
            spreadsheet_id: spreadsheet_id.into(),
            worksheet: worksheet.into(),
        })
    }

    /// A1-style range qualified with the worksheet, quoted so names with
    /// spaces survive.
    fn range(&self, cells: &str) -> String {
        format!("'{}'!{}", self.worksheet, cells)
    }

    fn values_url(&self, cells: &str, suffix: &str) -> String {
        format!("{API_BASE}/{}/values/{}{suffix}", self.spreadsheet_id, self.range(cells))
    }

    pub async fn read_rows(&self, cells: &str) -> Result<Vec<Vec<String>>, SheetsError> {
        let token = self.auth.access_token().await?;
        let response = self
            .http
            .get(self.values_url(cells, ""))
            .bearer_auth(token)
            .send()
            .await
            .map_err(SheetsError::Request)?;

        if !response.status().is_success() {
            return Err(SheetsError::Status { status: response.status(), operation: "read" });
        }

        let range: ValueRange = response.json().await.map_err(SheetsError::Request)?;
        Ok(range.values.into_iter().map(|row| row.into_iter().map(cell_text).collect()).collect())
    }

    /// First cell of each row in the range; rows the store returns empty
    /// come back as empty strings so positions stay aligned.
    pub async fn read_column(&self, cells: &str) -> Result<Vec<String>, SheetsError> {
        let rows = self.read_rows(cells).await?;
        Ok(rows.into_iter().map(|row| row.into_iter().next().unwrap_or_default()).collect())
    }

    pub async fn write_row(&self, row_index: u32, cells: &[String]) -> Result<(), SheetsError> {
        let token = self.auth.access_token().await?;
        let range = format!("A{row_index}:C{row_index}");
        let response = self
            .http
            .put(self.values_url(&range, "?valueInputOption=USER_ENTERED"))
            .bearer_auth(token)
            .json(&WriteBody { values: vec![cells] })
            .send()
            .await
            .map_err(SheetsError::Request)?;

        if !response.status().is_success() {
            return Err(SheetsError::Status { status: response.status(), operation: "write" });
        }
        Ok(())
    }

    pub async fn append_row(&self, cells: &[String]) -> Result<(), SheetsError> {
        let token = self.auth.access_token().await?;
        let response = self
            .http
            .post(self.values_url(
                "A:C",
                ":append?valueInputOption=USER_ENTERED&insertDataOption=INSERT_ROWS",
            ))
            .bearer_auth(token)
            .json(&WriteBody { values: vec![cells] })
            .send()
            .await
            .map_err(SheetsError::Request)?;

        if !response.status().is_success() {
            return Err(SheetsError::Status { status: response.status(), operation: "append" });
        }
        Ok(())
    }
}

fn cell_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
