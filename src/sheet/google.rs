use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use super::{SheetStore, StoreError};
use crate::config::SheetConfig;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValueRangeUpdate<'a> {
    range: &'a str,
    major_dimension: &'static str,
    values: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateValuesResponse {
    #[serde(default)]
    updated_cells: u64,
}

/// Google Sheets v4 `spreadsheets.values` client.
pub struct GoogleSheetsClient {
    client: Client,
    base_url: Url,
    spreadsheet_id: String,
    access_token: SecretString,
}

impl GoogleSheetsClient {
    pub fn new(config: &SheetConfig) -> Result<Self, StoreError> {
        let base_url = Url::parse(&config.api_base_url)
            .map_err(|e| StoreError::Transport(format!("invalid api_base_url: {}", e)))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs.max(1)))
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            spreadsheet_id: config.spreadsheet_id.clone(),
            access_token: SecretString::from(config.access_token.clone()),
        })
    }

    fn values_url(&self, range: &str) -> Result<Url, StoreError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::Transport("api_base_url cannot be a base".to_string()))?
            .pop_if_empty()
            .push("spreadsheets")
            .push(&self.spreadsheet_id)
            .push("values")
            .push(range);
        Ok(url)
    }

    /// Whether an `UpdateValuesResponse` body reports any written cell.
    fn cells_updated(body: &[u8]) -> Result<bool, StoreError> {
        let body: UpdateValuesResponse = serde_json::from_slice(body)
            .map_err(|e| StoreError::Transport(format!("invalid update response body: {}", e)))?;
        Ok(body.updated_cells > 0)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl SheetStore for GoogleSheetsClient {
    async fn get_values(&self, range: &str) -> Result<Vec<Vec<String>>, StoreError> {
        let url = self.values_url(range)?;
        debug!("reading sheet range {}", range);

        let response = self
            .client
            .get(url)
            .bearer_auth(self.access_token.expose_secret())
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        let body: ValueRange = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Transport(format!("invalid value range body: {}", e)))?;

        Ok(body.values)
    }

    async fn set_values(&self, range: &str, values: Vec<Vec<String>>) -> Result<bool, StoreError> {
        let mut url = self.values_url(range)?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");
        debug!("writing sheet range {}", range);

        let response = self
            .client
            .put(url)
            .bearer_auth(self.access_token.expose_secret())
            .json(&ValueRangeUpdate {
                range,
                major_dimension: "ROWS",
                values,
            })
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        let body = Self::check(response)
            .await?
            .bytes()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        Self::cells_updated(&body)
    }
}
