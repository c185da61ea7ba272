//! Google Sheets v4 `values` API client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::common::error::{StoreError, StoreResult};
use crate::config::types::SheetsConfig;
use crate::sheets::auth::{ServiceAccountKey, TokenProvider};
use crate::sheets::TableStore;

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Serialize)]
struct ValueRangeBody<'a> {
    range: &'a str,
    #[serde(rename = "majorDimension")]
    major_dimension: &'static str,
    values: Vec<Vec<String>>,
}

/// `TableStore` backed by a Google spreadsheet.
pub struct SheetsClient {
    http: reqwest::Client,
    tokens: TokenProvider,
    spreadsheet_id: String,
}

impl SheetsClient {
    /// Build a client from config, loading the service-account key.
    ///
    /// Inline JSON takes precedence over the key file path.
    pub fn from_config(config: &SheetsConfig) -> StoreResult<Self> {
        let key = match (&config.credentials_json, &config.credentials_path) {
            (Some(json), _) if !json.trim().is_empty() => ServiceAccountKey::from_json(json)?,
            (_, Some(path)) => ServiceAccountKey::from_file(path)?,
            _ => {
                return Err(StoreError::Credentials {
                    message: "no service account credentials configured".to_string(),
                })
            }
        };

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let tokens = TokenProvider::new(key, http.clone())?;

        Ok(Self {
            http,
            tokens,
            spreadsheet_id: config.spreadsheet_id.clone(),
        })
    }

    pub fn service_account(&self) -> &str {
        self.tokens.client_email()
    }

    /// `.../spreadsheets/{id}/values/{range}{suffix}`, percent-encoded.
    fn values_url(&self, range: &str, suffix: &str) -> StoreResult<Url> {
        let mut url = Url::parse(SHEETS_API_BASE).map_err(|e| StoreError::Api {
            status: 0,
            message: e.to_string(),
        })?;
        url.path_segments_mut()
            .map_err(|_| StoreError::Api {
                status: 0,
                message: "sheets base URL cannot hold a path".to_string(),
            })?
            .push(&self.spreadsheet_id)
            .push("values")
            .push(&format!("{}{}", range, suffix));
        Ok(url)
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<ValueRangeBody<'_>>,
    ) -> StoreResult<reqwest::Response> {
        let token = self.tokens.access_token().await?;

        let mut request = self.http.request(method, url).bearer_auth(token);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        Err(StoreError::Api {
            status: status.as_u16(),
            message: api_error_message(&text),
        })
    }
}

#[async_trait]
impl TableStore for SheetsClient {
    async fn read_range(&self, range: &str) -> StoreResult<Vec<Vec<String>>> {
        debug!("Sheets read {}", range);
        let url = self.values_url(range, "")?;
        let response = self.send(Method::GET, url, None).await?;
        let value_range: ValueRange = response.json().await?;

        Ok(value_range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }

    async fn write_row(&self, range: &str, values: Vec<String>) -> StoreResult<()> {
        debug!("Sheets write {} = {:?}", range, values);
        let mut url = self.values_url(range, "")?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");

        let body = ValueRangeBody {
            range,
            major_dimension: "ROWS",
            values: vec![values],
        };
        self.send(Method::PUT, url, Some(body)).await?;
        Ok(())
    }

    async fn append_row(&self, range: &str, values: Vec<String>) -> StoreResult<()> {
        debug!("Sheets append {} = {:?}", range, values);
        let mut url = self.values_url(range, ":append")?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");

        let body = ValueRangeBody {
            range,
            major_dimension: "ROWS",
            values: vec![values],
        };
        self.send(Method::POST, url, Some(body)).await?;
        Ok(())
    }
}

/// Formatted values come back as strings, but numbers and booleans can
/// appear when the sheet was written with other input options.
fn cell_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Pull `error.message` out of a Google API error body, else return the body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}
