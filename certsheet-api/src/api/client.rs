//! Google Sheets v4 REST client

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use super::auth::AuthManager;
use super::backend::SheetsBackend;
use super::models::{
    BatchUpdateRequest, GoogleErrorResponse, Request, SheetProperties, Spreadsheet, ValueRange,
    ValueRangeBody,
};
use super::resilience::ResilienceConfig;
use crate::sheet::SheetRange;

pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com/v4";

/// How user input is interpreted by the Sheets API on write
const VALUE_INPUT_OPTION: &str = "USER_ENTERED";

/// Authenticated client for the Sheets REST API.
///
/// One instance is shared by all requests; `reqwest::Client` pools
/// connections internally and the token cache is lock-free.
#[derive(Debug)]
pub struct SheetsClient {
    http: reqwest::Client,
    auth: AuthManager,
    base_url: String,
}

impl SheetsClient {
    pub fn new(http: reqwest::Client, auth: AuthManager) -> Self {
        Self {
            http,
            auth,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at another API root
    #[cfg(test)]
    pub(crate) fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Build the shared HTTP client with the configured timeouts
    pub fn http_client(config: &ResilienceConfig) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(config.timeout.request)
            .connect_timeout(config.timeout.connect)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")
    }

    fn spreadsheet_url(&self, spreadsheet_id: &str) -> String {
        format!(
            "{}/spreadsheets/{}",
            self.base_url,
            urlencoding::encode(spreadsheet_id)
        )
    }

    fn values_url(&self, range: &SheetRange) -> String {
        format!(
            "{}/values/{}",
            self.spreadsheet_url(&range.spreadsheet_id),
            urlencoding::encode(&range.a1())
        )
    }

    async fn request(&self, method: Method, url: &str) -> Result<RequestBuilder> {
        let token = self
            .auth
            .access_token()
            .await
            .context("Failed to obtain Google access token")?;
        Ok(self.http.request(method, url).bearer_auth(token))
    }

    /// Send a request and turn non-2xx answers into errors carrying the API message
    async fn send(&self, builder: RequestBuilder, what: &str) -> Result<Response> {
        let response = builder
            .send()
            .await
            .with_context(|| format!("Sheets API request failed: {}", what))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            self.auth.invalidate();
        }

        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<GoogleErrorResponse>(&body)
            .map(|e| match e.error.status {
                Some(code) => format!("{} ({})", e.error.message, code),
                None => e.error.message,
            })
            .unwrap_or(body);

        anyhow::bail!("Sheets API {} returned {}: {}", what, status, detail)
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder, what: &str) -> Result<T> {
        self.send(builder, what)
            .await?
            .json::<T>()
            .await
            .with_context(|| format!("Failed to parse Sheets API response: {}", what))
    }
}

#[async_trait]
impl SheetsBackend for SheetsClient {
    async fn get_values(&self, range: &SheetRange) -> Result<Vec<Vec<String>>> {
        debug!("values.get {}", range);
        let url = self.values_url(range);
        let builder = self.request(Method::GET, &url).await?;
        let values: ValueRange = self.send_json(builder, "values.get").await?;
        Ok(values.into_rows())
    }

    async fn append_values(&self, range: &SheetRange, rows: Vec<Vec<String>>) -> Result<()> {
        debug!("values.append {} ({} rows)", range, rows.len());
        let url = format!("{}:append", self.values_url(range));
        let builder = self
            .request(Method::POST, &url)
            .await?
            .query(&[
                ("valueInputOption", VALUE_INPUT_OPTION),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&ValueRangeBody::rows(rows));
        self.send(builder, "values.append").await?;
        Ok(())
    }

    async fn update_values(&self, range: &SheetRange, rows: Vec<Vec<String>>) -> Result<()> {
        debug!("values.update {} ({} rows)", range, rows.len());
        let url = self.values_url(range);
        let builder = self
            .request(Method::PUT, &url)
            .await?
            .query(&[("valueInputOption", VALUE_INPUT_OPTION)])
            .json(&ValueRangeBody::rows(rows));
        self.send(builder, "values.update").await?;
        Ok(())
    }

    async fn sheet_tabs(&self, spreadsheet_id: &str) -> Result<Vec<SheetProperties>> {
        debug!("spreadsheets.get {}", spreadsheet_id);
        let url = self.spreadsheet_url(spreadsheet_id);
        let builder = self
            .request(Method::GET, &url)
            .await?
            .query(&[("fields", "sheets.properties")]);
        let spreadsheet: Spreadsheet = self.send_json(builder, "spreadsheets.get").await?;
        Ok(spreadsheet
            .sheets
            .into_iter()
            .map(|sheet| sheet.properties)
            .collect())
    }

    async fn batch_update(&self, spreadsheet_id: &str, requests: Vec<Request>) -> Result<()> {
        debug!(
            "spreadsheets.batchUpdate {} ({} requests)",
            spreadsheet_id,
            requests.len()
        );
        let url = format!("{}:batchUpdate", self.spreadsheet_url(spreadsheet_id));
        let builder = self
            .request(Method::POST, &url)
            .await?
            .json(&BatchUpdateRequest { requests });
        self.send(builder, "spreadsheets.batchUpdate").await?;
        Ok(())
    }
}
