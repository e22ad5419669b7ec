use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;
use tracing::{debug, warn};

use super::traits::MarketDataGateway;
use crate::errors::CoreError;
use crate::models::response::{ApiResponse, ConstituentsData, HistoryData, SummaryData};
use crate::models::settings::DashboardSettings;

const CONSTITUENTS_PATH: &str = "assets/files/constituyentes/constituensList.json";
const SUMMARY_DIR: &str = "assets/files/resumen";
const HISTORY_DIR: &str = "assets/files/history";

/// Gateway reading the static JSON resources served next to the dashboard.
///
/// - **Constituents**: one file for the primary index.
/// - **Summary**: `resumen/{code}.json`, one per instrument (and per index).
/// - **History**: `history/history-{code}.json`, one per instrument.
///
/// No retries: a failed request is reported once and the caller falls back.
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn from_settings(settings: &DashboardSettings) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(settings.request_timeout_secs));
        let client = builder.build().unwrap_or_else(|e| {
            warn!(error = %e, "failed to build configured HTTP client, using defaults");
            Client::new()
        });
        Self::with_client(settings.base_url.clone(), client)
    }

    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn constituents_url(&self) -> String {
        format!("{}/{CONSTITUENTS_PATH}", self.base_url)
    }

    pub fn summary_url(&self, instrument_code: &str) -> String {
        format!("{}/{SUMMARY_DIR}/{instrument_code}.json", self.base_url)
    }

    pub fn history_url(&self, instrument_code: &str) -> String {
        format!("{}/{HISTORY_DIR}/history-{instrument_code}.json", self.base_url)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        resource: &str,
        url: &str,
    ) -> Result<ApiResponse<T>, CoreError> {
        debug!(resource, url, "fetching");
        let resp = self.client.get(url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CoreError::Api {
                resource: resource.to_string(),
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string(),
            });
        }

        let body = resp.text().await?;
        let parsed: ApiResponse<T> = serde_json::from_str(&body).map_err(|e| {
            CoreError::Deserialization(format!("Failed to parse {resource} response: {e}"))
        })?;
        debug!(resource, success = parsed.success, code = parsed.code, "fetched");
        Ok(parsed)
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl MarketDataGateway for HttpGateway {
    fn name(&self) -> &str {
        "StaticJson"
    }

    async fn get_constituents(
        &self,
        index_code: &str,
    ) -> Result<ApiResponse<ConstituentsData>, CoreError> {
        // Only the primary index has a published list; the file is not keyed.
        debug!(index_code, "requesting constituents");
        self.fetch("constituents", &self.constituents_url()).await
    }

    async fn get_instrument_summary(
        &self,
        instrument_code: &str,
    ) -> Result<ApiResponse<SummaryData>, CoreError> {
        self.fetch("summary", &self.summary_url(instrument_code)).await
    }

    async fn get_instrument_history(
        &self,
        instrument_code: &str,
    ) -> Result<ApiResponse<HistoryData>, CoreError> {
        self.fetch("history", &self.history_url(instrument_code)).await
    }
}
