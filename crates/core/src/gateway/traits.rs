use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::response::{ApiResponse, ConstituentsData, HistoryData, SummaryData};

/// Read-only access to the dashboard's three data resources.
///
/// The gateway only fetches and decodes. Deciding what to do when a fetch
/// fails (mock list, synthetic series) is the caller's job.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait MarketDataGateway: Send + Sync {
    /// Human-readable name of this gateway (for logs).
    fn name(&self) -> &str;

    /// Constituents of the given index.
    async fn get_constituents(
        &self,
        index_code: &str,
    ) -> Result<ApiResponse<ConstituentsData>, CoreError>;

    /// Latest quote of a single instrument (or index).
    async fn get_instrument_summary(
        &self,
        instrument_code: &str,
    ) -> Result<ApiResponse<SummaryData>, CoreError>;

    /// Daily price history of a single instrument, in no particular order.
    async fn get_instrument_history(
        &self,
        instrument_code: &str,
    ) -> Result<ApiResponse<HistoryData>, CoreError>;

    /// Instrument codes with published summary and history resources.
    fn available_instruments(&self) -> Vec<String> {
        ["AGUAS-A", "ANDINA-B", "BCI", "BSANTANDER", "CAP", "IPSA"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }
}
