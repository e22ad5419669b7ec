use serde::{Deserialize, Serialize};

use super::instrument::{ConstituentSummary, HistoryPoint, InstrumentInfo, PriceQuote};

/// Envelope shared by all three data resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub code: u16,
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// Unwrap the payload when the envelope reports success.
    pub fn into_data(self) -> Option<T> {
        self.success.then_some(self.data)
    }
}

/// Payload of the constituents resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstituentsData {
    pub info: InstrumentInfo,
    #[serde(default)]
    pub constituents: Vec<ConstituentSummary>,
}

/// Payload of the instrument summary resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryData {
    pub info: InstrumentInfo,
    pub price: PriceQuote,
}

/// Payload of the instrument history resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryData {
    pub info: InstrumentInfo,
    #[serde(default)]
    pub chart: Vec<HistoryPoint>,
}
