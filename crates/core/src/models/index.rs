use serde::{Deserialize, Serialize};

/// Code of the index whose constituents are published as a data resource.
pub const PRIMARY_INDEX: &str = "IPSA";

/// An entry in the index tab bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketIndex {
    pub code: String,
    pub name: String,
}

impl MarketIndex {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }

    /// Whether constituents are available for this index.
    pub fn has_constituents(&self) -> bool {
        self.code == PRIMARY_INDEX
    }
}

/// The fixed set of indices offered by the dashboard, in tab order.
pub fn available_indices() -> Vec<MarketIndex> {
    vec![
        MarketIndex::new("IPSA", "IPSA"),
        MarketIndex::new("IGPA", "IGPA"),
        MarketIndex::new("NASDAQ", "NASDAQ"),
        MarketIndex::new("SP500", "S&P 500"),
    ]
}
