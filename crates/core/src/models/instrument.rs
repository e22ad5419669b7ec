use serde::{Deserialize, Serialize};

/// Qualitative direction of a price change.
///
/// On the wire this is `"up"`, `"down"` or `"same"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tendency {
    Up,
    Down,
    #[default]
    Same,
}

impl Tendency {
    /// Derive the tag from the sign of a change.
    pub fn from_change(change: f64) -> Self {
        if change > 0.0 {
            Tendency::Up
        } else if change < 0.0 {
            Tendency::Down
        } else {
            Tendency::Same
        }
    }
}

impl std::fmt::Display for Tendency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tendency::Up => write!(f, "up"),
            Tendency::Down => write!(f, "down"),
            Tendency::Same => write!(f, "same"),
        }
    }
}

/// Descriptive metadata attached to every API payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentInfo {
    pub name: String,
    pub short_name: String,
    #[serde(default)]
    pub country_name: String,
    pub code_instrument: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour_open: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour_close: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trading: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange_rate: Option<f64>,
}

/// One member of a tracked index, with its summary performance metrics.
///
/// Snapshots are immutable: a new constituents fetch replaces the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstituentSummary {
    /// Instrument code, e.g. "BCI"
    pub code_instrument: String,
    pub name: String,
    pub short_name: String,

    /// Percentage change over the trading day
    pub pct_day: f64,
    /// Percentage change over the last 30 days
    #[serde(rename = "pct30D")]
    pub pct_30d: f64,
    /// Percentage change since the start of the calendar year
    #[serde(rename = "pctCY")]
    pub pct_cy: f64,
    /// Percentage change over the last year
    #[serde(rename = "pct1Y")]
    pub pct_1y: f64,

    pub last_price: f64,
    pub datetime_last_price: String,
    pub volume_money: f64,
    pub accumulated_volume_money: f64,
    pub tend: Tendency,
    pub performance_absolute: f64,
    pub performance_relative: f64,
}

impl ConstituentSummary {
    /// Case-insensitive substring match against name, short name or code.
    ///
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.short_name.to_lowercase().contains(needle)
            || self.code_instrument.to_lowercase().contains(needle)
    }
}

/// Full quote for a single instrument, as returned by the summary resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub last_price: f64,
    pub datetime_last_price: String,
    pub open_price: f64,
    pub close_price: f64,
    pub datetime_close_price: String,
    pub performance_absolute: f64,
    pub performance_relative: f64,
    pub bid: f64,
    pub bid_volume: f64,
    pub bid_datetime: String,
    pub ask: f64,
    pub ask_volume: f64,
    pub ask_datetime: String,
    pub high_price: f64,
    pub low_price: f64,
    pub volume: f64,
    pub volume_money: f64,
    pub tend: Tendency,
}

/// One OHLC + volume bar of an instrument's history.
///
/// `datetime_last_price` arrives in mixed formats ("06-11-2023 09:00:00",
/// RFC 3339, ...). Sequences are neither sorted nor uniformly formatted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPoint {
    pub datetime_last_price: String,
    /// Epoch milliseconds
    pub datetime_last_price_ts: i64,
    pub last_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    pub open_price: f64,
    pub close_price: f64,
    pub volume: f64,
    pub volume_money: f64,
    pub performance_relative: f64,
    pub performance_absolute: f64,
    pub tend: Tendency,
}

/// The instrument the user picked from the list.
///
/// Price and history are attached independently as their fetches complete.
/// Updates never mutate in place: `with_price`/`with_history` build a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedInstrument {
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<PriceQuote>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<HistoryPoint>>,
}

impl SelectedInstrument {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            price: None,
            history: None,
        }
    }

    /// Identity-only selection built from a constituent.
    pub fn from_constituent(constituent: &ConstituentSummary) -> Self {
        Self::new(constituent.code_instrument.clone(), constituent.name.clone())
    }

    #[must_use]
    pub fn with_price(&self, price: PriceQuote) -> Self {
        Self {
            price: Some(price),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_history(&self, history: Vec<HistoryPoint>) -> Self {
        Self {
            history: Some(history),
            ..self.clone()
        }
    }
}
