pub mod errors;
pub mod gateway;
pub mod models;
pub mod services;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use errors::CoreError;
use gateway::http::HttpGateway;
use gateway::traits::MarketDataGateway;
use models::{
    chart::{ChartSeries, PriceStats},
    index::{available_indices, MarketIndex, PRIMARY_INDEX},
    instrument::HistoryPoint,
    period::Period,
    response::SummaryData,
    settings::DashboardSettings,
};
use services::{
    chart_service::{self, ChartService},
    sample_data::{mock_constituents, SampleDataGenerator},
    state_service::AppStateStore,
};

/// Main entry point for the market dashboard core.
///
/// Owns the state store, the data gateway and the chart engine, and exposes
/// the operations the UI triggers. Gateway failures never reach the caller:
/// each one ends in fallback data (mock constituents, a synthetic series,
/// or unchanged state) and a `warn!` log.
///
/// Fetch results apply to whatever is selected when they complete. A newer
/// selection does not cancel or discard an older fetch.
#[must_use]
pub struct Dashboard {
    settings: DashboardSettings,
    state: AppStateStore,
    gateway: Box<dyn MarketDataGateway>,
    chart_service: ChartService,
    /// Raw history the chart is drawn from (real or synthetic).
    chart_data: Vec<HistoryPoint>,
    /// Header summary of the current index.
    index_summary: Option<SummaryData>,
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("gateway", &self.gateway.name())
            .field("state", &self.state)
            .field("chart_points", &self.chart_data.len())
            .field("has_index_summary", &self.index_summary.is_some())
            .finish()
    }
}

impl Dashboard {
    /// Dashboard reading from the HTTP gateway configured by `settings`.
    pub fn new(settings: DashboardSettings) -> Result<Self, CoreError> {
        settings.validate()?;
        let gateway = HttpGateway::from_settings(&settings);
        Ok(Self::with_gateway(settings, Box::new(gateway)))
    }

    /// Dashboard configured from `DASHBOARD_*` environment variables.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::new(DashboardSettings::from_env())
    }

    /// Dashboard over any gateway (tests, alternative data sources).
    pub fn with_gateway(settings: DashboardSettings, gateway: Box<dyn MarketDataGateway>) -> Self {
        let state = AppStateStore::with_defaults(settings.default_period, settings.default_index.clone());
        let chart_service = ChartService::with_max_labels(settings.max_chart_labels);
        Self {
            settings,
            state,
            gateway,
            chart_service,
            chart_data: Vec::new(),
            index_summary: None,
        }
    }

    // ── Accessors ───────────────────────────────────────────────────

    #[must_use]
    pub fn state(&self) -> &AppStateStore {
        &self.state
    }

    /// Direct access for plain state transitions (search term, observers).
    pub fn state_mut(&mut self) -> &mut AppStateStore {
        &mut self.state
    }

    #[must_use]
    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    #[must_use]
    pub fn chart_service(&self) -> &ChartService {
        &self.chart_service
    }

    /// Indices shown in the tab bar.
    #[must_use]
    pub fn indices(&self) -> Vec<MarketIndex> {
        available_indices()
    }

    #[must_use]
    pub fn available_instruments(&self) -> Vec<String> {
        self.gateway.available_instruments()
    }

    /// Raw history currently backing the chart.
    #[must_use]
    pub fn chart_data(&self) -> &[HistoryPoint] {
        &self.chart_data
    }

    #[must_use]
    pub fn index_summary(&self) -> Option<&SummaryData> {
        self.index_summary.as_ref()
    }

    // ── Constituents & Index ────────────────────────────────────────

    /// Initial load of the current index's constituents.
    /// Falls back to the built-in mock list when the fetch fails.
    pub async fn load_constituents(&mut self) {
        let index = self.state.current_index().to_string();
        match self.gateway.get_constituents(&index).await {
            Ok(resp) if resp.success => {
                info!(index = %index, count = resp.data.constituents.len(), "constituents loaded");
                self.state.set_constituents(resp.data.constituents);
            }
            Ok(resp) => {
                warn!(index = %index, code = resp.code, "constituents response not successful, using mock list");
                self.state.set_constituents(mock_constituents());
            }
            Err(e) => {
                warn!(index = %index, error = %e, "failed to load constituents, using mock list");
                self.state.set_constituents(mock_constituents());
            }
        }
    }

    /// Switch the active index tab.
    ///
    /// Clears the selection and search term. Only the primary index has a
    /// constituents resource; every other index shows an empty list, as does
    /// a failed reload.
    pub async fn change_index(&mut self, index_code: &str) {
        info!(index = index_code, "change index");
        self.state.set_current_index(index_code);
        self.state.set_selected_instrument(None);
        self.state.set_search_term("");
        self.chart_data.clear();

        if index_code != PRIMARY_INDEX {
            self.state.set_constituents(Vec::new());
            return;
        }

        match self.gateway.get_constituents(index_code).await {
            Ok(resp) if resp.success => self.state.set_constituents(resp.data.constituents),
            Ok(_) => self.state.set_constituents(Vec::new()),
            Err(e) => {
                warn!(index = index_code, error = %e, "failed to reload constituents");
                self.state.set_constituents(Vec::new());
            }
        }
    }

    /// Fetch the header summary for the current index.
    /// Leaves the previous summary in place when the fetch fails.
    pub async fn load_index_summary(&mut self) {
        let index = self.state.current_index().to_string();
        match self.gateway.get_instrument_summary(&index).await {
            Ok(resp) => match resp.into_data() {
                Some(data) => self.index_summary = Some(data),
                None => warn!(index = %index, "index summary response not successful"),
            },
            Err(e) => warn!(index = %index, error = %e, "failed to load index summary"),
        }
    }

    // ── Selection ───────────────────────────────────────────────────

    /// Select an instrument from the list and load its quote and history.
    ///
    /// Returns `false` (and fetches nothing) when the code is not in the
    /// current constituents.
    pub async fn select_instrument(&mut self, code: &str) -> bool {
        if !self.state.select_instrument_by_code(code) {
            return false;
        }
        self.load_instrument_price(code).await;
        self.load_instrument_history(code).await;
        true
    }

    /// Fetch the quote for `code` and attach it to the current selection.
    pub async fn load_instrument_price(&mut self, code: &str) {
        match self.gateway.get_instrument_summary(code).await {
            Ok(resp) => match resp.into_data() {
                Some(data) => {
                    self.state.update_selected_instrument_price(data.price);
                }
                None => warn!(code, "summary response not successful"),
            },
            Err(e) => warn!(code, error = %e, "failed to load instrument summary"),
        }
    }

    /// Fetch the history for `code`, attach it to the current selection and
    /// use it for the chart. An empty or failed history charts synthetic
    /// data for `code` instead.
    pub async fn load_instrument_history(&mut self, code: &str) {
        match self.gateway.get_instrument_history(code).await {
            Ok(resp) if resp.success => {
                let chart = resp.data.chart;
                self.state.update_selected_instrument_history(chart.clone());
                if chart.is_empty() {
                    warn!(code, "history is empty, using sample data");
                    self.chart_data = SampleDataGenerator::for_instrument(code, Utc::now());
                } else {
                    debug!(code, points = chart.len(), "history loaded");
                    self.chart_data = chart;
                }
            }
            Ok(resp) => {
                warn!(code, status = resp.code, "history response not successful, using sample data");
                self.chart_data = SampleDataGenerator::for_instrument(code, Utc::now());
            }
            Err(e) => {
                warn!(code, error = %e, "failed to load history, using sample data");
                self.chart_data = SampleDataGenerator::for_instrument(code, Utc::now());
            }
        }
    }

    /// Search-box submit: a single match gets selected.
    pub async fn submit_search(&mut self) -> bool {
        let only_match = match self.state.filtered_constituents().as_slice() {
            [only] => only.code_instrument.clone(),
            _ => return false,
        };
        self.select_instrument(&only_match).await
    }

    // ── Chart ───────────────────────────────────────────────────────

    /// Period selector entry point. The chart recomputes on the next read.
    pub fn change_period(&mut self, period: Period) {
        debug!(period = %period, "change period");
        self.state.set_current_period(period);
    }

    /// Windowed, labelled series for the current period.
    ///
    /// Without loaded history the generic sample series is windowed instead.
    #[must_use]
    pub fn chart_series(&self, now: DateTime<Utc>) -> ChartSeries {
        let period = self.state.current_period();
        if self.chart_data.is_empty() {
            let sample = SampleDataGenerator::generic(now);
            return self.chart_service.build_series(&sample, period, now);
        }
        self.chart_service.build_series(&self.chart_data, period, now)
    }

    /// Max, min and range of the prices in `chart_series(now)`.
    #[must_use]
    pub fn chart_stats(&self, now: DateTime<Utc>) -> Option<PriceStats> {
        chart_service::price_stats(&self.chart_series(now))
    }
}
