use tracing::debug;
use uuid::Uuid;

use crate::models::index::PRIMARY_INDEX;
use crate::models::instrument::{ConstituentSummary, HistoryPoint, PriceQuote, SelectedInstrument};
use crate::models::period::Period;

/// Handle returned by `subscribe`, used to unsubscribe later.
pub type SubscriptionId = Uuid;

/// Which part of the state a transition replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateChange {
    Constituents,
    SearchTerm,
    Selection,
    SelectedPrice,
    SelectedHistory,
    Period,
    Index,
}

type Observer = Box<dyn FnMut(StateChange, &AppStateStore) + Send>;

/// Single source of truth for everything the dashboard UI shows.
///
/// - Reads borrow the current value; the filtered list is recomputed on each call.
/// - Writes replace whole values. The selection is never patched in place:
///   attaching a price or history builds a new `SelectedInstrument`.
/// - After every effective transition, observers run once each, in
///   registration order. They get a shared reference, so they cannot
///   trigger further transitions from inside the notification.
///
/// None of the operations can fail.
pub struct AppStateStore {
    constituents: Vec<ConstituentSummary>,
    search_term: String,
    selected: Option<SelectedInstrument>,
    current_period: Period,
    current_index: String,
    observers: Vec<(SubscriptionId, Observer)>,
}

impl std::fmt::Debug for AppStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppStateStore")
            .field("constituents", &self.constituents.len())
            .field("search_term", &self.search_term)
            .field("selected", &self.selected.as_ref().map(|s| &s.code))
            .field("current_period", &self.current_period)
            .field("current_index", &self.current_index)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl AppStateStore {
    pub fn new() -> Self {
        Self::with_defaults(Period::default(), PRIMARY_INDEX)
    }

    /// Empty store starting on the given period and index.
    pub fn with_defaults(period: Period, index_code: impl Into<String>) -> Self {
        Self {
            constituents: Vec::new(),
            search_term: String::new(),
            selected: None,
            current_period: period,
            current_index: index_code.into(),
            observers: Vec::new(),
        }
    }

    // ── Reads ───────────────────────────────────────────────────────

    #[must_use]
    pub fn constituents(&self) -> &[ConstituentSummary] {
        &self.constituents
    }

    #[must_use]
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    #[must_use]
    pub fn selected_instrument(&self) -> Option<&SelectedInstrument> {
        self.selected.as_ref()
    }

    #[must_use]
    pub fn current_period(&self) -> Period {
        self.current_period
    }

    #[must_use]
    pub fn current_index(&self) -> &str {
        &self.current_index
    }

    /// Constituents matching the search term (case-insensitive substring of
    /// name, short name or code), in list order. Empty term matches all.
    #[must_use]
    pub fn filtered_constituents(&self) -> Vec<&ConstituentSummary> {
        let needle = self.search_term.to_lowercase();
        if needle.is_empty() {
            return self.constituents.iter().collect();
        }
        self.constituents
            .iter()
            .filter(|c| c.matches(&needle))
            .collect()
    }

    /// Whether `code` is the currently selected instrument.
    #[must_use]
    pub fn is_selected(&self, code: &str) -> bool {
        self.selected.as_ref().is_some_and(|s| s.code == code)
    }

    // ── Writes ──────────────────────────────────────────────────────

    /// Replace the whole constituent list. Selection and search term are kept.
    pub fn set_constituents(&mut self, constituents: Vec<ConstituentSummary>) {
        debug!(count = constituents.len(), "set constituents");
        self.constituents = constituents;
        self.notify(StateChange::Constituents);
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        let term = term.into();
        if term == self.search_term {
            return;
        }
        self.search_term = term;
        self.notify(StateChange::SearchTerm);
    }

    /// Replace the selection directly (`None` clears it).
    pub fn set_selected_instrument(&mut self, selected: Option<SelectedInstrument>) {
        self.selected = selected;
        self.notify(StateChange::Selection);
    }

    /// Select the constituent with exactly this code.
    ///
    /// Returns `false` and leaves the previous selection untouched when the
    /// code is not in the current list.
    pub fn select_instrument_by_code(&mut self, code: &str) -> bool {
        let Some(constituent) = self.constituents.iter().find(|c| c.code_instrument == code)
        else {
            debug!(code, "select: code not in constituents, ignoring");
            return false;
        };
        let selected = SelectedInstrument::from_constituent(constituent);
        debug!(code, "select instrument");
        self.set_selected_instrument(Some(selected));
        true
    }

    /// Attach a quote to the current selection. No-op without a selection.
    pub fn update_selected_instrument_price(&mut self, price: PriceQuote) -> bool {
        let Some(current) = &self.selected else {
            return false;
        };
        self.selected = Some(current.with_price(price));
        self.notify(StateChange::SelectedPrice);
        true
    }

    /// Attach a history to the current selection. No-op without a selection.
    pub fn update_selected_instrument_history(&mut self, history: Vec<HistoryPoint>) -> bool {
        let Some(current) = &self.selected else {
            return false;
        };
        self.selected = Some(current.with_history(history));
        self.notify(StateChange::SelectedHistory);
        true
    }

    pub fn set_current_period(&mut self, period: Period) {
        if period == self.current_period {
            return;
        }
        self.current_period = period;
        self.notify(StateChange::Period);
    }

    pub fn set_current_index(&mut self, index_code: impl Into<String>) {
        let index_code = index_code.into();
        if index_code == self.current_index {
            return;
        }
        self.current_index = index_code;
        self.notify(StateChange::Index);
    }

    // ── Observers ───────────────────────────────────────────────────

    /// Register a callback run after every effective state transition.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(StateChange, &AppStateStore) + Send + 'static,
    {
        let id = Uuid::new_v4();
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove a callback. Returns `false` if the id is unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn notify(&mut self, change: StateChange) {
        if self.observers.is_empty() {
            return;
        }
        // Observers are moved out for the pass so each one can read the store.
        let mut observers = std::mem::take(&mut self.observers);
        for (_, observer) in observers.iter_mut() {
            observer(change, self);
        }
        self.observers = observers;
    }
}

impl Default for AppStateStore {
    fn default() -> Self {
        Self::new()
    }
}
