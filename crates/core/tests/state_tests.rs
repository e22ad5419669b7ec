// ═══════════════════════════════════════════════════════════════════
// State Tests — AppStateStore transitions, filtered view, observers
// ═══════════════════════════════════════════════════════════════════

use std::sync::{Arc, Mutex};

use market_dashboard_core::models::instrument::{
    ConstituentSummary, HistoryPoint, PriceQuote, SelectedInstrument, Tendency,
};
use market_dashboard_core::models::period::Period;
use market_dashboard_core::services::state_service::{AppStateStore, StateChange};

fn constituent(code: &str, name: &str, short_name: &str) -> ConstituentSummary {
    ConstituentSummary {
        code_instrument: code.into(),
        name: name.into(),
        short_name: short_name.into(),
        pct_day: 0.5,
        pct_30d: 1.0,
        pct_cy: 2.0,
        pct_1y: 3.0,
        last_price: 1000.0,
        datetime_last_price: "05-09-2025 15:30:00".into(),
        volume_money: 1_000_000.0,
        accumulated_volume_money: 10_000_000.0,
        tend: Tendency::Up,
        performance_absolute: 5.0,
        performance_relative: 0.5,
    }
}

fn quote(last_price: f64) -> PriceQuote {
    PriceQuote {
        last_price,
        datetime_last_price: "05-09-2025 15:30:00".into(),
        open_price: last_price - 10.0,
        close_price: last_price,
        datetime_close_price: "05-09-2025 16:00:00".into(),
        performance_absolute: 10.0,
        performance_relative: 0.35,
        bid: last_price - 1.0,
        bid_volume: 500.0,
        bid_datetime: "05-09-2025 15:29:00".into(),
        ask: last_price + 1.0,
        ask_volume: 700.0,
        ask_datetime: "05-09-2025 15:29:30".into(),
        high_price: last_price + 20.0,
        low_price: last_price - 20.0,
        volume: 120_000.0,
        volume_money: 3_400_000_000.0,
        tend: Tendency::Up,
    }
}

fn bar(date: &str, price: f64) -> HistoryPoint {
    HistoryPoint {
        datetime_last_price: date.into(),
        datetime_last_price_ts: 0,
        last_price: price,
        high_price: price + 1.0,
        low_price: price - 1.0,
        open_price: price,
        close_price: price,
        volume: 1000.0,
        volume_money: price * 1000.0,
        performance_relative: 0.0,
        performance_absolute: 0.0,
        tend: Tendency::Same,
    }
}

fn sample_list() -> Vec<ConstituentSummary> {
    vec![
        constituent("AGUAS-A", "Aguas Andinas A", "AGUAS-A"),
        constituent("BCI", "Banco de Crédito e Inversiones", "BCI"),
        constituent("BSANTANDER", "Banco Santander Chile", "BSANTANDER"),
        constituent("CAP", "CAP S.A.", "CAP"),
    ]
}

fn codes(list: &[&ConstituentSummary]) -> Vec<String> {
    list.iter().map(|c| c.code_instrument.clone()).collect()
}

// ── Initial state ───────────────────────────────────────────────────

mod initial_state {
    use super::*;

    #[test]
    fn defaults() {
        let store = AppStateStore::new();
        assert!(store.constituents().is_empty());
        assert_eq!(store.search_term(), "");
        assert!(store.selected_instrument().is_none());
        assert_eq!(store.current_period(), Period::OneMonth);
        assert_eq!(store.current_index(), "IPSA");
        assert_eq!(store.observer_count(), 0);
    }

    #[test]
    fn with_defaults_uses_given_period_and_index() {
        let store = AppStateStore::with_defaults(Period::SixMonths, "IGPA");
        assert_eq!(store.current_period(), Period::SixMonths);
        assert_eq!(store.current_index(), "IGPA");
    }
}

// ── Filtered constituents ───────────────────────────────────────────

mod filtered_constituents {
    use super::*;

    #[test]
    fn empty_term_returns_full_list_in_order() {
        let mut store = AppStateStore::new();
        store.set_constituents(sample_list());
        assert_eq!(
            codes(&store.filtered_constituents()),
            vec!["AGUAS-A", "BCI", "BSANTANDER", "CAP"]
        );
    }

    #[test]
    fn matches_code_case_insensitively() {
        let mut store = AppStateStore::new();
        store.set_constituents(sample_list());
        store.set_search_term("bci");
        assert_eq!(codes(&store.filtered_constituents()), vec!["BCI"]);
    }

    #[test]
    fn matches_name_substring() {
        let mut store = AppStateStore::new();
        store.set_constituents(sample_list());
        store.set_search_term("BANCO");
        assert_eq!(codes(&store.filtered_constituents()), vec!["BCI", "BSANTANDER"]);
    }

    #[test]
    fn matches_short_name() {
        let mut store = AppStateStore::new();
        store.set_constituents(vec![constituent("X1", "Unrelated", "Shorty")]);
        store.set_search_term("hort");
        assert_eq!(store.filtered_constituents().len(), 1);
    }

    #[test]
    fn no_match_is_empty() {
        let mut store = AppStateStore::new();
        store.set_constituents(sample_list());
        store.set_search_term("zzz");
        assert!(store.filtered_constituents().is_empty());
    }

    #[test]
    fn filtered_is_ordered_subset_for_many_terms() {
        let mut store = AppStateStore::new();
        let list = sample_list();
        store.set_constituents(list.clone());

        for term in ["", "a", "A", "an", "s.a", "cap", "Chile", "-", "é", "q"] {
            store.set_search_term(term);
            let filtered = store.filtered_constituents();
            let needle = term.to_lowercase();

            // membership ⇔ match
            for c in &list {
                let expected = c.name.to_lowercase().contains(&needle)
                    || c.short_name.to_lowercase().contains(&needle)
                    || c.code_instrument.to_lowercase().contains(&needle);
                let present = filtered.iter().any(|f| f.code_instrument == c.code_instrument);
                assert_eq!(expected, present, "term {term:?}, code {}", c.code_instrument);
            }

            // relative order preserved
            let positions: Vec<usize> = filtered
                .iter()
                .map(|f| list.iter().position(|c| c.code_instrument == f.code_instrument).unwrap())
                .collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]), "term {term:?}");
        }
    }

    #[test]
    fn recomputes_after_list_replacement() {
        let mut store = AppStateStore::new();
        store.set_constituents(sample_list());
        store.set_search_term("cap");
        assert_eq!(store.filtered_constituents().len(), 1);

        store.set_constituents(vec![constituent("CAPITAL", "Capital", "CPT"), constituent("CAP2", "Cap dos", "C2")]);
        assert_eq!(codes(&store.filtered_constituents()), vec!["CAPITAL", "CAP2"]);
    }
}

// ── Selection ───────────────────────────────────────────────────────

mod selection {
    use super::*;

    #[test]
    fn select_known_code_sets_identity_only() {
        let mut store = AppStateStore::new();
        store.set_constituents(sample_list());

        assert!(store.select_instrument_by_code("BCI"));
        let selected = store.selected_instrument().unwrap();
        assert_eq!(selected.code, "BCI");
        assert_eq!(selected.name, "Banco de Crédito e Inversiones");
        assert!(selected.price.is_none());
        assert!(selected.history.is_none());
        assert!(store.is_selected("BCI"));
        assert!(!store.is_selected("CAP"));
    }

    #[test]
    fn select_unknown_code_keeps_previous_selection() {
        let mut store = AppStateStore::new();
        store.set_constituents(sample_list());
        store.select_instrument_by_code("CAP");
        store.update_selected_instrument_price(quote(6000.0));
        let before = store.selected_instrument().cloned();

        assert!(!store.select_instrument_by_code("NOPE"));
        assert_eq!(store.selected_instrument().cloned(), before);

        // idempotent
        assert!(!store.select_instrument_by_code("NOPE"));
        assert_eq!(store.selected_instrument().cloned(), before);
    }

    #[test]
    fn select_unknown_code_without_selection_stays_none() {
        let mut store = AppStateStore::new();
        store.set_constituents(sample_list());
        assert!(!store.select_instrument_by_code("bci")); // exact match only
        assert!(store.selected_instrument().is_none());
    }

    #[test]
    fn reselect_drops_attached_data() {
        let mut store = AppStateStore::new();
        store.set_constituents(sample_list());
        store.select_instrument_by_code("BCI");
        store.update_selected_instrument_price(quote(28000.0));

        store.select_instrument_by_code("BCI");
        assert!(store.selected_instrument().unwrap().price.is_none());
    }

    #[test]
    fn set_constituents_keeps_selection_and_search() {
        let mut store = AppStateStore::new();
        store.set_constituents(sample_list());
        store.set_search_term("ban");
        store.select_instrument_by_code("BCI");

        store.set_constituents(Vec::new());
        assert_eq!(store.search_term(), "ban");
        assert_eq!(store.selected_instrument().unwrap().code, "BCI");
    }

    #[test]
    fn set_selected_none_clears() {
        let mut store = AppStateStore::new();
        store.set_constituents(sample_list());
        store.select_instrument_by_code("BCI");
        store.set_selected_instrument(None);
        assert!(store.selected_instrument().is_none());
    }
}

// ── Attached price / history ────────────────────────────────────────

mod attached_data {
    use super::*;

    #[test]
    fn price_update_without_selection_is_noop() {
        let mut store = AppStateStore::new();
        assert!(!store.update_selected_instrument_price(quote(1.0)));
        assert!(store.selected_instrument().is_none());
    }

    #[test]
    fn history_update_without_selection_is_noop() {
        let mut store = AppStateStore::new();
        assert!(!store.update_selected_instrument_history(vec![bar("2025-01-01", 1.0)]));
        assert!(store.selected_instrument().is_none());
    }

    #[test]
    fn price_update_preserves_history() {
        let mut store = AppStateStore::new();
        store.set_constituents(sample_list());
        store.select_instrument_by_code("CAP");
        let history = vec![bar("2025-01-01", 1.0), bar("2025-01-02", 2.0)];
        store.update_selected_instrument_history(history.clone());

        assert!(store.update_selected_instrument_price(quote(6100.0)));
        let selected = store.selected_instrument().unwrap();
        assert_eq!(selected.history.as_ref(), Some(&history));
        assert_eq!(selected.price.as_ref().unwrap().last_price, 6100.0);
        assert_eq!(selected.code, "CAP");
        assert_eq!(selected.name, "CAP S.A.");
    }

    #[test]
    fn history_update_preserves_price() {
        let mut store = AppStateStore::new();
        store.set_constituents(sample_list());
        store.select_instrument_by_code("CAP");
        store.update_selected_instrument_price(quote(6100.0));

        assert!(store.update_selected_instrument_history(vec![bar("2025-01-01", 1.0)]));
        let selected = store.selected_instrument().unwrap();
        assert_eq!(selected.price, Some(quote(6100.0)));
        assert_eq!(selected.history.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn later_update_replaces_earlier() {
        let mut store = AppStateStore::new();
        store.set_constituents(sample_list());
        store.select_instrument_by_code("CAP");
        store.update_selected_instrument_price(quote(1.0));
        store.update_selected_instrument_price(quote(2.0));
        assert_eq!(store.selected_instrument().unwrap().price, Some(quote(2.0)));
    }

    #[test]
    fn earlier_snapshot_is_not_mutated() {
        let mut store = AppStateStore::new();
        store.set_constituents(sample_list());
        store.select_instrument_by_code("CAP");
        let snapshot: SelectedInstrument = store.selected_instrument().cloned().unwrap();

        store.update_selected_instrument_price(quote(6100.0));
        assert!(snapshot.price.is_none());
    }
}

// ── Scalars ─────────────────────────────────────────────────────────

mod scalars {
    use super::*;

    #[test]
    fn period_and_index_replace() {
        let mut store = AppStateStore::new();
        store.set_current_period(Period::OneYear);
        store.set_current_index("NASDAQ");
        assert_eq!(store.current_period(), Period::OneYear);
        assert_eq!(store.current_index(), "NASDAQ");
    }

    #[test]
    fn search_term_replaces() {
        let mut store = AppStateStore::new();
        store.set_search_term("abc");
        store.set_search_term("x");
        assert_eq!(store.search_term(), "x");
    }
}

// ── Observers ───────────────────────────────────────────────────────

mod observers {
    use super::*;

    fn recorder(store: &mut AppStateStore) -> Arc<Mutex<Vec<StateChange>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        store.subscribe(move |change, _| sink.lock().unwrap().push(change));
        log
    }

    #[test]
    fn notified_once_per_transition_in_order() {
        let mut store = AppStateStore::new();
        let log = recorder(&mut store);

        store.set_constituents(sample_list());
        store.set_search_term("b");
        store.select_instrument_by_code("BCI");
        store.update_selected_instrument_price(quote(1.0));
        store.update_selected_instrument_history(Vec::new());
        store.set_current_period(Period::ThreeMonths);
        store.set_current_index("IGPA");

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                StateChange::Constituents,
                StateChange::SearchTerm,
                StateChange::Selection,
                StateChange::SelectedPrice,
                StateChange::SelectedHistory,
                StateChange::Period,
                StateChange::Index,
            ]
        );
    }

    #[test]
    fn noops_do_not_notify() {
        let mut store = AppStateStore::new();
        store.set_constituents(sample_list());
        let log = recorder(&mut store);

        store.select_instrument_by_code("UNKNOWN");
        store.update_selected_instrument_price(quote(1.0));
        store.update_selected_instrument_history(Vec::new());
        store.set_current_period(Period::OneMonth);
        store.set_current_index("IPSA");
        store.set_search_term("");

        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn observer_sees_state_after_transition() {
        let mut store = AppStateStore::new();
        store.set_constituents(sample_list());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        store.subscribe(move |_, state| {
            sink.lock()
                .unwrap()
                .push(state.selected_instrument().map(|s| s.code.clone()));
        });

        store.select_instrument_by_code("CAP");
        store.set_selected_instrument(None);

        assert_eq!(*seen.lock().unwrap(), vec![Some("CAP".to_string()), None]);
    }

    #[test]
    fn observers_run_in_registration_order() {
        let mut store = AppStateStore::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for n in 0..3 {
            let sink = Arc::clone(&order);
            store.subscribe(move |_, _| sink.lock().unwrap().push(n));
        }
        store.set_search_term("x");
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let mut store = AppStateStore::new();
        let log = Arc::new(Mutex::new(0usize));
        let sink = Arc::clone(&log);
        let id = store.subscribe(move |_, _| *sink.lock().unwrap() += 1);

        store.set_search_term("a");
        assert!(store.unsubscribe(id));
        store.set_search_term("b");

        assert_eq!(*log.lock().unwrap(), 1);
        assert_eq!(store.observer_count(), 0);
        assert!(!store.unsubscribe(id));
    }

    #[test]
    fn observers_survive_notification_pass() {
        let mut store = AppStateStore::new();
        let _log = recorder(&mut store);
        store.set_search_term("a");
        assert_eq!(store.observer_count(), 1);
    }
}

// ── End-to-end ──────────────────────────────────────────────────────

#[test]
fn search_select_and_attach_price() {
    let mut store = AppStateStore::new();
    store.set_constituents(vec![constituent("BCI", "Banco de Crédito e Inversiones", "BCI")]);

    store.set_search_term("bci");
    assert_eq!(store.filtered_constituents().len(), 1);

    store.select_instrument_by_code("BCI");
    let selected = store.selected_instrument().unwrap();
    assert_eq!(selected.code, "BCI");
    assert!(selected.price.is_none());

    store.update_selected_instrument_price(quote(28560.0));
    let selected = store.selected_instrument().unwrap();
    assert_eq!(selected.price.as_ref().unwrap().last_price, 28560.0);
    assert!(selected.history.is_none());
}
