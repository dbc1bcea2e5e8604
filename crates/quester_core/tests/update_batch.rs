use std::sync::Once;

use quester_core::{
    update, AppState, BatchOrigin, Effect, Msg, QueryCount, HISTORY_CAPACITY,
    HISTORY_DISPLAY_LIMIT,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn queries(prefix: &str, n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("{prefix}{i}")).collect()
}

fn load(state: AppState, texts: Vec<String>, origin: BatchOrigin) -> AppState {
    let (state, effects) = update(state, Msg::FetchClicked);
    let request = match effects.as_slice() {
        [Effect::RequestBatch { request, .. }] => *request,
        other => panic!("unexpected effects {other:?}"),
    };
    let (state, effects) = update(
        state,
        Msg::BatchLoaded {
            request,
            queries: texts,
            origin,
        },
    );
    assert!(effects.is_empty());
    state
}

#[test]
fn fetch_requests_configured_size_and_reports_busy() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::CountChanged(QueryCount::clamped(5)));
    let (mut state, effects) = update(state, Msg::FetchClicked);

    assert_eq!(
        effects,
        vec![Effect::RequestBatch {
            request: 1,
            size: QueryCount::clamped(5),
        }]
    );
    assert!(state.view().busy);
    assert!(state.consume_dirty());
}

#[test]
fn loaded_batch_replaces_cards_and_grows_history() {
    init_logging();
    let state = load(AppState::new(), queries("q", 5), BatchOrigin::Remote);
    let view = state.view();

    assert!(!view.busy);
    assert_eq!(view.origin, Some(BatchOrigin::Remote));
    let texts: Vec<_> = view.cards.iter().map(|c| c.item.text.as_str()).collect();
    assert_eq!(texts, vec!["q1", "q2", "q3", "q4", "q5"]);
    assert_eq!(view.cards[0].ordinal, 1);
    assert!(view.cards.iter().all(|c| !c.done));
    assert_eq!(view.history_len, 5);
}

#[test]
fn fallback_batch_is_treated_like_remote_batch() {
    init_logging();
    let origin = BatchOrigin::Fallback {
        reason: "network error".to_string(),
    };
    let state = load(AppState::new(), queries("Unique query ", 3), origin.clone());
    let view = state.view();

    assert_eq!(view.cards.len(), 3);
    assert_eq!(view.origin, Some(origin));
    assert_eq!(view.history_len, 3);
}

#[test]
fn new_batch_clears_completion() {
    init_logging();
    let state = load(AppState::new(), queries("a", 2), BatchOrigin::Remote);
    let first = state.view().cards[0].item.clone();
    let (state, _) = update(state, Msg::CopyClicked(first));
    assert_eq!(state.view().done_count, 1);

    let state = load(state, queries("b", 2), BatchOrigin::Remote);
    let view = state.view();
    assert_eq!(view.done_count, 0);
    assert!(view.cards.iter().all(|c| !c.done));
}

#[test]
fn history_is_bounded_and_panel_shows_recent_tail() {
    init_logging();
    let mut state = AppState::new();
    for round in 0..3 {
        state = load(state, queries(&format!("r{round}-"), 30), BatchOrigin::Remote);
    }
    let view = state.view();

    assert_eq!(view.history_len, HISTORY_CAPACITY);
    assert_eq!(view.history.len(), HISTORY_DISPLAY_LIMIT);
    assert_eq!(view.history.last().map(String::as_str), Some("r2-30"));
    assert_eq!(view.history.first().map(String::as_str), Some("r2-21"));
}

#[test]
fn clear_history_keeps_current_batch() {
    init_logging();
    let state = load(AppState::new(), queries("q", 3), BatchOrigin::Remote);
    let first = state.view().cards[0].item.clone();
    let (state, _) = update(state, Msg::CopyClicked(first));
    let (mut state, effects) = update(state, Msg::ClearHistoryClicked);

    assert!(effects.is_empty());
    assert!(state.consume_dirty());
    let view = state.view();
    assert_eq!(view.history_len, 0);
    assert!(view.history.is_empty());
    assert_eq!(view.cards.len(), 3);
    assert_eq!(view.done_count, 1);
}

#[test]
fn overlapping_requests_resolve_last_write_wins() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::FetchClicked);
    let (state, _) = update(state, Msg::FetchClicked);
    assert!(state.view().busy);

    let (state, _) = update(
        state,
        Msg::BatchLoaded {
            request: 2,
            queries: queries("second", 2),
            origin: BatchOrigin::Remote,
        },
    );
    assert!(state.view().busy);

    let (state, _) = update(
        state,
        Msg::BatchLoaded {
            request: 1,
            queries: queries("first", 2),
            origin: BatchOrigin::Remote,
        },
    );
    let view = state.view();
    assert!(!view.busy);
    assert_eq!(view.cards[0].item.text, "first1");
    assert_eq!(view.history_len, 4);
}

#[test]
fn unknown_or_repeated_batch_results_are_dropped() {
    init_logging();
    let (mut state, _) = update(AppState::new(), Msg::FetchClicked);
    state.consume_dirty();
    let (mut state, _) = update(
        state,
        Msg::BatchLoaded {
            request: 7,
            queries: queries("stray", 2),
            origin: BatchOrigin::Remote,
        },
    );
    assert!(!state.consume_dirty());
    assert!(state.view().busy);
    assert!(state.view().cards.is_empty());

    let (state, _) = update(
        state,
        Msg::BatchLoaded {
            request: 1,
            queries: queries("q", 2),
            origin: BatchOrigin::Remote,
        },
    );
    let (mut state, effects) = update(
        state,
        Msg::BatchLoaded {
            request: 1,
            queries: queries("again", 2),
            origin: BatchOrigin::Remote,
        },
    );
    assert!(effects.is_empty());
    assert!(state.consume_dirty());
    let view = state.view();
    assert!(!view.busy);
    assert_eq!(view.cards[0].item.text, "q1");
    assert_eq!(view.history_len, 2);
}
