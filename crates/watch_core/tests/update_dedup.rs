use watch_core::{update, AppState, DedupScope, Effect, Listing, Msg, PollConfig};

const URL: &str = "https://divar.ir/s/tehran/rent-apartment";

fn init_logging() {
    engine_logging::initialize_for_tests();
}

fn listing(token: &str, suitable: bool) -> Listing {
    Listing {
        token: token.to_string(),
        title: format!("flat {token}"),
        suitable,
        ..Listing::default()
    }
}

/// Drives one full cycle (start or timer, then fetch result) and returns the
/// tokens that were handed to the notifier.
fn run_cycle(state: AppState, batch: Vec<Listing>) -> (AppState, Vec<String>) {
    let (state, effects) = match state.active_cycle() {
        None => update(state, Msg::StartRequested(URL.to_string())),
        Some(cycle) => update(state, Msg::TimerElapsed { cycle }),
    };
    let cycle = effects
        .iter()
        .find_map(|effect| match effect {
            Effect::Fetch { cycle, .. } => Some(*cycle),
            _ => None,
        })
        .expect("fetch effect");
    let (state, effects) = update(
        state,
        Msg::FetchCompleted {
            cycle,
            result: Ok(batch),
        },
    );
    let notified = effects
        .into_iter()
        .filter_map(|effect| match effect {
            Effect::Notify { listings, .. } => Some(listings),
            _ => None,
        })
        .flatten()
        .map(|listing| listing.token)
        .collect();
    (state, notified)
}

#[test]
fn no_second_notification_for_already_notified_token() {
    init_logging();
    let (state, first) = run_cycle(AppState::new(), vec![listing("a", true)]);
    assert_eq!(first, vec!["a"]);

    let (_, second) = run_cycle(state, vec![listing("b", true), listing("a", true)]);
    assert_eq!(second, vec!["b"]);
}

#[test]
fn unsuitable_new_listing_is_never_notified() {
    init_logging();
    let (state, notified) = run_cycle(
        AppState::new(),
        vec![listing("a", false), listing("b", true)],
    );
    assert_eq!(notified, vec!["b"]);
    assert_eq!(state.view().last_new_count, 2);
}

#[test]
fn quiet_cold_start_marks_first_batch_seen() {
    init_logging();
    let config = PollConfig {
        notify_on_first_poll: false,
        ..PollConfig::default()
    };
    let (state, first) = run_cycle(
        AppState::with_config(config),
        vec![listing("a", true), listing("b", true)],
    );
    assert!(first.is_empty());
    assert_eq!(state.seen_tokens().len(), 2);

    let (_, second) = run_cycle(
        state,
        vec![listing("c", true), listing("a", true), listing("b", true)],
    );
    assert_eq!(second, vec!["c"]);
}

#[test]
fn empty_first_page_keeps_cold_start_quiet() {
    init_logging();
    let config = PollConfig {
        notify_on_first_poll: false,
        ..PollConfig::default()
    };
    let (state, empty) = run_cycle(AppState::with_config(config), Vec::new());
    assert!(empty.is_empty());

    let (state, first) = run_cycle(state, vec![listing("a", true), listing("b", true)]);
    assert!(first.is_empty());
    assert_eq!(state.seen_tokens().len(), 2);

    let (_, next) = run_cycle(state, vec![listing("c", true), listing("a", true)]);
    assert_eq!(next, vec!["c"]);
}

#[test]
fn session_scope_does_not_renotify_reappearing_listing() {
    init_logging();
    let (state, _) = run_cycle(AppState::new(), vec![listing("a", true)]);
    let (state, gone) = run_cycle(state, vec![listing("b", true)]);
    assert_eq!(gone, vec!["b"]);
    let (_, back) = run_cycle(state, vec![listing("a", true), listing("b", true)]);
    assert!(back.is_empty());
}

#[test]
fn batch_scope_renotifies_reappearing_listing() {
    init_logging();
    let config = PollConfig {
        dedup_scope: DedupScope::Batch,
        ..PollConfig::default()
    };
    let (state, _) = run_cycle(AppState::with_config(config), vec![listing("a", true)]);
    let (state, _) = run_cycle(state, vec![listing("b", true)]);
    let (_, back) = run_cycle(state, vec![listing("a", true), listing("b", true)]);
    assert_eq!(back, vec!["a"]);
}

#[test]
fn empty_extraction_keeps_previous_batch() {
    init_logging();
    let (state, _) = run_cycle(AppState::new(), vec![listing("a", true)]);
    let (state, notified) = run_cycle(state, Vec::new());
    assert!(notified.is_empty());
    assert_eq!(state.current_batch(), &[listing("a", true)]);
    assert_eq!(state.view().listings.len(), 1);
}

#[test]
fn duplicate_cards_in_one_batch_reach_notifier_in_order() {
    init_logging();
    // Per-cycle de-duplication of repeated cards is the notifier's job.
    let (state, notified) = run_cycle(
        AppState::new(),
        vec![listing("a", true), listing("a", true)],
    );
    assert_eq!(notified, vec!["a", "a"]);
    assert_eq!(state.seen_tokens().len(), 1);
}
