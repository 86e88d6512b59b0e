use crate::{AppState, Effect, Msg, Phase};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::StartRequested(raw) => {
            let Some(url) = accept_url(&mut state, &raw) else {
                return (state, Vec::new());
            };
            if url.is_empty() {
                return stop(state, true);
            }
            match state.phase() {
                // Overlap guard: a cycle is already outstanding.
                Phase::Fetching => {
                    state.queue_url_change(url);
                    Vec::new()
                }
                Phase::Waiting => {
                    if url != state.target_url() {
                        state.start_session(url);
                    } else {
                        // Restarting the current target drops an older queued edit.
                        state.queue_url_change(url);
                    }
                    vec![Effect::CancelPending, state.begin_cycle()]
                }
                Phase::Idle | Phase::Stopped => {
                    state.start_session(url);
                    vec![state.begin_cycle()]
                }
            }
        }
        Msg::RefetchRequested => match state.phase() {
            Phase::Fetching => Vec::new(),
            Phase::Waiting => vec![Effect::CancelPending, state.begin_cycle()],
            Phase::Idle | Phase::Stopped => {
                if state.target_url().is_empty() {
                    return (state, Vec::new());
                }
                let url = state.target_url().to_string();
                state.start_session(url);
                vec![state.begin_cycle()]
            }
        },
        Msg::TargetUrlChanged(raw) => {
            let Some(url) = accept_url(&mut state, &raw) else {
                return (state, Vec::new());
            };
            if url.is_empty() {
                return stop(state, true);
            }
            match state.phase() {
                Phase::Fetching | Phase::Waiting => state.queue_url_change(url),
                Phase::Idle | Phase::Stopped => state.set_target(url),
            }
            Vec::new()
        }
        Msg::StopRequested => return stop(state, false),
        Msg::FetchCompleted { cycle, result } => {
            // Late answers for a superseded or stopped cycle are dropped.
            if !state.is_current(cycle, Phase::Fetching) {
                return (state, Vec::new());
            }
            match result {
                Ok(listings) => {
                    let processed = state.process_batch(listings);
                    let delay = state.delay_after_success(processed.new_count);
                    let mut effects = vec![Effect::PublishBatch {
                        listings: state.current_batch().to_vec(),
                    }];
                    if !processed.to_notify.is_empty() {
                        effects.push(Effect::Notify {
                            cycle,
                            listings: processed.to_notify,
                        });
                    }
                    effects.extend(state.wait(delay));
                    effects
                }
                Err(failure) => {
                    state.record_failure(&failure);
                    let delay = state.delay_after_failure();
                    state.wait(delay).into_iter().collect()
                }
            }
        }
        Msg::TimerElapsed { cycle } => {
            if state.is_current(cycle, Phase::Waiting) {
                vec![state.begin_cycle()]
            } else {
                Vec::new()
            }
        }
        Msg::NotificationsDelivered { delivered, .. } => {
            state.record_delivered(delivered);
            Vec::new()
        }
    };

    (state, effects)
}

/// Trims and validates a user-supplied URL. An empty string is accepted and
/// means "clear the target"; an unparseable one is rejected.
fn accept_url(state: &mut AppState, raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(String::new());
    }
    match url::Url::parse(trimmed) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Some(trimmed.to_string()),
        Ok(parsed) => {
            state.set_error(format!("unsupported url scheme {}", parsed.scheme()));
            None
        }
        Err(err) => {
            state.set_error(format!("invalid url {trimmed}: {err}"));
            None
        }
    }
}

fn stop(mut state: AppState, clear_target: bool) -> (AppState, Vec<Effect>) {
    let had_pending = matches!(state.phase(), Phase::Fetching | Phase::Waiting);
    if clear_target {
        state.clear_target();
    } else if state.phase() != Phase::Stopped {
        state.stop();
    }
    let effects = if had_pending {
        vec![Effect::CancelPending]
    } else {
        Vec::new()
    };
    (state, effects)
}
