use std::collections::HashSet;
use std::time::Duration;

use crate::view_model::{AppViewModel, ListingRow};
use crate::{diff, Effect, FetchFailure, Listing};

pub type CycleId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Fetching,
    Waiting,
    Stopped,
}

/// Lifetime of the "already seen" token set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DedupScope {
    /// Tokens accumulate for the whole session; a listing that disappears and
    /// comes back is not reported again.
    #[default]
    Session,
    /// Only the latest batch counts as seen.
    Batch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    pub poll_interval_with_new_items: Duration,
    pub poll_interval_idle: Duration,
    /// Whether suitable listings of the first successful poll raise alerts.
    pub notify_on_first_poll: bool,
    pub dedup_scope: DedupScope,
    /// When set, consecutive failures double the idle delay up to this cap.
    pub failure_backoff_cap: Option<Duration>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            poll_interval_with_new_items: Duration::from_secs(15),
            poll_interval_idle: Duration::from_secs(30),
            notify_on_first_poll: true,
            dedup_scope: DedupScope::Session,
            failure_backoff_cap: None,
        }
    }
}

/// Outcome of processing one successful fetch.
pub(crate) struct Processed {
    pub new_count: usize,
    pub to_notify: Vec<Listing>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    config: PollConfig,
    phase: Phase,
    target_url: String,
    pending_url: Option<String>,
    current_batch: Vec<Listing>,
    seen_tokens: HashSet<String>,
    next_delay: Option<Duration>,
    next_cycle: CycleId,
    active_cycle: Option<CycleId>,
    cold_start: bool,
    consecutive_failures: u32,
    last_new_count: usize,
    notified_total: usize,
    last_error: Option<String>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::with_config(PollConfig::default())
    }

    pub fn with_config(config: PollConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
            target_url: String::new(),
            pending_url: None,
            current_batch: Vec::new(),
            seen_tokens: HashSet::new(),
            next_delay: None,
            next_cycle: 0,
            active_cycle: None,
            cold_start: true,
            consecutive_failures: 0,
            last_new_count: 0,
            notified_total: 0,
            last_error: None,
            dirty: false,
        }
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_fetching(&self) -> bool {
        self.phase == Phase::Fetching
    }

    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    pub fn current_batch(&self) -> &[Listing] {
        &self.current_batch
    }

    pub fn seen_tokens(&self) -> &HashSet<String> {
        &self.seen_tokens
    }

    pub fn next_delay(&self) -> Option<Duration> {
        self.next_delay
    }

    pub fn active_cycle(&self) -> Option<CycleId> {
        self.active_cycle
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            phase: self.phase,
            target_url: self.target_url.clone(),
            pending_url: self.pending_url.clone(),
            cycle: self.active_cycle,
            listings: self.current_batch.iter().map(ListingRow::from).collect(),
            seen_count: self.seen_tokens.len(),
            last_new_count: self.last_new_count,
            notified_total: self.notified_total,
            next_delay: self.next_delay,
            consecutive_failures: self.consecutive_failures,
            last_error: self.last_error.clone(),
        }
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_error(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
        self.mark_dirty();
    }

    /// Discards everything learned about the previous target.
    pub(crate) fn start_session(&mut self, url: String) {
        self.target_url = url;
        self.pending_url = None;
        self.current_batch.clear();
        self.seen_tokens.clear();
        self.next_delay = None;
        self.cold_start = true;
        self.consecutive_failures = 0;
        self.last_new_count = 0;
        self.last_error = None;
        self.mark_dirty();
    }

    pub(crate) fn set_target(&mut self, url: String) {
        if self.target_url != url {
            self.target_url = url;
            self.mark_dirty();
        }
    }

    pub(crate) fn queue_url_change(&mut self, url: String) {
        self.pending_url = (url != self.target_url).then_some(url);
        self.mark_dirty();
    }

    pub(crate) fn stop(&mut self) {
        self.phase = Phase::Stopped;
        self.active_cycle = None;
        self.pending_url = None;
        self.next_delay = None;
        self.mark_dirty();
    }

    pub(crate) fn clear_target(&mut self) {
        self.target_url.clear();
        self.stop();
    }

    /// Enters `Fetching` for a fresh cycle, applying a queued URL change first.
    pub(crate) fn begin_cycle(&mut self) -> Effect {
        if let Some(url) = self.pending_url.take() {
            self.start_session(url);
        }
        self.next_cycle += 1;
        let cycle = self.next_cycle;
        self.active_cycle = Some(cycle);
        self.phase = Phase::Fetching;
        self.next_delay = None;
        self.mark_dirty();
        Effect::Fetch {
            cycle,
            url: self.target_url.clone(),
        }
    }

    /// True when `cycle` is the outstanding one and we are in `phase`.
    pub(crate) fn is_current(&self, cycle: CycleId, phase: Phase) -> bool {
        self.phase == phase && self.active_cycle == Some(cycle)
    }

    pub(crate) fn process_batch(&mut self, listings: Vec<Listing>) -> Processed {
        let new = diff(&self.seen_tokens, &listings);
        let quiet_cold_start = self.cold_start && !self.config.notify_on_first_poll;
        let to_notify = if quiet_cold_start {
            Vec::new()
        } else {
            new.iter().filter(|listing| listing.suitable).cloned().collect()
        };

        if !listings.is_empty() {
            let tokens = listings.iter().map(|listing| listing.token.clone());
            match self.config.dedup_scope {
                DedupScope::Session => self.seen_tokens.extend(tokens),
                DedupScope::Batch => self.seen_tokens = tokens.collect(),
            }
            self.current_batch = listings;
            // An empty page does not count as the first look at the target.
            self.cold_start = false;
        }

        self.consecutive_failures = 0;
        self.last_new_count = new.len();
        self.last_error = None;
        self.mark_dirty();

        Processed {
            new_count: new.len(),
            to_notify,
        }
    }

    pub(crate) fn record_failure(&mut self, failure: &FetchFailure) {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.set_error(failure.to_string());
    }

    pub(crate) fn record_delivered(&mut self, delivered: usize) {
        if delivered > 0 {
            self.notified_total += delivered;
            self.mark_dirty();
        }
    }

    /// Moves the current cycle to `Waiting` and returns its timer effect.
    pub(crate) fn wait(&mut self, delay: Duration) -> Option<Effect> {
        let cycle = self.active_cycle?;
        self.phase = Phase::Waiting;
        self.next_delay = Some(delay);
        self.mark_dirty();
        Some(Effect::ScheduleNext { cycle, delay })
    }

    pub(crate) fn delay_after_success(&self, new_count: usize) -> Duration {
        if new_count > 0 {
            self.config.poll_interval_with_new_items
        } else {
            self.config.poll_interval_idle
        }
    }

    pub(crate) fn delay_after_failure(&self) -> Duration {
        let idle = self.config.poll_interval_idle;
        let Some(cap) = self.config.failure_backoff_cap else {
            return idle;
        };
        let doublings = self.consecutive_failures.saturating_sub(1);
        let factor = 1u32.checked_shl(doublings).unwrap_or(u32::MAX);
        idle.saturating_mul(factor).min(cap.max(idle))
    }
}
