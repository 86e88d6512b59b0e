use std::sync::mpsc;
use std::thread;

use engine_logging::{engine_debug, engine_info, engine_warn};
use watch_core::{Effect, FetchFailure, FetchFailureKind, Msg};
use watch_engine::{EngineEvent, EngineHandle, FailureKind, FetchError};

use super::app::LoopEvent;
use super::render;

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Fetch { cycle, url } => {
                    engine_logging::set_current_cycle(cycle);
                    engine_info!("fetch url={}", url);
                    self.engine.fetch(cycle, url);
                }
                Effect::ScheduleNext { cycle, delay } => {
                    engine_debug!("next cycle after {:?}", delay);
                    self.engine.schedule(cycle, delay);
                }
                Effect::CancelPending => self.engine.cancel_pending(),
                Effect::Notify { cycle, listings } => {
                    engine_info!("alerting {} new listings", listings.len());
                    self.engine.notify(cycle, listings);
                }
                Effect::PublishBatch { listings } => render::print_batch(&listings),
            }
        }
    }
}

/// Forwards engine events into the main loop as messages.
pub fn spawn_event_pump(event_rx: mpsc::Receiver<EngineEvent>, loop_tx: mpsc::Sender<LoopEvent>) {
    thread::spawn(move || {
        for event in event_rx {
            if loop_tx.send(LoopEvent::Msg(to_msg(event))).is_err() {
                break;
            }
        }
    });
}

fn to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::PageFetched { cycle, result } => Msg::FetchCompleted {
            cycle,
            result: result.map_err(|err| {
                engine_warn!("fetch failed: {}", err);
                map_failure(err)
            }),
        },
        EngineEvent::TimerElapsed { cycle } => Msg::TimerElapsed { cycle },
        EngineEvent::NotificationsDispatched { cycle, report } => {
            engine_debug!(
                "alerts delivered={} suppressed={} unsuitable={} duplicates={}",
                report.delivered,
                report.suppressed,
                report.unsuitable,
                report.duplicates
            );
            Msg::NotificationsDelivered {
                cycle,
                delivered: report.delivered,
            }
        }
    }
}

fn map_failure(err: FetchError) -> FetchFailure {
    let kind = match err.kind {
        FailureKind::NonOkStatus(status) => FetchFailureKind::NonOkStatus { status },
        FailureKind::InvalidUrl
        | FailureKind::Timeout
        | FailureKind::TooLarge { .. }
        | FailureKind::Transport => FetchFailureKind::TransportFailure,
    };
    FetchFailure {
        kind,
        message: err.message,
    }
}
