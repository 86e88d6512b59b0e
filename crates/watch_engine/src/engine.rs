use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use engine_logging::{engine_debug, engine_warn};
use tokio_util::sync::CancellationToken;
use watch_core::{CycleId, Listing};

use crate::{EngineEvent, FetchError, Fetcher, ListingExtractor, Notifier};

#[derive(Debug)]
pub enum EngineCommand {
    Fetch { cycle: CycleId, url: String },
    Schedule { cycle: CycleId, delay: Duration },
    CancelPending,
    Notify { cycle: CycleId, listings: Vec<Listing> },
}

/// Runs fetches, timers and alerts on a background tokio runtime.
///
/// Results come back on the event channel passed to [`EngineHandle::spawn`].
/// Fetches and timers share one cancellation token; `cancel_pending` trips it
/// so that nothing from the superseded work is reported.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

struct Workers {
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<ListingExtractor>,
    notifier: Arc<Notifier>,
    event_tx: mpsc::Sender<EngineEvent>,
}

impl EngineHandle {
    pub fn spawn(
        fetcher: Arc<dyn Fetcher>,
        extractor: ListingExtractor,
        notifier: Notifier,
        event_tx: mpsc::Sender<EngineEvent>,
    ) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let workers = Workers {
            fetcher,
            extractor: Arc::new(extractor),
            notifier: Arc::new(notifier),
            event_tx,
        };

        thread::spawn(move || {
            let mut pending = CancellationToken::new();
            while let Ok(command) = cmd_rx.recv() {
                if let EngineCommand::CancelPending = command {
                    pending.cancel();
                    pending = CancellationToken::new();
                    continue;
                }
                runtime.spawn(workers.run(command, pending.clone()));
            }
            engine_debug!("engine command channel closed");
        });

        Ok(Self { cmd_tx })
    }

    pub fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            engine_warn!("engine thread is gone; command dropped");
        }
    }

    pub fn fetch(&self, cycle: CycleId, url: impl Into<String>) {
        self.send(EngineCommand::Fetch {
            cycle,
            url: url.into(),
        });
    }

    pub fn schedule(&self, cycle: CycleId, delay: Duration) {
        self.send(EngineCommand::Schedule { cycle, delay });
    }

    pub fn cancel_pending(&self) {
        self.send(EngineCommand::CancelPending);
    }

    pub fn notify(&self, cycle: CycleId, listings: Vec<Listing>) {
        self.send(EngineCommand::Notify { cycle, listings });
    }
}

impl Workers {
    fn run(
        &self,
        command: EngineCommand,
        cancel: CancellationToken,
    ) -> impl std::future::Future<Output = ()> + Send + 'static {
        let fetcher = self.fetcher.clone();
        let extractor = self.extractor.clone();
        let notifier = self.notifier.clone();
        let event_tx = self.event_tx.clone();

        async move {
            let event = match command {
                EngineCommand::Fetch { cycle, url } => {
                    tokio::select! {
                        _ = cancel.cancelled() => {
                            engine_debug!("fetch for cycle {} cancelled", cycle);
                            return;
                        }
                        result = fetch_page(fetcher.as_ref(), &extractor, &url) => {
                            EngineEvent::PageFetched { cycle, result }
                        }
                    }
                }
                EngineCommand::Schedule { cycle, delay } => {
                    tokio::select! {
                        _ = cancel.cancelled() => return,
                        _ = tokio::time::sleep(delay) => EngineEvent::TimerElapsed { cycle },
                    }
                }
                EngineCommand::Notify { cycle, listings } => {
                    let report = notifier.notify_cycle(&listings).await;
                    EngineEvent::NotificationsDispatched { cycle, report }
                }
                EngineCommand::CancelPending => return,
            };
            let _ = event_tx.send(event);
        }
    }
}

async fn fetch_page(
    fetcher: &dyn Fetcher,
    extractor: &ListingExtractor,
    url: &str,
) -> Result<Vec<Listing>, FetchError> {
    let markup = fetcher.fetch(url).await?;
    let listings = extractor.extract(&markup);
    engine_debug!("extracted {} listings from {}", listings.len(), url);
    Ok(listings)
}
