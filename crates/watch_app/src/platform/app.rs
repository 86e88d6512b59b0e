use std::sync::{mpsc, Arc};

use anyhow::Context;
use log::info;
use watch_core::{update, AppState, Msg};
use watch_engine::{EngineHandle, ListingExtractor, Notifier, ReqwestFetcher};

use super::config;
use super::effects::{spawn_event_pump, EffectRunner};
use super::input::spawn_stdin_reader;
use super::logging;
use super::notify::TerminalPlatform;
use super::render;

/// Everything the main loop reacts to.
pub enum LoopEvent {
    Msg(Msg),
    Help,
    Quit,
}

pub fn run_app() -> anyhow::Result<()> {
    let (config_path, explicit) = config::config_path_from_args(std::env::args());
    let config = config::load(&config_path, explicit)?;
    logging::initialize(config.logging.destination, config.logging.level_filter()?);
    info!("listing watch starting, config {:?}", config_path);
    let poll_config = config.poll_config()?;

    let extractor = ListingExtractor::new(&config.card_selectors(), config.suitability_rule())
        .context("invalid card selectors")?;
    let fetcher = ReqwestFetcher::new(config.fetch_settings()).context("http client")?;
    let platform = TerminalPlatform::new(
        config.initial_permission(),
        config.notifications.grant_when_asked,
        config.notifications.bell,
    );

    let (event_tx, event_rx) = mpsc::channel();
    let engine = EngineHandle::spawn(
        Arc::new(fetcher),
        extractor,
        Notifier::new(Arc::new(platform)),
        event_tx,
    )
    .context("failed to start engine")?;
    let runner = EffectRunner::new(engine);

    let (loop_tx, loop_rx) = mpsc::channel();
    spawn_event_pump(event_rx, loop_tx.clone());
    spawn_stdin_reader(loop_tx.clone(), config.target_url.clone());

    render::print_help();
    if !config.target_url.trim().is_empty() {
        let _ = loop_tx.send(LoopEvent::Msg(Msg::StartRequested(config.target_url.clone())));
    }
    drop(loop_tx);

    let mut state = AppState::with_config(poll_config);
    for event in loop_rx {
        match event {
            LoopEvent::Msg(msg) => state = dispatch(state, msg, &runner),
            LoopEvent::Help => render::print_help(),
            LoopEvent::Quit => {
                dispatch(state, Msg::StopRequested, &runner);
                break;
            }
        }
    }

    info!("listing watch exiting");
    Ok(())
}

fn dispatch(state: AppState, msg: Msg, runner: &EffectRunner) -> AppState {
    let (mut state, effects) = update(state, msg);
    runner.run(effects);
    if state.consume_dirty() {
        render::print_status(&state.view());
    }
    state
}
