use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use engine_logging::{engine_debug, engine_info};
use quester_core::{update, AppState, AppViewModel, Effect, Msg, QueryItem};
use quester_engine::{EngineEvent, EngineHandle, EventSink, QuerySource, ReqwestTrendsFetcher};

use super::config::{self, Cli, LOG_FILENAME};
use super::effects::{map_event, Desktop, EffectRunner, SystemDesktop};
use super::ui::commands::{self, Command, ParseError};
use super::ui::render;
use super::ui::toast::ToastBoard;

/// How often the loop wakes without input, to dismiss expired toasts.
const IDLE_POLL: Duration = Duration::from_millis(200);

enum AppEvent {
    Line(String),
    Engine(EngineEvent),
    InputClosed,
}

struct AppEventSink {
    tx: mpsc::Sender<AppEvent>,
}

impl EventSink for AppEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(AppEvent::Engine(event));
    }
}

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    engine_logging::initialize(cli.log_destination(), cli.log_level(), Path::new(LOG_FILENAME))
        .context("initializing logger")?;
    let settings = config::load(&cli)?;
    engine_info!("Starting with backend {}", settings.fetch.base_url);

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let source = QuerySource::new(Arc::new(ReqwestTrendsFetcher::new(settings.fetch.clone())));
    let engine = EngineHandle::new(
        source,
        Arc::new(AppEventSink {
            tx: event_tx.clone(),
        }),
    )
    .context("starting engine")?;

    spawn_stdin_reader(event_tx);

    let state = AppState::with_settings(
        settings.count,
        settings.timer,
        settings.volume,
        settings.muted,
    );
    let mut app = App::new(state, EffectRunner::new(engine, SystemDesktop::default()));
    app.draw();
    app.run(&event_rx);
    app.shutdown();
    println!();
    Ok(())
}

fn spawn_stdin_reader(tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(AppEvent::Line(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(AppEvent::InputClosed);
    });
}

struct App<D: Desktop> {
    state: AppState,
    view: AppViewModel,
    effects: EffectRunner<D>,
    toasts: ToastBoard,
    notice: Option<String>,
}

impl<D: Desktop> App<D> {
    fn new(state: AppState, effects: EffectRunner<D>) -> Self {
        let view = state.view();
        Self {
            state,
            view,
            effects,
            toasts: ToastBoard::default(),
            notice: None,
        }
    }

    fn run(&mut self, event_rx: &mpsc::Receiver<AppEvent>) {
        loop {
            let redraw = match event_rx.recv_timeout(IDLE_POLL) {
                Ok(AppEvent::Line(line)) => {
                    if !self.handle_line(&line) {
                        return;
                    }
                    true
                }
                Ok(AppEvent::Engine(event)) => self.dispatch_msg(map_event(event)),
                Ok(AppEvent::InputClosed) | Err(mpsc::RecvTimeoutError::Disconnected) => return,
                Err(mpsc::RecvTimeoutError::Timeout) => false,
            };
            let dismissed = self.toasts.prune(Instant::now());
            if redraw || dismissed {
                self.draw();
            }
        }
    }

    /// Returns false when the user asked to quit.
    fn handle_line(&mut self, line: &str) -> bool {
        self.notice = None;
        let command = match commands::parse(line) {
            Ok(command) => command,
            Err(ParseError::Empty) => return true,
            Err(err) => {
                self.notice = Some(describe_parse_error(&err));
                return true;
            }
        };
        engine_debug!("Command {:?}", command);

        let msg = match command {
            Command::Fetch if self.view.busy => {
                self.notice = Some("Still fetching; wait for the current batch.".to_string());
                return true;
            }
            Command::Fetch => Msg::FetchClicked,
            Command::Copy(ordinal) => match self.card(ordinal) {
                Some(item) => Msg::CopyClicked(item),
                None => return true,
            },
            Command::Open(ordinal) => match self.card(ordinal) {
                Some(item) => Msg::OpenClicked(item),
                None => return true,
            },
            Command::Count(count) => Msg::CountChanged(count),
            Command::Timer(seconds) => Msg::TimerChanged(seconds),
            Command::Volume(volume) => Msg::VolumeChanged(volume),
            Command::Mute => Msg::MuteToggled,
            Command::ClearHistory => Msg::ClearHistoryClicked,
            Command::Help => {
                self.notice = Some(commands::HELP.to_string());
                return true;
            }
            Command::Quit => return false,
        };
        self.dispatch_msg(msg);
        true
    }

    fn card(&mut self, ordinal: usize) -> Option<QueryItem> {
        let item = self
            .view
            .cards
            .get(ordinal.saturating_sub(1))
            .map(|card| card.item.clone());
        if item.is_none() {
            self.notice = Some(format!("No card {ordinal}."));
        }
        item
    }

    /// Applies `msg`, runs its effects and returns whether a redraw is due.
    fn dispatch_msg(&mut self, msg: Msg) -> bool {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;
        let toasted = effects
            .iter()
            .any(|effect| matches!(effect, Effect::ShowToast { .. }));
        self.effects.run(effects, &mut self.toasts);
        if was_dirty {
            self.view = self.state.view();
        }
        was_dirty || toasted
    }

    fn draw(&self) {
        let screen = render::render(
            &self.view,
            self.toasts.active(Instant::now()),
            self.notice.as_deref(),
        );
        let mut stdout = io::stdout();
        let _ = stdout.write_all(screen.as_bytes());
        let _ = stdout.flush();
    }

    fn shutdown(mut self) {
        // Release timer handles in the core first, then in the engine.
        self.dispatch_msg(Msg::Teardown);
        self.effects.shutdown();
        engine_info!("Shut down");
    }
}

fn describe_parse_error(err: &ParseError) -> String {
    match err {
        ParseError::Empty => String::new(),
        ParseError::Unknown(word) => format!("Unknown command `{word}`. {}", commands::HELP),
        ParseError::MissingArgument(what) => format!("Missing {what}."),
        ParseError::InvalidArgument(raw) => format!("Invalid value `{raw}`."),
    }
}
