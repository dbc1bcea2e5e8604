use std::io::Write;
use std::time::Instant;

use anyhow::Context;
use engine_logging::{engine_debug, engine_info, engine_warn};
use quester_core::{BatchOrigin, Effect, Msg, Volume};
use quester_engine::{EngineEvent, EngineHandle};

use super::ui::toast::ToastBoard;

/// Browser, clipboard and speaker access.
pub trait Desktop {
    fn copy_to_clipboard(&mut self, text: &str) -> anyhow::Result<()>;
    fn open_url(&mut self, url: &str) -> anyhow::Result<()>;
    /// Plays the notification cue. Implementations without level control
    /// treat any non-zero volume as full volume and zero as silence.
    fn play_cue(&mut self, volume: Volume);
}

/// The real desktop. The terminal bell stands in for the audio cue.
#[derive(Default)]
pub struct SystemDesktop {
    clipboard: Option<arboard::Clipboard>,
}

impl Desktop for SystemDesktop {
    fn copy_to_clipboard(&mut self, text: &str) -> anyhow::Result<()> {
        if self.clipboard.is_none() {
            self.clipboard = Some(arboard::Clipboard::new().context("clipboard unavailable")?);
        }
        if let Some(clipboard) = self.clipboard.as_mut() {
            clipboard
                .set_text(text.to_string())
                .context("clipboard write denied")?;
        }
        Ok(())
    }

    fn open_url(&mut self, url: &str) -> anyhow::Result<()> {
        open::that(url).with_context(|| format!("opening {url}"))
    }

    fn play_cue(&mut self, volume: Volume) {
        let cue = bell_cue(volume);
        if cue.is_empty() {
            return;
        }
        let mut stdout = std::io::stdout();
        let _ = stdout.write_all(cue);
        let _ = stdout.flush();
    }
}

fn bell_cue(volume: Volume) -> &'static [u8] {
    if volume.percent() == 0 {
        b""
    } else {
        b"\x07"
    }
}

pub struct EffectRunner<D: Desktop> {
    engine: EngineHandle,
    desktop: D,
}

impl<D: Desktop> EffectRunner<D> {
    pub fn new(engine: EngineHandle, desktop: D) -> Self {
        Self { engine, desktop }
    }

    pub fn run(&mut self, effects: Vec<Effect>, toasts: &mut ToastBoard) {
        for effect in effects {
            engine_debug!("Effect {:?}", effect);
            match effect {
                Effect::RequestBatch { request, size } => {
                    self.engine.request_batch(request, size.get());
                }
                Effect::CopyToClipboard { text } => {
                    if let Err(err) = self.desktop.copy_to_clipboard(&text) {
                        engine_warn!("Copy failed: {:#}", err);
                    }
                }
                Effect::OpenUrl { url } => {
                    engine_info!("Opening {}", url);
                    if let Err(err) = self.desktop.open_url(&url) {
                        engine_warn!("Open failed: {:#}", err);
                    }
                }
                Effect::PlayCue { volume } => self.desktop.play_cue(volume),
                Effect::ShowToast { message, duration } => {
                    toasts.show(message, duration, Instant::now());
                }
                Effect::StartCountdown { timer, seconds } => {
                    self.engine.start_countdown(timer, seconds.get());
                }
                Effect::CancelCountdown { timer } => self.engine.cancel_countdown(timer),
                Effect::ScheduleCelebrationEnd { celebration, after } => {
                    self.engine.schedule_celebration_end(celebration, after);
                }
            }
        }
    }

    pub fn shutdown(self) {
        self.engine.shutdown();
    }
}

/// Translates engine reports into core messages.
pub fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::BatchReady { request, outcome } => Msg::BatchLoaded {
            request,
            queries: outcome.queries,
            origin: map_origin(outcome.origin),
        },
        EngineEvent::CountdownTick { timer } => Msg::CountdownTick(timer),
        EngineEvent::CountdownExpired { timer } => Msg::CountdownExpired(timer),
        EngineEvent::CelebrationElapsed { celebration } => Msg::CelebrationElapsed(celebration),
    }
}

fn map_origin(origin: quester_engine::BatchOrigin) -> BatchOrigin {
    match origin {
        quester_engine::BatchOrigin::Remote => BatchOrigin::Remote,
        quester_engine::BatchOrigin::Fallback(failure) => BatchOrigin::Fallback {
            reason: failure.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{mpsc, Arc};
    use std::time::Duration;

    use quester_core::QueryCount;
    use quester_engine::{
        BatchOutcome, ChannelEventSink, FetchFailure, FetchSettings, QuerySource,
        ReqwestTrendsFetcher,
    };

    #[derive(Default)]
    struct FakeDesktop {
        copied: Vec<String>,
        opened: Vec<String>,
        cues: Vec<Volume>,
        deny_clipboard: bool,
    }

    impl Desktop for FakeDesktop {
        fn copy_to_clipboard(&mut self, text: &str) -> anyhow::Result<()> {
            if self.deny_clipboard {
                anyhow::bail!("denied");
            }
            self.copied.push(text.to_string());
            Ok(())
        }

        fn open_url(&mut self, url: &str) -> anyhow::Result<()> {
            self.opened.push(url.to_string());
            Ok(())
        }

        fn play_cue(&mut self, volume: Volume) {
            self.cues.push(volume);
        }
    }

    fn runner(desktop: FakeDesktop) -> (EffectRunner<FakeDesktop>, mpsc::Receiver<EngineEvent>) {
        let settings = FetchSettings {
            base_url: "http://127.0.0.1:1".to_string(),
            ..FetchSettings::default()
        };
        let source = QuerySource::new(Arc::new(ReqwestTrendsFetcher::new(settings)));
        let (tx, rx) = mpsc::channel();
        let engine = EngineHandle::new(source, Arc::new(ChannelEventSink::new(tx))).unwrap();
        (EffectRunner::new(engine, desktop), rx)
    }

    #[test]
    fn desktop_effects_reach_the_desktop() {
        let (mut runner, _rx) = runner(FakeDesktop::default());
        let mut toasts = ToastBoard::default();
        runner.run(
            vec![
                Effect::CopyToClipboard {
                    text: "q".to_string(),
                },
                Effect::OpenUrl {
                    url: "https://example.com".to_string(),
                },
                Effect::PlayCue {
                    volume: Volume::FULL,
                },
                Effect::ShowToast {
                    message: "hi".to_string(),
                    duration: Duration::from_secs(3),
                },
            ],
            &mut toasts,
        );

        assert_eq!(runner.desktop.copied, vec!["q"]);
        assert_eq!(runner.desktop.opened, vec!["https://example.com"]);
        assert_eq!(runner.desktop.cues, vec![Volume::FULL]);
        assert_eq!(toasts.active(Instant::now()), Some("hi"));
        runner.shutdown();
    }

    #[test]
    fn bell_rings_at_any_audible_volume() {
        assert_eq!(bell_cue(Volume::FULL), b"\x07");
        assert_eq!(bell_cue(Volume::clamped(0.01)), b"\x07");
        assert!(bell_cue(Volume::clamped(0.0)).is_empty());
    }

    #[test]
    fn denied_clipboard_is_swallowed() {
        let desktop = FakeDesktop {
            deny_clipboard: true,
            ..FakeDesktop::default()
        };
        let (mut runner, _rx) = runner(desktop);
        let mut toasts = ToastBoard::default();
        runner.run(
            vec![
                Effect::CopyToClipboard {
                    text: "q".to_string(),
                },
                Effect::PlayCue {
                    volume: Volume::FULL,
                },
            ],
            &mut toasts,
        );
        assert!(runner.desktop.copied.is_empty());
        assert_eq!(runner.desktop.cues.len(), 1);
        runner.shutdown();
    }

    #[test]
    fn batch_request_round_trips_through_engine() {
        let (mut runner, rx) = runner(FakeDesktop::default());
        let mut toasts = ToastBoard::default();
        runner.run(
            vec![Effect::RequestBatch {
                request: 3,
                size: QueryCount::clamped(2),
            }],
            &mut toasts,
        );

        let event = rx.recv_timeout(Duration::from_secs(5)).expect("batch");
        match map_event(event) {
            Msg::BatchLoaded {
                request,
                queries,
                origin,
            } => {
                assert_eq!(request, 3);
                assert_eq!(queries.len(), 2);
                assert!(matches!(origin, BatchOrigin::Fallback { .. }));
            }
            other => panic!("unexpected msg {other:?}"),
        }
        runner.shutdown();
    }

    #[test]
    fn fallback_reason_is_carried_as_text() {
        let msg = map_event(EngineEvent::BatchReady {
            request: 1,
            outcome: BatchOutcome {
                queries: vec!["a".to_string()],
                origin: quester_engine::BatchOrigin::Fallback(FetchFailure::HttpStatus(500)),
            },
        });
        assert_eq!(
            msg,
            Msg::BatchLoaded {
                request: 1,
                queries: vec!["a".to_string()],
                origin: BatchOrigin::Fallback {
                    reason: "http status 500".to_string()
                },
            }
        );
    }
}
