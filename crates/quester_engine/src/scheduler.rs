use std::sync::Arc;
use std::time::Duration;

use engine_logging::{engine_debug, engine_trace};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use crate::{CelebrationId, EngineEvent, TimerId};

const TICK_PERIOD: Duration = Duration::from_secs(1);

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// The two live handles of the running countdown.
struct ActiveCountdown {
    timer: TimerId,
    token: CancellationToken,
    tick: JoinHandle<()>,
    expiry: JoinHandle<()>,
}

impl ActiveCountdown {
    fn release(self) {
        self.token.cancel();
        self.tick.abort();
        self.expiry.abort();
    }
}

/// Owns every timer handle. At most one countdown is live at a time.
///
/// Must be used from within a tokio runtime.
pub struct Scheduler {
    sink: Arc<dyn EventSink>,
    countdown: Option<ActiveCountdown>,
    celebrations: Vec<JoinHandle<()>>,
}

impl Scheduler {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self {
            sink,
            countdown: None,
            celebrations: Vec::new(),
        }
    }

    /// Starts `timer`, releasing any countdown still live first.
    ///
    /// Emits `CountdownTick` once per second for display and a single
    /// `CountdownExpired` after `seconds`.
    pub fn start_countdown(&mut self, timer: TimerId, seconds: u32) {
        if let Some(previous) = self.countdown.take() {
            engine_debug!("Countdown {} replaced by {}", previous.timer, timer);
            previous.release();
        }

        let token = CancellationToken::new();
        let started = Instant::now();
        let tick = tokio::spawn(tick_loop(
            timer,
            seconds,
            started,
            token.clone(),
            self.sink.clone(),
        ));

        let expiry_token = token.clone();
        let sink = self.sink.clone();
        let expiry = tokio::spawn(async move {
            tokio::select! {
                _ = expiry_token.cancelled() => {}
                _ = time::sleep_until(started + Duration::from_secs(u64::from(seconds))) => {
                    expiry_token.cancel();
                    sink.emit(EngineEvent::CountdownExpired { timer });
                }
            }
        });

        self.countdown = Some(ActiveCountdown {
            timer,
            token,
            tick,
            expiry,
        });
    }

    /// Releases `timer` without emitting its expiry. Unknown ids are ignored.
    pub fn cancel_countdown(&mut self, timer: TimerId) {
        if self.countdown.as_ref().map(|active| active.timer) == Some(timer) {
            if let Some(active) = self.countdown.take() {
                engine_debug!("Countdown {} cancelled", timer);
                active.release();
            }
        }
    }

    pub fn schedule_celebration_end(&mut self, celebration: CelebrationId, after: Duration) {
        self.celebrations.retain(|handle| !handle.is_finished());
        let sink = self.sink.clone();
        self.celebrations.push(tokio::spawn(async move {
            time::sleep(after).await;
            sink.emit(EngineEvent::CelebrationElapsed { celebration });
        }));
    }

    /// Releases every live handle. Nothing is emitted afterwards.
    pub fn cancel_all(&mut self) {
        if let Some(active) = self.countdown.take() {
            active.release();
        }
        for handle in self.celebrations.drain(..) {
            handle.abort();
        }
    }

    pub fn has_live_countdown(&self) -> bool {
        self.countdown
            .as_ref()
            .is_some_and(|active| !active.token.is_cancelled())
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

async fn tick_loop(
    timer: TimerId,
    seconds: u32,
    started: Instant,
    token: CancellationToken,
    sink: Arc<dyn EventSink>,
) {
    // The last second is covered by the expiry, which is the authority on elapsed time.
    for elapsed in 1..seconds {
        tokio::select! {
            _ = token.cancelled() => return,
            _ = time::sleep_until(started + TICK_PERIOD * elapsed) => {
                engine_trace!("Countdown {} tick {}", timer, elapsed);
                sink.emit(EngineEvent::CountdownTick { timer });
            }
        }
    }
}
