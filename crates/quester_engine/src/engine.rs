use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use engine_logging::{engine_debug, engine_info};

use crate::scheduler::{EventSink, Scheduler};
use crate::source::QuerySource;
use crate::{CelebrationId, EngineEvent, RequestId, TimerId};

enum EngineCommand {
    RequestBatch { request: RequestId, size: usize },
    StartCountdown { timer: TimerId, seconds: u32 },
    CancelCountdown { timer: TimerId },
    ScheduleCelebrationEnd { celebration: CelebrationId, after: Duration },
    Shutdown,
}

/// Runs the query source and all timers on a dedicated tokio runtime thread.
///
/// Commands are handled in the order they are sent; results come back through
/// the `EventSink` passed to [`EngineHandle::new`].
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    worker: Option<thread::JoinHandle<()>>,
}

impl EngineHandle {
    pub fn new(source: QuerySource, sink: Arc<dyn EventSink>) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();

        let worker = thread::Builder::new()
            .name("quester-engine".to_string())
            .spawn(move || {
                let guard = runtime.enter();
                let mut scheduler = Scheduler::new(sink.clone());
                while let Ok(command) = cmd_rx.recv() {
                    if !handle_command(&runtime, &source, &sink, &mut scheduler, command) {
                        break;
                    }
                }
                scheduler.cancel_all();
                drop(scheduler);
                drop(guard);
                // In-flight requests are abandoned rather than awaited.
                runtime.shutdown_background();
                engine_info!("Engine stopped");
            })?;

        Ok(Self {
            cmd_tx,
            worker: Some(worker),
        })
    }

    pub fn request_batch(&self, request: RequestId, size: usize) {
        self.send(EngineCommand::RequestBatch { request, size });
    }

    pub fn start_countdown(&self, timer: TimerId, seconds: u32) {
        self.send(EngineCommand::StartCountdown { timer, seconds });
    }

    pub fn cancel_countdown(&self, timer: TimerId) {
        self.send(EngineCommand::CancelCountdown { timer });
    }

    pub fn schedule_celebration_end(&self, celebration: CelebrationId, after: Duration) {
        self.send(EngineCommand::ScheduleCelebrationEnd { celebration, after });
    }

    /// Releases every timer handle and stops the runtime thread.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.send(EngineCommand::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }

    fn send(&self, command: EngineCommand) {
        let _ = self.cmd_tx.send(command);
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Returns false once the engine should stop.
fn handle_command(
    runtime: &tokio::runtime::Runtime,
    source: &QuerySource,
    sink: &Arc<dyn EventSink>,
    scheduler: &mut Scheduler,
    command: EngineCommand,
) -> bool {
    match command {
        EngineCommand::RequestBatch { request, size } => {
            engine_debug!("Request {} for {} queries", request, size);
            let source = source.clone();
            let sink = sink.clone();
            runtime.spawn(async move {
                let outcome = source.request_batch(size).await;
                sink.emit(EngineEvent::BatchReady { request, outcome });
            });
        }
        EngineCommand::StartCountdown { timer, seconds } => {
            scheduler.start_countdown(timer, seconds);
        }
        EngineCommand::CancelCountdown { timer } => {
            scheduler.cancel_countdown(timer);
        }
        EngineCommand::ScheduleCelebrationEnd { celebration, after } => {
            scheduler.schedule_celebration_end(celebration, after);
        }
        EngineCommand::Shutdown => return false,
    }
    true
}
