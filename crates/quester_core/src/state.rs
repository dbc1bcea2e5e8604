use std::collections::BTreeSet;

use crate::view_model::{AppViewModel, CountdownView, QueryCardView, HISTORY_DISPLAY_LIMIT};
use crate::{
    Batch, BatchId, BatchOrigin, CelebrationId, CelebrationTrigger, CompletionTracker,
    CountdownStart, CountdownTimer, HistoryLog, MarkOutcome, QueryCount, QueryItem, RequestId,
    TimerId, TimerSeconds, Volume,
};

/// Everything the controller owns. Passed by value through [`crate::update`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    count: QueryCount,
    timer_seconds: TimerSeconds,
    volume: Volume,
    muted: bool,
    batch: Option<Batch>,
    last_batch_id: BatchId,
    last_request_id: RequestId,
    outstanding_requests: BTreeSet<RequestId>,
    history: HistoryLog,
    completion: CompletionTracker,
    countdown: CountdownTimer,
    celebration: CelebrationTrigger,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(
        count: QueryCount,
        timer_seconds: TimerSeconds,
        volume: Volume,
        muted: bool,
    ) -> Self {
        Self {
            count,
            timer_seconds,
            volume,
            muted,
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        let cards = self
            .batch
            .iter()
            .flat_map(Batch::items)
            .map(|item| QueryCardView {
                ordinal: item.id.index + 1,
                done: self.completion.is_done(item.id),
                item: item.clone(),
            })
            .collect();

        AppViewModel {
            count: self.count,
            timer_seconds: self.timer_seconds,
            volume: self.volume,
            muted: self.muted,
            busy: self.is_busy(),
            origin: self.batch.as_ref().map(|batch| batch.origin().clone()),
            cards,
            done_count: self.completion.done_count(),
            history: self.history.snapshot(HISTORY_DISPLAY_LIMIT),
            history_len: self.history.len(),
            countdown: self.countdown.active().map(|active| CountdownView {
                query: active.query.text.clone(),
                remaining: active.remaining,
            }),
            celebrating: self.celebration.is_active(),
        }
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn is_busy(&self) -> bool {
        !self.outstanding_requests.is_empty()
    }

    pub fn timer_seconds(&self) -> TimerSeconds {
        self.timer_seconds
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_count(&mut self, count: QueryCount) {
        if self.count != count {
            self.count = count;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_timer_seconds(&mut self, seconds: TimerSeconds) {
        if self.timer_seconds != seconds {
            self.timer_seconds = seconds;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_volume(&mut self, volume: Volume) {
        if self.volume != volume {
            self.volume = volume;
            self.mark_dirty();
        }
    }

    pub(crate) fn toggle_mute(&mut self) {
        self.muted = !self.muted;
        self.mark_dirty();
    }

    /// The cue volume, or `None` while muted.
    pub(crate) fn cue_volume(&self) -> Option<Volume> {
        (!self.muted).then_some(self.volume)
    }

    pub(crate) fn begin_request(&mut self) -> (RequestId, QueryCount) {
        self.last_request_id += 1;
        self.outstanding_requests.insert(self.last_request_id);
        self.mark_dirty();
        (self.last_request_id, self.count)
    }

    /// Replaces the batch. Overlapping requests resolve last-write-wins in arrival order.
    /// A request that is not outstanding changes nothing.
    pub(crate) fn finish_request(
        &mut self,
        request: RequestId,
        queries: Vec<String>,
        origin: BatchOrigin,
    ) {
        if !self.outstanding_requests.remove(&request) {
            return;
        }
        self.last_batch_id += 1;
        let batch = Batch::new(self.last_batch_id, queries, origin);
        self.completion.reset(&batch);
        self.history.append(batch.texts());
        self.batch = Some(batch);
        self.mark_dirty();
    }

    pub(crate) fn mark_done(&mut self, item: &QueryItem) -> MarkOutcome {
        let before = self.completion.done_count();
        let outcome = self.completion.mark_done(item.id);
        if outcome.size != before {
            self.mark_dirty();
        }
        outcome
    }

    pub(crate) fn celebrate(&mut self, outcome: &MarkOutcome) -> Option<CelebrationId> {
        let started = self.celebration.evaluate(outcome);
        if started.is_some() {
            self.mark_dirty();
        }
        started
    }

    pub(crate) fn end_celebration(&mut self, celebration: CelebrationId) {
        if self.celebration.deactivate(celebration) {
            self.mark_dirty();
        }
    }

    pub(crate) fn start_countdown(&mut self, item: QueryItem) -> CountdownStart {
        self.mark_dirty();
        self.countdown.start(item, self.timer_seconds)
    }

    pub(crate) fn tick_countdown(&mut self, timer: TimerId) {
        if self.countdown.tick(timer) {
            self.mark_dirty();
        }
    }

    pub(crate) fn expire_countdown(&mut self, timer: TimerId) -> Option<QueryItem> {
        let expired = self.countdown.expire(timer);
        if expired.is_some() {
            self.mark_dirty();
        }
        expired
    }

    pub(crate) fn cancel_countdowns(&mut self) -> Option<TimerId> {
        let cancelled = self.countdown.cancel_all();
        if cancelled.is_some() {
            self.mark_dirty();
        }
        cancelled
    }

    pub(crate) fn clear_history(&mut self) {
        if !self.history.is_empty() {
            self.history.clear();
            self.mark_dirty();
        }
    }
}
