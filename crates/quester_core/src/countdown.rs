use crate::{QueryItem, TimerSeconds};

pub type TimerId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveCountdown {
    pub timer: TimerId,
    pub query: QueryItem,
    pub remaining: u32,
}

/// Ids handed out by [`CountdownTimer::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownStart {
    pub timer: TimerId,
    /// The running countdown that was discarded, if any. Its handles must be released.
    pub cancelled: Option<TimerId>,
}

/// Single-slot countdown: Idle, or Running for exactly one query.
///
/// Ticks only refresh `remaining` for display; the expiry message is the
/// authority on elapsed time. Messages carrying a superseded id are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CountdownTimer {
    next_id: TimerId,
    active: Option<ActiveCountdown>,
}

impl CountdownTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, query: QueryItem, duration: TimerSeconds) -> CountdownStart {
        let cancelled = self.active.take().map(|active| active.timer);
        self.next_id += 1;
        let timer = self.next_id;
        self.active = Some(ActiveCountdown {
            timer,
            query,
            remaining: duration.get(),
        });
        CountdownStart { timer, cancelled }
    }

    /// Returns true when the displayed value changed.
    pub fn tick(&mut self, timer: TimerId) -> bool {
        match self.active.as_mut() {
            Some(active) if active.timer == timer && active.remaining > 1 => {
                active.remaining -= 1;
                true
            }
            _ => false,
        }
    }

    /// Ends the countdown if `timer` is the running one, returning its query.
    pub fn expire(&mut self, timer: TimerId) -> Option<QueryItem> {
        if self.active.as_ref().map(|active| active.timer) != Some(timer) {
            return None;
        }
        self.active.take().map(|active| active.query)
    }

    /// Silently drops the running countdown, if any.
    pub fn cancel_all(&mut self) -> Option<TimerId> {
        self.active.take().map(|active| active.timer)
    }

    pub fn active(&self) -> Option<&ActiveCountdown> {
        self.active.as_ref()
    }
}
