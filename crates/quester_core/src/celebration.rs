use std::time::Duration;

use crate::MarkOutcome;

pub type CelebrationId = u64;

/// How long the celebration stays visible.
pub const CELEBRATION_DURATION: Duration = Duration::from_secs(5);

/// One-shot signal raised when a batch becomes fully done.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CelebrationTrigger {
    next_id: CelebrationId,
    active: Option<CelebrationId>,
}

impl CelebrationTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activates on the mark that completed the batch. Returns the id whose
    /// deactivation must be scheduled; `None` when nothing started.
    pub fn evaluate(&mut self, outcome: &MarkOutcome) -> Option<CelebrationId> {
        if !(outcome.is_batch_complete && outcome.just_completed) || self.active.is_some() {
            return None;
        }
        self.next_id += 1;
        self.active = Some(self.next_id);
        self.active
    }

    /// Returns true when `celebration` was the active one.
    pub fn deactivate(&mut self, celebration: CelebrationId) -> bool {
        if self.active == Some(celebration) {
            self.active = None;
            true
        } else {
            false
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }
}
