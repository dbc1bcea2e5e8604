use std::collections::BTreeSet;

use crate::{Batch, BatchId, QueryId};

/// Result of marking one query done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkOutcome {
    /// Number of distinct queries of the current batch marked done.
    pub size: usize,
    /// Every member of a non-empty batch is done.
    pub is_batch_complete: bool,
    /// This mark is the one that completed the batch.
    pub just_completed: bool,
}

/// Tracks which members of the current batch have been copied or opened.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompletionTracker {
    batch: Option<BatchId>,
    batch_len: usize,
    done: BTreeSet<QueryId>,
    complete: bool,
}

impl CompletionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self, batch: &Batch) {
        self.batch = Some(batch.id());
        self.batch_len = batch.len();
        self.done.clear();
        self.complete = false;
    }

    /// Marks `id` done. Ids outside the current batch are accepted and ignored.
    pub fn mark_done(&mut self, id: QueryId) -> MarkOutcome {
        if self.contains(id) {
            self.done.insert(id);
        }
        let is_batch_complete = self.batch_len > 0 && self.done.len() == self.batch_len;
        let just_completed = is_batch_complete && !self.complete;
        self.complete = is_batch_complete;
        MarkOutcome {
            size: self.done.len(),
            is_batch_complete,
            just_completed,
        }
    }

    pub fn is_done(&self, id: QueryId) -> bool {
        self.done.contains(&id)
    }

    pub fn done_count(&self) -> usize {
        self.done.len()
    }

    fn contains(&self, id: QueryId) -> bool {
        self.batch == Some(id.batch) && id.index < self.batch_len
    }
}
