use std::collections::VecDeque;

/// Number of entries the history keeps before evicting the oldest.
pub const HISTORY_CAPACITY: usize = 50;

/// Rolling log of every query surfaced this session, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HistoryLog {
    entries: VecDeque<String>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a whole batch, then evicts from the front down to capacity.
    pub fn append<I, S>(&mut self, items: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries.extend(items.into_iter().map(Into::into));
        let overflow = self.entries.len().saturating_sub(HISTORY_CAPACITY);
        self.entries.drain(..overflow);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The most recent `limit` entries in chronological order.
    pub fn snapshot(&self, limit: usize) -> Vec<String> {
        let skip = self.entries.len().saturating_sub(limit);
        self.entries.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
