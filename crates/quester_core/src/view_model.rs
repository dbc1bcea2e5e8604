use crate::{BatchOrigin, QueryCount, QueryItem, TimerSeconds, Volume};

/// How many history entries the history panel shows.
pub const HISTORY_DISPLAY_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub count: QueryCount,
    pub timer_seconds: TimerSeconds,
    pub volume: Volume,
    pub muted: bool,
    pub busy: bool,
    pub origin: Option<BatchOrigin>,
    pub cards: Vec<QueryCardView>,
    pub done_count: usize,
    pub history: Vec<String>,
    pub history_len: usize,
    pub countdown: Option<CountdownView>,
    pub celebrating: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryCardView {
    pub item: QueryItem,
    /// 1-based position in the batch.
    pub ordinal: usize,
    pub done: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownView {
    pub query: String,
    pub remaining: u32,
}
