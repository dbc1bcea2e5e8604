//! Quester engine: query source IO and timer scheduling.
mod engine;
mod fetch;
mod payload;
mod scheduler;
mod source;
mod types;

pub use engine::EngineHandle;
pub use fetch::{FetchSettings, ReqwestTrendsFetcher, TrendsFetcher};
pub use payload::parse_terms;
pub use scheduler::{ChannelEventSink, EventSink, Scheduler};
pub use source::{fallback_queries, Clock, QuerySource};
pub use types::{
    BatchOrigin, BatchOutcome, CelebrationId, EngineEvent, FetchFailure, RequestId, TimerId,
};
