use std::sync::Arc;

use chrono::Utc;
use engine_logging::{engine_info, engine_warn};

use crate::fetch::TrendsFetcher;
use crate::{BatchOrigin, BatchOutcome};

/// Millisecond timestamp used to tell fallback batches apart.
pub type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

/// Produces query batches, substituting a local batch when the remote fails.
#[derive(Clone)]
pub struct QuerySource {
    fetcher: Arc<dyn TrendsFetcher>,
    clock: Clock,
}

impl QuerySource {
    pub fn new(fetcher: Arc<dyn TrendsFetcher>) -> Self {
        Self {
            fetcher,
            clock: Arc::new(|| Utc::now().timestamp_millis()),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Never fails: remote results are truncated to `size`, and any failure
    /// yields exactly `size` synthetic queries.
    pub async fn request_batch(&self, size: usize) -> BatchOutcome {
        match self.fetcher.fetch_terms(size).await {
            Ok(mut queries) => {
                queries.truncate(size);
                engine_info!("Fetched {} queries (requested {})", queries.len(), size);
                BatchOutcome {
                    queries,
                    origin: BatchOrigin::Remote,
                }
            }
            Err(failure) => {
                engine_warn!("Trends fetch failed, using fallback batch: {}", failure);
                BatchOutcome {
                    queries: fallback_queries(size, (self.clock)()),
                    origin: BatchOrigin::Fallback(failure),
                }
            }
        }
    }
}

/// `size` distinct placeholder queries stamped with `stamp_millis`.
pub fn fallback_queries(size: usize, stamp_millis: i64) -> Vec<String> {
    (1..=size)
        .map(|ordinal| format!("Unique query {ordinal} for rewards {stamp_millis}"))
        .collect()
}
